//! `opr set-base-permission` - tighten the organization default.
//!
//! The last step of the transition. Must run only after all grants are
//! confirmed applied; the ordering is not enforced here.

use super::helpers;
use anyhow::{Context, Result};
use opr_common::apply;
use opr_common::types::DefaultRepoPermission;

pub fn run(
    token: Option<&str>,
    org: &str,
    permission: DefaultRepoPermission,
    yes: bool,
) -> Result<()> {
    if !yes {
        println!(
            "This would set the default repository permission for {org} to '{permission}'."
        );
        println!("Members relying on the current default lose write access unless granted first.");
        println!("Re-run with --yes to apply.");
        return Ok(());
    }

    let client = helpers::client_for(token)?;
    apply::set_base_permission(&client, org, permission)
        .with_context(|| format!("editing organization '{org}'"))?;
    println!("Default repository permission for {org} is now '{permission}'.");
    Ok(())
}
