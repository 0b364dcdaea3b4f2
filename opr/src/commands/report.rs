//! `opr report` - print the implicit-collaborator map.
//!
//! Fetches a fresh snapshot, runs the pure computation, and prints one
//! block per repository. By default admins are filtered out of the view;
//! `--include-admins` shows the raw map. `--write-plan` freezes the
//! computed grants for later replay by `opr grant`.

use super::helpers;
use anyhow::{Context, Result};
use opr_common::github;
use opr_common::plan::{AdminPolicy, GrantPlan};
use opr_common::reconcile::{self, ImplicitMap};
use opr_common::types::OrgSnapshot;
use std::path::Path;

pub fn run(
    token: Option<&str>,
    org: &str,
    include_admins: bool,
    json: bool,
    write_plan: Option<&Path>,
    admin_policy: AdminPolicy,
) -> Result<()> {
    let client = helpers::client_for(token)?;
    let snapshot = github::fetch_snapshot(&client, org)
        .with_context(|| format!("fetching snapshot for organization '{org}'"))?;

    let implicit = reconcile::implicit_collaborators(&snapshot);
    let view = if include_admins {
        implicit.clone()
    } else {
        reconcile::without_admins(&implicit, &snapshot.admins)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render(&snapshot, &view, include_admins);
    }

    if let Some(path) = write_plan {
        let plan = GrantPlan::build(&snapshot.org, &implicit, &snapshot.admins, admin_policy);
        plan.save(path)
            .with_context(|| format!("writing plan to {}", path.display()))?;
        println!();
        println!("Wrote plan {} with {} grants to {}", plan.id, plan.len(), path.display());
    }

    Ok(())
}

fn render(snapshot: &OrgSnapshot, view: &ImplicitMap, include_admins: bool) {
    println!("Implicit collaborators in {}", snapshot.org);
    if let Some(default) = &snapshot.default_repository_permission {
        println!("Current default repository permission: {default}");
    }
    println!();

    let mut shown = 0usize;
    for (repo, logins) in view {
        if logins.is_empty() {
            continue;
        }
        shown += 1;
        println!("{repo}");
        for login in logins {
            if include_admins && snapshot.admins.contains(login) {
                println!("  {login} (admin)");
            } else {
                println!("  {login}");
            }
        }
    }

    if shown == 0 {
        println!("No implicit collaborators found.");
    }

    println!(
        "{} implicit collaborators across {} of {} repositories",
        reconcile::total_implicit(view),
        shown,
        snapshot.repos.len()
    );
}
