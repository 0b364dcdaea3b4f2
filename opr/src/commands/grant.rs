//! `opr grant` - apply explicit collaborator grants.
//!
//! The grant set comes either from a frozen plan file (`--plan`) or from a
//! live snapshot (`--org`). Nothing is mutated unless `--yes` is passed;
//! `--dry-run` and the bare invocation both stop after printing the plan.

use super::helpers;
use anyhow::{Context, Result, bail};
use opr_common::apply;
use opr_common::github;
use opr_common::plan::{AdminPolicy, GrantPlan};
use opr_common::reconcile;
use std::path::Path;

pub fn run(
    token: Option<&str>,
    plan_path: Option<&Path>,
    org: Option<&str>,
    admin_policy: AdminPolicy,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    // Only the live-snapshot path needs a client up front; replaying a
    // plan with --dry-run works without a token.
    let mut client = None;
    let plan = match (plan_path, org) {
        (Some(path), _) => GrantPlan::load(path)
            .with_context(|| format!("loading plan from {}", path.display()))?,
        (None, Some(org)) => {
            let live = helpers::client_for(token)?;
            let snapshot = github::fetch_snapshot(&live, org)
                .with_context(|| format!("fetching snapshot for organization '{org}'"))?;
            let implicit = reconcile::implicit_collaborators(&snapshot);
            let plan = GrantPlan::build(&snapshot.org, &implicit, &snapshot.admins, admin_policy);
            client = Some(live);
            plan
        }
        // clap enforces one of the two.
        (None, None) => bail!("specify --plan or --org"),
    };

    if plan.is_empty() {
        println!("Nothing to grant.");
        return Ok(());
    }

    render(&plan);

    if dry_run {
        println!();
        println!("Dry run - no permissions were changed.");
        return Ok(());
    }
    if !yes {
        println!();
        println!("Re-run with --yes to apply these grants.");
        return Ok(());
    }

    let client = match client {
        Some(client) => client,
        None => helpers::client_for(token)?,
    };
    let report =
        apply::grant_write_access(&client, &plan).context("granting collaborator access")?;
    println!();
    println!(
        "Applied {} grants ({} direct, {} pending invitations).",
        report.total(),
        report.applied,
        report.invitations
    );
    Ok(())
}

fn render(plan: &GrantPlan) {
    println!(
        "Plan {} for {} (generated {}, policy {})",
        plan.id,
        plan.org,
        plan.generated_at.format("%Y-%m-%d %H:%M UTC"),
        plan.admin_policy
    );
    println!();

    let repo_width = helpers::column_width(plan.entries.iter(), |e| e.repo.as_str().len());
    let login_width = helpers::column_width(plan.entries.iter(), |e| e.login.as_str().len());
    for entry in &plan.entries {
        println!(
            "  {:<repo_width$}  {:<login_width$}  {}",
            entry.repo.as_str(),
            entry.login.as_str(),
            entry.permission
        );
    }
    println!();
    println!("{} grants total.", plan.len());
}
