//! Org Permission Reconciler CLI.
//!
//! Audits a GitHub organization for members whose write access is implicit
//! (historical contributors with no direct grant, covered only by the org
//! default permission) and applies the transition to explicit grants plus
//! a `read` org default. Each mutating step is its own subcommand so every
//! change is a deliberate, auditable invocation.

#![forbid(unsafe_code)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use opr_common::plan::AdminPolicy;
use opr_common::types::DefaultRepoPermission;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "opr")]
#[command(author, version, about = "Org Permission Reconciler - audit and adjust GitHub repository permissions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub personal access token with repo and admin:org scope
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report members with implicit write access, per repository
    Report {
        /// Organization login
        #[arg(long)]
        org: String,

        /// Show admins in the report instead of filtering them out
        #[arg(long)]
        include_admins: bool,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Freeze the computed grants into a plan file for later replay
        #[arg(long, value_name = "PATH")]
        write_plan: Option<PathBuf>,

        /// Admin policy used when writing a plan
        #[arg(long, value_enum, default_value = "grant-as-admin", requires = "write_plan")]
        admin_policy: AdminPolicyArg,
    },

    /// Grant explicit collaborator access from a plan file or a live snapshot
    Grant {
        /// Load a previously written plan file
        #[arg(long, value_name = "PATH", conflicts_with = "org")]
        plan: Option<PathBuf>,

        /// Compute the grants live from the organization
        #[arg(long, required_unless_present = "plan")]
        org: Option<String>,

        /// Admin policy for a live-computed plan
        #[arg(long, value_enum, default_value = "grant-as-admin", conflicts_with = "plan")]
        admin_policy: AdminPolicyArg,

        /// Print the grants without applying anything
        #[arg(long)]
        dry_run: bool,

        /// Actually apply the grants
        #[arg(long)]
        yes: bool,
    },

    /// Set the organization default repository permission
    SetBasePermission {
        /// Organization login
        #[arg(long)]
        org: String,

        /// Target default permission
        #[arg(long, value_enum, default_value = "read")]
        permission: DefaultPermissionArg,

        /// Actually apply the change
        #[arg(long)]
        yes: bool,
    },
}

/// CLI mirror of [`AdminPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AdminPolicyArg {
    /// Leave admins out of the grant set
    Exclude,
    /// Include admins, granting them admin instead of push
    GrantAsAdmin,
}

impl From<AdminPolicyArg> for AdminPolicy {
    fn from(arg: AdminPolicyArg) -> Self {
        match arg {
            AdminPolicyArg::Exclude => Self::Exclude,
            AdminPolicyArg::GrantAsAdmin => Self::GrantAsAdmin,
        }
    }
}

/// CLI mirror of [`DefaultRepoPermission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DefaultPermissionArg {
    None,
    Read,
    Write,
    Admin,
}

impl From<DefaultPermissionArg> for DefaultRepoPermission {
    fn from(arg: DefaultPermissionArg) -> Self {
        match arg {
            DefaultPermissionArg::None => Self::None,
            DefaultPermissionArg::Read => Self::Read,
            DefaultPermissionArg::Write => Self::Write,
            DefaultPermissionArg::Admin => Self::Admin,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so report output on stdout stays clean.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let token = cli.token.as_deref();
    match cli.command {
        Commands::Report {
            org,
            include_admins,
            json,
            write_plan,
            admin_policy,
        } => commands::report::run(
            token,
            &org,
            include_admins,
            json,
            write_plan.as_deref(),
            admin_policy.into(),
        ),
        Commands::Grant {
            plan,
            org,
            admin_policy,
            dry_run,
            yes,
        } => commands::grant::run(
            token,
            plan.as_deref(),
            org.as_deref(),
            admin_policy.into(),
            dry_run,
            yes,
        ),
        Commands::SetBasePermission {
            org,
            permission,
            yes,
        } => commands::base_permission::run(token, &org, permission.into(), yes),
    }
}
