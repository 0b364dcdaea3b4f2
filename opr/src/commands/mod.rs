//! Subcommand implementations for the opr CLI.

pub mod base_permission;
pub mod grant;
pub mod helpers;
pub mod report;
