//! Org Permission Reconciler - shared library
//!
//! Everything the `opr` CLI needs that is not command plumbing: the domain
//! types, the blocking GitHub REST client, the pure implicit-access
//! computation, grant-plan persistence, and the apply engine that mutates
//! live permissions.

pub mod apply;
pub mod errors;
pub mod github;
pub mod plan;
pub mod reconcile;
pub mod types;

pub use apply::{ApplyReport, CollaboratorApi, grant_write_access, set_base_permission};
pub use errors::GithubError;
pub use github::{GithubClient, fetch_snapshot};
pub use plan::{AdminPolicy, GrantEntry, GrantPlan, PlanError};
pub use reconcile::{ImplicitMap, implicit_collaborators, total_implicit, without_admins};
pub use types::{
    DefaultRepoPermission, GrantOutcome, Login, OrgSnapshot, Permission, RepoAccess, RepoName,
};
