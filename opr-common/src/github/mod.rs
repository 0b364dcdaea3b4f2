//! Minimal GitHub REST v3 client.
//!
//! Covers only the API surface the reconciler consumes: organization
//! lookup, membership listings (with role filter), repository listings,
//! per-repository contributor and direct-collaborator listings, the
//! add-collaborator grant, and the organization default-permission edit.
//!
//! Pagination follows `per_page=100` pages until a short page. Failures
//! propagate as [`GithubError`] and abort the current command.

mod client;
mod models;

pub use client::{GithubClient, MemberRole};

use crate::errors::GithubError;
use crate::types::{Login, OrgSnapshot, RepoAccess, RepoName};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Fetch a complete organization snapshot: membership, the admin subset,
/// and contributor / direct-collaborator sets for every repository.
///
/// One blocking request at a time; an error on any request aborts the
/// fetch and surfaces to the caller.
pub fn fetch_snapshot(client: &GithubClient, org: &str) -> Result<OrgSnapshot, GithubError> {
    let organization = client.get_organization(org)?;
    info!(org = %organization.login, "fetching organization snapshot");

    let members: BTreeSet<Login> = client.list_members(org, MemberRole::All)?.into_iter().collect();
    let admins: BTreeSet<Login> = client.list_members(org, MemberRole::Admin)?.into_iter().collect();

    let mut repos = BTreeMap::new();
    for repo in client.list_repositories(org)? {
        let name = RepoName::new(repo.full_name);
        debug!(repo = %name, "fetching contributor and collaborator lists");
        let contributors = client.list_contributors(&name)?.into_iter().collect();
        let collaborators = client.list_direct_collaborators(&name)?.into_iter().collect();
        repos.insert(
            name,
            RepoAccess {
                contributors,
                collaborators,
            },
        );
    }

    info!(
        members = members.len(),
        admins = admins.len(),
        repos = repos.len(),
        "snapshot complete"
    );

    Ok(OrgSnapshot {
        org: organization.login,
        default_repository_permission: organization.default_repository_permission,
        members,
        admins,
        repos,
    })
}
