//! Common types used across OPR components.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A GitHub account name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Login(pub String);

impl Login {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository full name in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(pub String);

impl RepoName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (owner, name). `None` if there is no `/`.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once('/')
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission level for a direct collaborator grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access.
    Pull,
    /// Read and write access.
    Push,
    /// Full administrative access.
    Admin,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Push => "push",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organization-wide default repository permission applied to members
/// without a more specific grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultRepoPermission {
    None,
    Read,
    Write,
    Admin,
}

impl DefaultRepoPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for DefaultRepoPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an add-collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// Permission applied directly, or was already in place.
    Applied,
    /// The platform created a pending invitation; the permission takes
    /// effect once the account accepts it.
    InvitationCreated,
}

/// Contributor and direct-collaborator sets for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoAccess {
    /// Accounts that have authored commits. Historical: may include
    /// non-members and past members.
    pub contributors: BTreeSet<Login>,
    /// Accounts with an explicit direct grant (affiliation=direct,
    /// excluding team-based and inherited access).
    pub collaborators: BTreeSet<Login>,
}

/// Immutable point-in-time view of an organization's membership and
/// per-repository access sets.
///
/// Constructed once by [`crate::github::fetch_snapshot`] and passed by
/// parameter into the pure computation functions; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSnapshot {
    /// Organization login.
    pub org: String,
    /// Current default repository permission, if the token can see it.
    pub default_repository_permission: Option<String>,
    /// Current organization members.
    pub members: BTreeSet<Login>,
    /// Members with the admin role (subset of `members`).
    pub admins: BTreeSet<Login>,
    /// Per-repository access sets, keyed by full name.
    pub repos: BTreeMap<RepoName, RepoAccess>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name_split() {
        assert_eq!(
            RepoName::new("probcomp/Gen.jl").split(),
            Some(("probcomp", "Gen.jl"))
        );
        assert_eq!(RepoName::new("no-slash").split(), None);
    }

    #[test]
    fn test_permission_wire_values() {
        assert_eq!(Permission::Push.as_str(), "push");
        assert_eq!(Permission::Admin.as_str(), "admin");
        assert_eq!(DefaultRepoPermission::Read.as_str(), "read");
    }

    #[test]
    fn test_login_serializes_transparently() {
        let json = serde_json::to_string(&Login::new("mugamma")).unwrap();
        assert_eq!(json, "\"mugamma\"");
    }
}
