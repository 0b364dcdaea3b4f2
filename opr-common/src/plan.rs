//! Grant-plan construction and persistence.
//!
//! A grant plan freezes the implicit-collaborator computation into a
//! versioned, timestamped file so the grant step can be replayed later
//! without re-querying the platform. One record per repository, account,
//! and permission.

use crate::reconcile::ImplicitMap;
use crate::types::{Login, Permission, RepoName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Plan file format version written and accepted by this build.
pub const PLAN_FORMAT_VERSION: u32 = 1;

/// How organization admins are treated when building a plan.
///
/// The two behaviors are deliberately kept distinct: excluding admins
/// leaves their (already elevated) access to the admin role machinery,
/// while including them grants `admin` explicitly so nothing about their
/// effective access depends on the org default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminPolicy {
    /// Leave admins out of the plan entirely.
    Exclude,
    /// Keep admins and grant them `admin` instead of `push`.
    GrantAsAdmin,
}

impl AdminPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::GrantAsAdmin => "grant-as-admin",
        }
    }
}

impl std::fmt::Display for AdminPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grant to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantEntry {
    pub repo: RepoName,
    pub login: Login,
    pub permission: Permission,
}

/// A frozen set of grants derived from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantPlan {
    /// Plan file format version.
    pub format_version: u32,
    /// Unique identifier for this plan.
    pub id: Uuid,
    /// When the plan was generated.
    pub generated_at: DateTime<Utc>,
    /// Organization the plan was computed for.
    pub org: String,
    /// Admin policy the plan was built with.
    pub admin_policy: AdminPolicy,
    /// Grants in apply order.
    pub entries: Vec<GrantEntry>,
}

impl GrantPlan {
    /// Build a plan from an implicit-collaborator map.
    ///
    /// Entries come out in repository order, then login order, which is
    /// also the order the apply step walks them in.
    pub fn build(
        org: &str,
        implicit: &ImplicitMap,
        admins: &BTreeSet<Login>,
        policy: AdminPolicy,
    ) -> Self {
        let mut entries = Vec::new();
        for (repo, logins) in implicit {
            for login in logins {
                let is_admin = admins.contains(login);
                let permission = match policy {
                    AdminPolicy::Exclude => {
                        if is_admin {
                            continue;
                        }
                        Permission::Push
                    }
                    AdminPolicy::GrantAsAdmin => {
                        if is_admin {
                            Permission::Admin
                        } else {
                            Permission::Push
                        }
                    }
                };
                entries.push(GrantEntry {
                    repo: repo.clone(),
                    login: login.clone(),
                    permission,
                });
            }
        }
        Self {
            format_version: PLAN_FORMAT_VERSION,
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            org: org.to_string(),
            admin_policy: policy,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Write the plan as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a plan, rejecting unknown format versions.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = fs::read_to_string(path)?;
        let plan: Self = serde_json::from_str(&content)?;
        if plan.format_version != PLAN_FORMAT_VERSION {
            return Err(PlanError::UnsupportedVersion {
                found: plan.format_version,
                supported: PLAN_FORMAT_VERSION,
            });
        }
        Ok(plan)
    }
}

/// Errors from plan persistence.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plan file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported plan format version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn logins(names: &[&str]) -> BTreeSet<Login> {
        names.iter().map(|n| Login::new(*n)).collect()
    }

    fn implicit_map() -> ImplicitMap {
        let mut map = BTreeMap::new();
        map.insert(RepoName::new("org/r"), logins(&["a"]));
        map.insert(RepoName::new("org/s"), logins(&["c"]));
        map
    }

    #[test]
    fn test_build_grants_push_to_non_admins() {
        let plan = GrantPlan::build("org", &implicit_map(), &logins(&["c"]), AdminPolicy::GrantAsAdmin);
        let entry = plan
            .entries
            .iter()
            .find(|e| e.login == Login::new("a"))
            .unwrap();
        assert_eq!(entry.repo, RepoName::new("org/r"));
        assert_eq!(entry.permission, Permission::Push);
    }

    #[test]
    fn test_build_grants_admin_to_admins() {
        let plan = GrantPlan::build("org", &implicit_map(), &logins(&["c"]), AdminPolicy::GrantAsAdmin);
        let entry = plan
            .entries
            .iter()
            .find(|e| e.login == Login::new("c"))
            .unwrap();
        assert_eq!(entry.repo, RepoName::new("org/s"));
        assert_eq!(entry.permission, Permission::Admin);
    }

    #[test]
    fn test_build_exclude_policy_skips_admins() {
        let plan = GrantPlan::build("org", &implicit_map(), &logins(&["c"]), AdminPolicy::Exclude);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries[0].login, Login::new("a"));
        assert_eq!(plan.entries[0].permission, Permission::Push);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");

        let plan = GrantPlan::build("org", &implicit_map(), &logins(&["c"]), AdminPolicy::GrantAsAdmin);
        plan.save(&path).unwrap();

        let loaded = GrantPlan::load(&path).unwrap();
        assert_eq!(loaded.id, plan.id);
        assert_eq!(loaded.org, "org");
        assert_eq!(loaded.admin_policy, AdminPolicy::GrantAsAdmin);
        assert_eq!(loaded.entries, plan.entries);
    }

    #[test]
    fn test_load_rejects_unknown_format_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");

        let mut plan = GrantPlan::build("org", &implicit_map(), &BTreeSet::new(), AdminPolicy::Exclude);
        plan.format_version = 99;
        plan.save(&path).unwrap();

        match GrantPlan::load(&path) {
            Err(PlanError::UnsupportedVersion { found: 99, .. }) => {}
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        match GrantPlan::load(Path::new("/nonexistent/plan.json")) {
            Err(PlanError::Io(_)) => {}
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
