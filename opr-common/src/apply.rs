//! Apply engine: grant explicit access, tighten the org default.
//!
//! Mutating calls go through the [`CollaboratorApi`] trait so tests can
//! substitute a recording implementation for the live client.

use crate::errors::GithubError;
use crate::github::GithubClient;
use crate::plan::GrantPlan;
use crate::types::{DefaultRepoPermission, GrantOutcome, Login, Permission, RepoName};
use tracing::info;

/// The two mutating platform operations.
pub trait CollaboratorApi {
    fn add_collaborator(
        &self,
        repo: &RepoName,
        login: &Login,
        permission: Permission,
    ) -> Result<GrantOutcome, GithubError>;

    fn set_default_repository_permission(
        &self,
        org: &str,
        permission: DefaultRepoPermission,
    ) -> Result<(), GithubError>;
}

impl CollaboratorApi for GithubClient {
    fn add_collaborator(
        &self,
        repo: &RepoName,
        login: &Login,
        permission: Permission,
    ) -> Result<GrantOutcome, GithubError> {
        GithubClient::add_collaborator(self, repo, login, permission)
    }

    fn set_default_repository_permission(
        &self,
        org: &str,
        permission: DefaultRepoPermission,
    ) -> Result<(), GithubError> {
        GithubClient::set_default_repository_permission(self, org, permission)
    }
}

/// Counts from a grant run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Grants that applied directly.
    pub applied: usize,
    /// Grants that produced a pending invitation.
    pub invitations: usize,
}

impl ApplyReport {
    pub fn total(&self) -> usize {
        self.applied + self.invitations
    }
}

/// Apply every entry of the plan, in order, fail-fast.
///
/// If entry N fails, entries before it have already taken effect and the
/// remainder is not attempted. There is no rollback. Granting an
/// already-granted permission is an upstream no-op, so re-running the
/// same plan after a failure is safe.
pub fn grant_write_access(
    api: &impl CollaboratorApi,
    plan: &GrantPlan,
) -> Result<ApplyReport, GithubError> {
    let mut report = ApplyReport::default();
    for entry in &plan.entries {
        let outcome = api.add_collaborator(&entry.repo, &entry.login, entry.permission)?;
        match outcome {
            GrantOutcome::Applied => {
                info!(repo = %entry.repo, login = %entry.login, permission = %entry.permission, "granted");
                report.applied += 1;
            }
            GrantOutcome::InvitationCreated => {
                info!(repo = %entry.repo, login = %entry.login, permission = %entry.permission, "invitation sent");
                report.invitations += 1;
            }
        }
    }
    Ok(report)
}

/// Set the organization default repository permission.
///
/// Intended to run only after all grants are confirmed applied; members
/// relying on the old default otherwise lose write access silently. That
/// ordering stays an operator responsibility.
pub fn set_base_permission(
    api: &impl CollaboratorApi,
    org: &str,
    permission: DefaultRepoPermission,
) -> Result<(), GithubError> {
    api.set_default_repository_permission(org, permission)?;
    info!(org, permission = %permission, "default repository permission updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{AdminPolicy, GrantPlan};
    use crate::reconcile::ImplicitMap;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};

    /// Records every mutating call; optionally fails at a given call index.
    #[derive(Default)]
    struct RecordingApi {
        grants: RefCell<Vec<(RepoName, Login, Permission)>>,
        org_edits: RefCell<Vec<(String, DefaultRepoPermission)>>,
        fail_at: Option<usize>,
    }

    impl RecordingApi {
        fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Self::default()
            }
        }
    }

    impl CollaboratorApi for RecordingApi {
        fn add_collaborator(
            &self,
            repo: &RepoName,
            login: &Login,
            permission: Permission,
        ) -> Result<GrantOutcome, GithubError> {
            let attempt = self.grants.borrow().len();
            if self.fail_at == Some(attempt) {
                return Err(GithubError::Status {
                    route: format!("/repos/{repo}/collaborators/{login}"),
                    status: 422,
                    message: "injected failure".to_string(),
                });
            }
            self.grants
                .borrow_mut()
                .push((repo.clone(), login.clone(), permission));
            Ok(GrantOutcome::Applied)
        }

        fn set_default_repository_permission(
            &self,
            org: &str,
            permission: DefaultRepoPermission,
        ) -> Result<(), GithubError> {
            self.org_edits
                .borrow_mut()
                .push((org.to_string(), permission));
            Ok(())
        }
    }

    fn logins(names: &[&str]) -> BTreeSet<Login> {
        names.iter().map(|n| Login::new(*n)).collect()
    }

    fn plan_for(map: &[(&str, &[&str])], admins: &[&str], policy: AdminPolicy) -> GrantPlan {
        let implicit: ImplicitMap = map
            .iter()
            .map(|(repo, names)| (RepoName::new(*repo), logins(names)))
            .collect();
        GrantPlan::build("org", &implicit, &logins(admins), policy)
    }

    #[test]
    fn test_non_admin_gets_one_push_grant() {
        let api = RecordingApi::default();
        let plan = plan_for(&[("org/r", &["a"])], &["c"], AdminPolicy::GrantAsAdmin);

        grant_write_access(&api, &plan).unwrap();

        let grants = api.grants.borrow();
        assert_eq!(
            *grants,
            vec![(RepoName::new("org/r"), Login::new("a"), Permission::Push)]
        );
    }

    #[test]
    fn test_admin_gets_admin_permission() {
        let api = RecordingApi::default();
        let plan = plan_for(&[("org/s", &["c"])], &["c"], AdminPolicy::GrantAsAdmin);

        grant_write_access(&api, &plan).unwrap();

        let grants = api.grants.borrow();
        assert_eq!(
            *grants,
            vec![(RepoName::new("org/s"), Login::new("c"), Permission::Admin)]
        );
    }

    #[test]
    fn test_grant_is_fail_fast_with_partial_apply() {
        let api = RecordingApi::failing_at(1);
        let plan = plan_for(
            &[("org/r", &["a", "b", "d"])],
            &[],
            AdminPolicy::GrantAsAdmin,
        );
        assert_eq!(plan.len(), 3);

        let err = grant_write_access(&api, &plan).unwrap_err();
        assert!(matches!(err, GithubError::Status { status: 422, .. }));

        // First grant landed, the failing one and everything after did not.
        assert_eq!(api.grants.borrow().len(), 1);
    }

    #[test]
    fn test_rerun_issues_identical_calls() {
        let plan = plan_for(&[("org/r", &["a", "b"])], &[], AdminPolicy::GrantAsAdmin);

        let first = RecordingApi::default();
        grant_write_access(&first, &plan).unwrap();
        let second = RecordingApi::default();
        grant_write_access(&second, &plan).unwrap();

        assert_eq!(*first.grants.borrow(), *second.grants.borrow());
    }

    #[test]
    fn test_report_counts_outcomes() {
        let api = RecordingApi::default();
        let plan = plan_for(&[("org/r", &["a", "b"])], &[], AdminPolicy::GrantAsAdmin);

        let report = grant_write_access(&api, &plan).unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.invitations, 0);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_set_base_permission_edits_org_once() {
        let api = RecordingApi::default();
        set_base_permission(&api, "org", DefaultRepoPermission::Read).unwrap();

        let edits = api.org_edits.borrow();
        assert_eq!(*edits, vec![("org".to_string(), DefaultRepoPermission::Read)]);
    }
}
