//! Implicit-access computation.
//!
//! Pure set arithmetic over an [`OrgSnapshot`]. An "implicit collaborator"
//! is an organization member who has contributed to a repository but holds
//! no direct grant there, relying on the org default permission for write
//! access. These are the people who would silently lose access when the
//! default permission drops to `read`.

use crate::types::{Login, OrgSnapshot, RepoName};
use std::collections::{BTreeMap, BTreeSet};

/// Map of repository to the members whose access there is implicit.
pub type ImplicitMap = BTreeMap<RepoName, BTreeSet<Login>>;

/// For every repository, `contributors intersect members, minus direct
/// collaborators`.
///
/// Repositories with an empty result are retained so callers can see that
/// every repository in the snapshot was examined. Non-members and past
/// members in the contributor lists drop out of the intersection.
pub fn implicit_collaborators(snapshot: &OrgSnapshot) -> ImplicitMap {
    snapshot
        .repos
        .iter()
        .map(|(repo, access)| {
            let implicit = access
                .contributors
                .intersection(&snapshot.members)
                .filter(|login| !access.collaborators.contains(*login))
                .cloned()
                .collect();
            (repo.clone(), implicit)
        })
        .collect()
}

/// Remove `admins` from every value and drop repositories whose set
/// becomes empty.
///
/// Deliberately asymmetric with [`implicit_collaborators`]: this is the
/// reporting view used to decide what to act on. Admins are not a problem
/// to report, since the grant step re-includes them with the `admin`
/// permission instead of downgrading them to `push`.
pub fn without_admins(implicit: &ImplicitMap, admins: &BTreeSet<Login>) -> ImplicitMap {
    implicit
        .iter()
        .filter_map(|(repo, logins)| {
            let remaining: BTreeSet<Login> = logins.difference(admins).cloned().collect();
            if remaining.is_empty() {
                None
            } else {
                Some((repo.clone(), remaining))
            }
        })
        .collect()
}

/// Total number of (repository, member) pairs in an implicit map.
pub fn total_implicit(implicit: &ImplicitMap) -> usize {
    implicit.values().map(BTreeSet::len).sum()
}
