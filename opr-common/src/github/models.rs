//! Wire models for the GitHub REST responses we consume.
//!
//! Only the fields the reconciler reads are declared; everything else in
//! the response bodies is ignored.

use serde::Deserialize;

/// An account reference as it appears in member, contributor, and
/// collaborator listings.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Organization record.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationInfo {
    pub login: String,
    /// Only present when the token has organization administration scope.
    pub default_repository_permission: Option<String>,
}

/// Repository record from the organization repository listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub private: bool,
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_ignores_unknown_fields() {
        let json = r#"{"login": "mugamma", "id": 123, "type": "User", "site_admin": false}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.login, "mugamma");
    }

    #[test]
    fn test_organization_without_default_permission() {
        let json = r#"{"login": "probcomp", "id": 1}"#;
        let org: OrganizationInfo = serde_json::from_str(json).unwrap();
        assert_eq!(org.login, "probcomp");
        assert!(org.default_repository_permission.is_none());
    }

    #[test]
    fn test_repository_listing_entry() {
        let json = r#"{"full_name": "probcomp/Gen.jl", "archived": false, "private": false, "fork": false}"#;
        let repo: RepositoryInfo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "probcomp/Gen.jl");
        assert!(!repo.archived);
        assert!(!repo.private);
    }

    #[test]
    fn test_api_error_body() {
        let json = r#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.message, "Not Found");
    }
}
