//! Blocking HTTP client for the GitHub REST API.

use super::models::{Account, ApiErrorBody, OrganizationInfo, RepositoryInfo};
use crate::errors::GithubError;
use crate::types::{DefaultRepoPermission, GrantOutcome, Login, Permission, RepoName};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

const API_ROOT: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("opr/", env!("CARGO_PKG_VERSION"));

/// Role filter for organization membership listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    All,
    Admin,
}

impl MemberRole {
    fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated client for the handful of GitHub endpoints the
/// reconciler consumes.
///
/// Calls are synchronous and sequential; there is no concurrency, retry,
/// or rate-limit handling.
#[derive(Debug)]
pub struct GithubClient {
    http: Client,
    token: String,
    api_root: String,
}

impl GithubClient {
    /// Build a client from a personal access token with `repo` and
    /// `admin:org` scope.
    pub fn new(token: impl Into<String>) -> Result<Self, GithubError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GithubError::Client)?;
        Ok(Self {
            http,
            token: token.into(),
            api_root: API_ROOT.to_string(),
        })
    }

    /// Point the client at a different API root (test servers).
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }

    /// Fetch the organization record.
    pub fn get_organization(&self, org: &str) -> Result<OrganizationInfo, GithubError> {
        let route = format!("/orgs/{org}");
        let response = self.send(self.http.get(self.url(&route)), &route)?;
        decode(response, &route)
    }

    /// List organization members, optionally narrowed to the admin role.
    pub fn list_members(&self, org: &str, role: MemberRole) -> Result<Vec<Login>, GithubError> {
        let route = format!("/orgs/{org}/members");
        let accounts: Vec<Account> = self.get_paged(&route, &[("role", role.as_query())])?;
        Ok(accounts.into_iter().map(|a| Login(a.login)).collect())
    }

    /// List all repositories owned by the organization.
    pub fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryInfo>, GithubError> {
        self.get_paged(&format!("/orgs/{org}/repos"), &[])
    }

    /// List accounts that have authored commits to the repository.
    pub fn list_contributors(&self, repo: &RepoName) -> Result<Vec<Login>, GithubError> {
        let (owner, name) = split_repo(repo)?;
        let route = format!("/repos/{owner}/{name}/contributors");
        let accounts: Vec<Account> = self.get_paged(&route, &[])?;
        Ok(accounts.into_iter().map(|a| Login(a.login)).collect())
    }

    /// List collaborators with an explicit direct grant on the repository.
    pub fn list_direct_collaborators(&self, repo: &RepoName) -> Result<Vec<Login>, GithubError> {
        let (owner, name) = split_repo(repo)?;
        let route = format!("/repos/{owner}/{name}/collaborators");
        let accounts: Vec<Account> = self.get_paged(&route, &[("affiliation", "direct")])?;
        Ok(accounts.into_iter().map(|a| Login(a.login)).collect())
    }

    /// Grant `login` an explicit direct permission on `repo`.
    ///
    /// Granting a permission the account already holds is an upstream
    /// no-op, which is what makes the grant loop safe to re-run.
    pub fn add_collaborator(
        &self,
        repo: &RepoName,
        login: &Login,
        permission: Permission,
    ) -> Result<GrantOutcome, GithubError> {
        let (owner, name) = split_repo(repo)?;
        let route = format!("/repos/{owner}/{name}/collaborators/{login}");
        let body = serde_json::json!({ "permission": permission.as_str() });
        let response = self.send(self.http.put(self.url(&route)).json(&body), &route)?;
        // 201 = invitation created, 204 = applied directly or already granted.
        Ok(match response.status() {
            StatusCode::CREATED => GrantOutcome::InvitationCreated,
            _ => GrantOutcome::Applied,
        })
    }

    /// Set the organization-wide default repository permission.
    pub fn set_default_repository_permission(
        &self,
        org: &str,
        permission: DefaultRepoPermission,
    ) -> Result<(), GithubError> {
        let route = format!("/orgs/{org}");
        let body = serde_json::json!({ "default_repository_permission": permission.as_str() });
        self.send(self.http.patch(self.url(&route)).json(&body), &route)?;
        Ok(())
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.api_root, route)
    }

    /// GET a paginated collection, following `per_page=100` pages until a
    /// short page.
    fn get_paged<T: DeserializeOwned>(
        &self,
        route: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<T>, GithubError> {
        let mut out = Vec::new();
        let mut page = 1usize;
        loop {
            let request = self
                .http
                .get(self.url(route))
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .query(extra_query);
            let response = self.send(request, route)?;

            // Empty repositories answer 204 on the contributors endpoint.
            if response.status() == StatusCode::NO_CONTENT {
                break;
            }

            let batch: Vec<T> = decode(response, route)?;
            let len = batch.len();
            out.extend(batch);
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        debug!(route, items = out.len(), pages = page, "paged fetch");
        Ok(out)
    }

    /// Attach auth headers, send, and map non-success statuses to errors.
    fn send(&self, request: RequestBuilder, route: &str) -> Result<Response, GithubError> {
        let response = request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .map_err(|source| GithubError::Transport {
                route: route.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(GithubError::Status {
            route: route.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

fn split_repo(repo: &RepoName) -> Result<(&str, &str), GithubError> {
    repo.split()
        .ok_or_else(|| GithubError::MalformedRepoName(repo.as_str().to_string()))
}

fn decode<T: DeserializeOwned>(response: Response, route: &str) -> Result<T, GithubError> {
    response.json().map_err(|source| GithubError::Decode {
        route: route.to_string(),
        source,
    })
}
