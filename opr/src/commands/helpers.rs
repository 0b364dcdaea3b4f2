//! Shared helper functions for opr commands.

use anyhow::{Context, Result, anyhow};
use opr_common::github::GithubClient;

/// Build an authenticated client, or explain where the token comes from.
pub fn client_for(token: Option<&str>) -> Result<GithubClient> {
    let token = token.ok_or_else(|| {
        anyhow!("no GitHub token: set GITHUB_TOKEN or pass --token (needs repo and admin:org scope)")
    })?;
    GithubClient::new(token).context("building GitHub client")
}

/// Width of the widest string produced by `f`, for column alignment.
pub fn column_width<T>(items: impl Iterator<Item = T>, f: impl Fn(&T) -> usize) -> usize {
    items.map(|item| f(&item)).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_for_without_token_fails() {
        let err = client_for(None).unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_column_width() {
        let names = ["a", "longer", "mid"];
        assert_eq!(column_width(names.iter(), |n| n.len()), 6);
        assert_eq!(column_width(std::iter::empty::<&str>(), |n| n.len()), 0);
    }
}
