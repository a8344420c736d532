use reqwest::Url;
use std::str::FromStr;
use thiserror::Error;

/// The only host recognised as a GitHub repository location.
pub const GITHUB_HOST: &str = "github.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GitHubUrlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported host: {0}. Only GitHub URLs are supported.")]
    UnsupportedHost(String),

    #[error("Invalid GitHub repository URL (expected owner and repo): {0}")]
    MalformedRepositoryPath(String),
}

/// Where a package lives on GitHub, optionally inside a monorepo directory.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
    /// `/`-joined directory inside the repository, no leading or trailing slash.
    pub subpath: Option<String>,
}

impl std::fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(ref subpath) = self.subpath {
            write!(f, ":{}", subpath)?;
        }
        Ok(())
    }
}

impl RepoLocator {
    /// Parses a GitHub web URL.
    ///
    /// Accepted forms:
    /// - `https://github.com/owner/repo`
    /// - `https://github.com/owner/repo/issues` (and `pulls`, `actions`, `wiki`)
    /// - `https://github.com/owner/repo/tree/<branch>/path/to/dir` (or `blob`)
    pub fn parse(url: &str) -> Result<Self, GitHubUrlError> {
        let parsed = Url::parse(url).map_err(|e| GitHubUrlError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed.host_str().unwrap_or_default();
        if host != GITHUB_HOST {
            return Err(GitHubUrlError::UnsupportedHost(host.to_string()));
        }

        let parts: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(GitHubUrlError::MalformedRepositoryPath(url.to_string()));
        }

        let owner = parts[0].to_string();
        let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]);
        if repo.is_empty() {
            return Err(GitHubUrlError::MalformedRepositoryPath(url.to_string()));
        }

        // Only tree/<branch>/<dir...> and blob/<branch>/<dir...> name a directory;
        // issues, pulls, actions, wiki and anything else do not.
        let subpath = match parts.get(2) {
            Some(&kind) if (kind == "tree" || kind == "blob") && parts.len() > 4 => {
                let dirs: Vec<&str> = parts[4..]
                    .iter()
                    .copied()
                    .filter(|segment| !segment.is_empty())
                    .collect();
                (!dirs.is_empty()).then(|| dirs.join("/"))
            }
            _ => None,
        };

        Ok(RepoLocator {
            owner,
            repo: repo.to_string(),
            subpath,
        })
    }
}

impl FromStr for RepoLocator {
    type Err = GitHubUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepoLocator::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository_root() {
        let locator = RepoLocator::parse("https://github.com/owner/repo").unwrap();
        assert_eq!(
            locator,
            RepoLocator {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                subpath: None,
            }
        );
    }

    #[test]
    fn test_parse_tree_subpath() {
        let locator = RepoLocator::parse("https://github.com/o/r/tree/HEAD/a/b").unwrap();
        assert_eq!(locator.owner, "o");
        assert_eq!(locator.repo, "r");
        assert_eq!(locator.subpath, Some("a/b".to_string()));
    }

    #[test]
    fn test_parse_blob_subpath() {
        let locator =
            RepoLocator::parse("https://github.com/sanity-io/plugins/blob/main/plugins/iframe")
                .unwrap();
        assert_eq!(locator.subpath, Some("plugins/iframe".to_string()));
    }

    #[test]
    fn test_parse_collapses_empty_segments() {
        let locator = RepoLocator::parse("https://github.com/o/r/tree/HEAD//pkg").unwrap();
        assert_eq!(locator.subpath, Some("pkg".to_string()));

        let locator = RepoLocator::parse("https://github.com/o/r/tree/HEAD/a//b").unwrap();
        assert_eq!(locator.subpath, Some("a/b".to_string()));
    }

    #[test]
    fn test_parse_only_slashes_after_branch_has_no_subpath() {
        let locator = RepoLocator::parse("https://github.com/o/r/tree/HEAD//").unwrap();
        assert_eq!(locator.subpath, None);
    }

    #[test]
    fn test_parse_tree_without_subpath() {
        // Branch given but nothing after it.
        let locator = RepoLocator::parse("https://github.com/o/r/tree/main").unwrap();
        assert_eq!(locator.subpath, None);
    }

    #[test]
    fn test_parse_trailing_slash_ignored() {
        let locator = RepoLocator::parse("https://github.com/o/r/tree/HEAD/pkg/").unwrap();
        assert_eq!(locator.subpath, Some("pkg".to_string()));
    }

    #[test]
    fn test_parse_issues_page() {
        let locator = RepoLocator::parse("https://github.com/owner/repo/issues").unwrap();
        assert_eq!(locator.owner, "owner");
        assert_eq!(locator.repo, "repo");
        assert_eq!(locator.subpath, None);
    }

    #[test]
    fn test_parse_other_suffixes_have_no_subpath() {
        for url in [
            "https://github.com/o/r/pulls",
            "https://github.com/o/r/actions",
            "https://github.com/o/r/wiki",
            "https://github.com/o/r/releases/tag/v1.0.0",
        ] {
            assert_eq!(RepoLocator::parse(url).unwrap().subpath, None, "{}", url);
        }
    }

    #[test]
    fn test_parse_ignores_query_and_fragment() {
        let locator = RepoLocator::parse("https://github.com/o/r/issues?q=is%3Aopen#top").unwrap();
        assert_eq!(locator.repo, "r");
        assert_eq!(locator.subpath, None);
    }

    #[test]
    fn test_parse_strips_git_suffix() {
        let locator = RepoLocator::parse("git+https://github.com/o/r.git").unwrap();
        assert_eq!(locator.owner, "o");
        assert_eq!(locator.repo, "r");
    }

    #[test]
    fn test_parse_unsupported_host() {
        let err = RepoLocator::parse("https://gitlab.com/o/r").unwrap_err();
        assert_eq!(err, GitHubUrlError::UnsupportedHost("gitlab.com".to_string()));
    }

    #[test]
    fn test_parse_subdomain_is_unsupported() {
        let err = RepoLocator::parse("https://gist.github.com/o/r").unwrap_err();
        assert!(matches!(err, GitHubUrlError::UnsupportedHost(_)));
    }

    #[test]
    fn test_parse_missing_repo() {
        let err = RepoLocator::parse("https://github.com/owner").unwrap_err();
        assert!(matches!(err, GitHubUrlError::MalformedRepositoryPath(_)));
    }

    #[test]
    fn test_parse_empty_path() {
        let err = RepoLocator::parse("https://github.com/").unwrap_err();
        assert!(matches!(err, GitHubUrlError::MalformedRepositoryPath(_)));
    }

    #[test]
    fn test_parse_invalid_url() {
        let err = RepoLocator::parse("github.com/o/r").unwrap_err();
        assert!(matches!(err, GitHubUrlError::InvalidUrl { .. }));
    }

    #[test]
    fn test_from_str() {
        let locator: RepoLocator = "https://github.com/owner/repo".parse().unwrap();
        assert_eq!(locator.to_string(), "owner/repo");
    }

    #[test]
    fn test_display_with_subpath() {
        let locator = RepoLocator {
            owner: "o".to_string(),
            repo: "r".to_string(),
            subpath: Some("packages/core".to_string()),
        };
        assert_eq!(format!("{}", locator), "o/r:packages/core");
    }

    #[test]
    fn test_error_messages() {
        let err = RepoLocator::parse("https://gitlab.com/o/r").unwrap_err();
        assert!(err.to_string().contains("Unsupported host: gitlab.com"));

        let err = RepoLocator::parse("https://github.com/owner").unwrap_err();
        assert!(err.to_string().contains("expected owner and repo"));
    }
}
