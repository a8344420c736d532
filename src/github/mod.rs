//! GitHub URL handling: recognising repository URLs and composing
//! raw-content and compare URLs.

mod repo;
mod urls;

pub use repo::{GITHUB_HOST, GitHubUrlError, RepoLocator};
pub use urls::{
    CHANGELOG_FILENAME, DEFAULT_BRANCHES, TAG_PREFIXES, build_compare_url, build_compare_url_at,
    build_raw_changelog_url, build_raw_changelog_url_at,
};
