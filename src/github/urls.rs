use crate::config::{DEFAULT_RAW_URL, DEFAULT_WEB_URL};

pub const CHANGELOG_FILENAME: &str = "CHANGELOG.md";

/// Branches tried, in order, when looking for a changelog in a repository.
pub const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// Tag prefixes tried, in order, when building a compare URL.
pub const TAG_PREFIXES: [&str; 2] = ["", "v"];

/// Builds the raw.githubusercontent.com URL of a CHANGELOG.md.
pub fn build_raw_changelog_url(
    owner: &str,
    repo: &str,
    branch: &str,
    subpath: Option<&str>,
) -> String {
    build_raw_changelog_url_at(DEFAULT_RAW_URL, owner, repo, branch, subpath)
}

/// Same as [`build_raw_changelog_url`] against a custom raw-content base.
pub fn build_raw_changelog_url_at(
    raw_url: &str,
    owner: &str,
    repo: &str,
    branch: &str,
    subpath: Option<&str>,
) -> String {
    match subpath {
        Some(subpath) if !subpath.is_empty() => format!(
            "{}/{}/{}/refs/heads/{}/{}/{}",
            raw_url, owner, repo, branch, subpath, CHANGELOG_FILENAME
        ),
        _ => format!(
            "{}/{}/{}/refs/heads/{}/{}",
            raw_url, owner, repo, branch, CHANGELOG_FILENAME
        ),
    }
}

/// Builds the GitHub compare view between two tags.
pub fn build_compare_url(owner: &str, repo: &str, from_tag: &str, to_tag: &str) -> String {
    build_compare_url_at(DEFAULT_WEB_URL, owner, repo, from_tag, to_tag)
}

pub fn build_compare_url_at(
    web_url: &str,
    owner: &str,
    repo: &str,
    from_tag: &str,
    to_tag: &str,
) -> String {
    format!(
        "{}/{}/{}/compare/{}...{}",
        web_url, owner, repo, from_tag, to_tag
    )
}
