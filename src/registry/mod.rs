//! Package metadata lookups against the package registry.
//!
//! The resolver only talks to the [`MetadataProvider`] trait; the npm
//! implementation shells out to the `npm` executable.

mod npm;

use async_trait::async_trait;
use std::fmt;

pub use npm::{NpmRegistry, parse_bugs_url, parse_outdated, parse_repository_url};

/// Installed and latest versions of an outdated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPair {
    pub current: String,
    pub latest: String,
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.current, self.latest)
    }
}

/// Registry lookups used by the resolver.
///
/// Every method answers `None` when the registry has nothing to say,
/// whatever the reason (missing tool, timeout, unparseable output).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// URL of the package's bug tracker.
    async fn bugs_url(&self, package: &str) -> Option<String>;

    /// Repository URL, possibly pointing at a monorepo subdirectory.
    async fn repository_url(&self, package: &str) -> Option<String>;

    /// Versions of a locally installed package that is behind the latest release.
    async fn outdated_versions(&self, package: &str) -> Option<VersionPair>;
}
