//! Changelog resolution: an ordered chain of probes, first hit wins.
//!
//! 1. The CDN mirror of the published package.
//! 2. The repository named by the package's bug tracker URL.
//! 3. The repository URL reported by the registry (may include a subdirectory).
//! 4. A compare view between the installed and latest tags, only when stage 2
//!    or 3 identified a GitHub repository.

use log::debug;
use std::fmt;

use crate::config::Config;
use crate::github::{
    CHANGELOG_FILENAME, DEFAULT_BRANCHES, RepoLocator, TAG_PREFIXES, build_compare_url_at,
    build_raw_changelog_url_at,
};
use crate::http::UrlProber;
use crate::package::validate_package_name;
use crate::registry::MetadataProvider;

/// Where a changelog was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// CHANGELOG.md shipped inside the published package.
    Mirror(String),
    /// CHANGELOG.md in the source repository.
    Repository(String),
    /// Compare view between the installed and latest release tags.
    Compare(String),
}

impl Resolution {
    pub fn url(&self) -> &str {
        match self {
            Resolution::Mirror(url) | Resolution::Repository(url) | Resolution::Compare(url) => {
                url
            }
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

pub struct ChangelogResolver<P: UrlProber, M: MetadataProvider> {
    prober: P,
    registry: M,
    config: Config,
}

impl<P: UrlProber, M: MetadataProvider> ChangelogResolver<P, M> {
    pub fn new(prober: P, registry: M, config: Config) -> Self {
        Self {
            prober,
            registry,
            config,
        }
    }

    /// Runs every stage in order and returns the first URL that exists.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, package: &str) -> Option<Resolution> {
        debug!("Finding changelog for package: {}", package);

        if let Err(e) = validate_package_name(package) {
            debug!("Invalid package name: {:#}", e);
        }

        debug!("Trying the CDN mirror");
        if let Some(url) = self.try_mirror(package).await {
            return Some(Resolution::Mirror(url));
        }

        // Last repository identified by stage 2 or 3, kept for the compare fallback.
        let mut known_repo: Option<RepoLocator> = None;

        debug!("Trying the bug tracker URL");
        if let Some(url) = self.try_bugs_url(package, &mut known_repo).await {
            return Some(Resolution::Repository(url));
        }

        debug!("Trying the repository URL");
        if let Some(url) = self.try_repository_url(package, &mut known_repo).await {
            return Some(Resolution::Repository(url));
        }

        match known_repo {
            Some(repo) => {
                debug!("Trying a compare view for {}", repo);
                if let Some(url) = self.try_compare(package, &repo).await {
                    return Some(Resolution::Compare(url));
                }
            }
            None => debug!("No GitHub repository known, skipping compare view"),
        }

        debug!("No CHANGELOG.md found for package: {}", package);
        None
    }

    async fn try_mirror(&self, package: &str) -> Option<String> {
        let url = format!(
            "{}/{}/{}",
            self.config.mirror_url, package, CHANGELOG_FILENAME
        );
        self.prober.exists(&url).await.then_some(url)
    }

    async fn try_bugs_url(
        &self,
        package: &str,
        known_repo: &mut Option<RepoLocator>,
    ) -> Option<String> {
        let bugs_url = self.registry.bugs_url(package).await?;
        let repo = match RepoLocator::parse(&bugs_url) {
            Ok(repo) => repo,
            Err(e) => {
                debug!("Failed to parse bugs URL: {}", e);
                return None;
            }
        };

        // Issue tracker URLs say nothing about directories: look at the root.
        let found = self.probe_branches(&repo.owner, &repo.repo, None).await;
        *known_repo = Some(repo);
        found
    }

    async fn try_repository_url(
        &self,
        package: &str,
        known_repo: &mut Option<RepoLocator>,
    ) -> Option<String> {
        let repo_url = self.registry.repository_url(package).await?;
        let repo = match RepoLocator::parse(&repo_url) {
            Ok(repo) => repo,
            Err(e) => {
                debug!("Failed to parse repo URL: {}", e);
                return None;
            }
        };

        let found = self
            .probe_branches(&repo.owner, &repo.repo, repo.subpath.as_deref())
            .await;
        *known_repo = Some(repo);
        found
    }

    async fn try_compare(&self, package: &str, repo: &RepoLocator) -> Option<String> {
        let versions = self.registry.outdated_versions(package).await?;

        for prefix in TAG_PREFIXES {
            let url = build_compare_url_at(
                &self.config.web_url,
                &repo.owner,
                &repo.repo,
                &format!("{}{}", prefix, versions.current),
                &format!("{}{}", prefix, versions.latest),
            );
            if self.prober.exists(&url).await {
                return Some(url);
            }
        }

        debug!("No valid compare URL found for any tag format");
        None
    }

    async fn probe_branches(
        &self,
        owner: &str,
        repo: &str,
        subpath: Option<&str>,
    ) -> Option<String> {
        for branch in DEFAULT_BRANCHES {
            let url =
                build_raw_changelog_url_at(&self.config.raw_url, owner, repo, branch, subpath);
            if self.prober.exists(&url).await {
                return Some(url);
            }
        }
        None
    }
}
