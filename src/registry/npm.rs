//! npm CLI implementation of [`MetadataProvider`].

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{MetadataProvider, VersionPair};
use crate::config::Config;

/// Subset of `npm view --json` we care about.
#[derive(Debug, Deserialize)]
struct PackageView {
    #[serde(default)]
    bugs: Option<Bugs>,
}

/// `bugs` is either an object with a `url` or a bare URL string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Bugs {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

/// One record of `npm outdated --json`.
#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    latest: Option<String>,
}

#[derive(Debug)]
struct CommandOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Runs `npm` as a subprocess, one bounded invocation per lookup.
pub struct NpmRegistry {
    npm: PathBuf,
    timeout: Duration,
}

impl NpmRegistry {
    pub fn new(npm: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            npm: npm.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.npm.clone(), config.command_timeout)
    }

    #[tracing::instrument(skip(self))]
    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("Running {} {}", self.npm.display(), args.join(" "));

        let child = Command::new(&self.npm)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to run {}", self.npm.display()))?;

        // Dropping the timed-out future drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                anyhow!(
                    "{} {} timed out after {}s",
                    self.npm.display(),
                    args.first().unwrap_or(&""),
                    self.timeout.as_secs_f32()
                )
            })?
            .with_context(|| format!("Failed to read output of {}", self.npm.display()))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn lookup_bugs_url(&self, package: &str) -> Result<Option<String>> {
        let output = self.run(&["view", package, "--json"]).await?;
        if !output.success {
            anyhow::bail!("npm view failed: {}", output.stderr.trim());
        }
        parse_bugs_url(&output.stdout)
    }

    async fn lookup_repository_url(&self, package: &str) -> Result<Option<String>> {
        let output = self.run(&["repo", package, "--no-browser"]).await?;
        if !output.success {
            anyhow::bail!("npm repo failed: {}", output.stderr.trim());
        }
        Ok(parse_repository_url(&output.stdout))
    }

    async fn lookup_outdated(&self, package: &str) -> Result<Option<VersionPair>> {
        // Exit status 1 means "something is outdated"; only stdout matters.
        let output = self.run(&["outdated", package, "--json"]).await?;
        parse_outdated(&output.stdout, package)
    }
}

#[async_trait]
impl MetadataProvider for NpmRegistry {
    async fn bugs_url(&self, package: &str) -> Option<String> {
        debug!("Getting bugs URL for package: {}", package);
        match self.lookup_bugs_url(package).await {
            Ok(Some(url)) => {
                debug!("Found bugs URL: {}", url);
                Some(url)
            }
            Ok(None) => {
                debug!("No bugs URL found in package data");
                None
            }
            Err(e) => {
                debug!("Bugs URL lookup failed: {:#}", e);
                None
            }
        }
    }

    async fn repository_url(&self, package: &str) -> Option<String> {
        debug!("Getting repo URL for package: {}", package);
        match self.lookup_repository_url(package).await {
            Ok(Some(url)) => {
                debug!("Found repo URL: {}", url);
                Some(url)
            }
            Ok(None) => {
                debug!("No valid URL found in npm repo output");
                None
            }
            Err(e) => {
                debug!("Repo URL lookup failed: {:#}", e);
                None
            }
        }
    }

    async fn outdated_versions(&self, package: &str) -> Option<VersionPair> {
        debug!("Getting outdated versions for package: {}", package);
        match self.lookup_outdated(package).await {
            Ok(Some(versions)) => {
                debug!("Found outdated package: {}", versions);
                Some(versions)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Outdated lookup failed: {:#}", e);
                None
            }
        }
    }
}

/// Extracts `bugs.url` from `npm view --json` output.
///
/// When several versions match, npm prints an array; the last entry wins.
pub fn parse_bugs_url(stdout: &str) -> Result<Option<String>> {
    let value: Value =
        serde_json::from_str(stdout).context("Failed to parse npm view output")?;

    let value = match value {
        Value::Array(mut items) => match items.pop() {
            Some(last) => last,
            None => return Ok(None),
        },
        other => other,
    };

    let view: PackageView =
        serde_json::from_value(value).context("Unexpected npm view output")?;

    let url = match view.bugs {
        Some(Bugs::Url(url)) => Some(url),
        Some(Bugs::Object { url }) => url,
        None => None,
    };

    Ok(url.filter(|u| !u.trim().is_empty()))
}

/// Returns the first line of `npm repo` output that looks like a URL.
/// npm may print a banner line ahead of it.
pub fn parse_repository_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("http"))
        .map(str::to_string)
}

/// Finds the record for `package` in `npm outdated --json` output.
///
/// Returns `None` when the package is not installed, already current, or
/// the record lacks either version.
pub fn parse_outdated(stdout: &str, package: &str) -> Result<Option<VersionPair>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed == "{}" {
        debug!("Package is not installed or is up to date");
        return Ok(None);
    }

    let data: serde_json::Map<String, Value> =
        serde_json::from_str(trimmed).context("Failed to parse npm outdated output")?;

    // TODO: scoped names containing more than one '/' would need a stricter match than the suffix test.
    let suffix = format!("/{}", package);
    let record = data.get(package).filter(|v| !is_empty_record(v)).or_else(|| {
        data.iter()
            .find(|(key, _)| key.as_str() == package || key.ends_with(&suffix))
            .map(|(_, value)| value)
    });

    let Some(record) = record else {
        debug!("Package {} not found in outdated output", package);
        return Ok(None);
    };

    // Packages depended on from several places are reported as a list.
    let record = match record {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Ok(None),
        },
        other => other,
    };

    let entry: OutdatedEntry =
        serde_json::from_value(record.clone()).context("Unexpected npm outdated record")?;

    let (Some(current), Some(latest)) = (
        entry.current.filter(|v| !v.is_empty()),
        entry.latest.filter(|v| !v.is_empty()),
    ) else {
        debug!("Missing current or latest version in output");
        return Ok(None);
    };

    if current == latest {
        debug!("Package is already up to date");
        return Ok(None);
    }

    Ok(Some(VersionPair { current, latest }))
}

fn is_empty_record(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
