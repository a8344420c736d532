//! Runtime configuration: where to probe and how long to wait.

use std::path::PathBuf;
use std::time::Duration;

/// Public CDN that mirrors published npm tarballs file by file.
pub const DEFAULT_MIRROR_URL: &str = "https://unpkg.com";

/// Host serving raw repository contents.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// GitHub web UI, used for compare views.
pub const DEFAULT_WEB_URL: &str = "https://github.com";

/// Timeout for a single existence probe.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single registry subprocess.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_NPM_COMMAND: &str = "npm";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mirror_url: String,
    pub raw_url: String,
    pub web_url: String,
    pub http_timeout: Duration,
    pub command_timeout: Duration,
    /// Executable used for registry lookups.
    pub npm: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            npm: PathBuf::from(DEFAULT_NPM_COMMAND),
        }
    }
}

impl Config {
    pub fn with_mirror_url(mut self, url: impl Into<String>) -> Self {
        self.mirror_url = trim_base(url.into());
        self
    }

    pub fn with_raw_url(mut self, url: impl Into<String>) -> Self {
        self.raw_url = trim_base(url.into());
        self
    }

    pub fn with_web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = trim_base(url.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_npm(mut self, npm: impl Into<PathBuf>) -> Self {
        self.npm = npm.into();
        self
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
