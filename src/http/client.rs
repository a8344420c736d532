//! HTTP client used to check whether candidate URLs exist.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, redirect::Policy};
use std::time::Duration;

/// Maximum number of redirects followed by a single probe.
const MAX_REDIRECTS: usize = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlProber: Send + Sync {
    /// Returns `true` only if `url` answers `200 OK`.
    /// Transport errors, timeouts and malformed URLs all yield `false`.
    async fn exists(&self, url: &str) -> bool;
}

/// Thin wrapper around a reqwest `Client` configured for HEAD probes.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that follows redirects and gives up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("changelogger/", env!("CHANGELOGGER_VERSION")))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl UrlProber for HttpClient {
    #[tracing::instrument(skip(self))]
    async fn exists(&self, url: &str) -> bool {
        debug!("Checking URL exists: {}", url);

        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                let exists = status == StatusCode::OK;
                debug!(
                    "URL {} (status: {})",
                    if exists { "exists" } else { "does not exist" },
                    status
                );
                exists
            }
            Err(e) => {
                debug!("Request to {} failed: {}", url, e);
                false
            }
        }
    }
}
