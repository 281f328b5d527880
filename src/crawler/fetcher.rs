//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Rejecting non-http(s) targets before any network activity
//! - A single GET per target with timeout and redirect following
//! - Error classification

use crate::config::{Config, FetcherConfig, UserAgentConfig};
use crate::crawler::parser::parse_html;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use thiserror::Error;
use url::Url;

/// A fetched page reduced to what the resolver needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// `href` values of mailto anchors, in document order
    pub mailto_targets: Vec<String>,

    /// Visible page text
    pub text: String,
}

impl FetchedPage {
    /// Builds a page from an HTML body
    pub fn from_html(final_url: impl Into<String>, html: &str) -> Self {
        let parsed = parse_html(html);
        Self {
            final_url: final_url.into(),
            mailto_targets: parsed.mailto_targets,
            text: parsed.text,
        }
    }
}

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can turn a URL into a [`FetchedPage`]
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Returns true if `url` parses as an absolute http or https URL
pub fn is_http_url(url: &str) -> bool {
    Url::parse(url.trim())
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
        .unwrap_or(false)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetcher` - Timeout and redirect limits
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use email_enricher::config::{FetcherConfig, UserAgentConfig};
/// use email_enricher::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(fetcher.timeout())
        .redirect(Policy::limited(fetcher.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP with a shared client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(
            &config.user_agent,
            &config.fetcher,
        )?))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    /// Fetches a URL with a single GET
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Not http(s) | `InvalidUrl`, no request made |
    /// | Timeout | `Timeout` |
    /// | Non-2xx after redirects | `Status` |
    /// | Connect/TLS failure | `Transport` |
    /// | Body read failure | `Body` |
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = url.trim();
        if !is_http_url(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| match classify(url, e) {
            FetchError::Transport { url, source } => FetchError::Body { url, source },
            other => other,
        })?;

        Ok(FetchedPage::from_html(final_url, &body))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
