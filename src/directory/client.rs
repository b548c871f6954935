//! HTTP client for the community directory API.

use super::{DirectoryFetcher, Profile, ProfileFilter};
use crate::models::Dataset;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::cell::OnceCell;
use std::time::Duration;

/// Environment variable holding the directory API token.
pub const AUTH_TOKEN_ENV: &str = "RECURSE_AUTH_TOKEN";

/// Upper bound on pages fetched in one call.
const MAX_PAGES: usize = 10_000;

/// Supplies the API token the first time it is needed.
pub type TokenSource = Box<dyn Fn() -> Result<SecretString>>;

/// HTTP settings for the directory client.
#[derive(Debug, Clone)]
pub struct DirectoryHttpConfig {
    /// Profiles endpoint.
    pub api_url: String,
    /// Page size per request.
    pub page_limit: u64,
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for DirectoryHttpConfig {
    fn default() -> Self {
        Self {
            api_url: RecurseDirectoryClient::DEFAULT_API_URL.to_string(),
            page_limit: 15,
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: &DirectoryHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build directory HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Reads the API token from the environment, if set and non-empty.
#[must_use]
pub fn token_from_env() -> Option<SecretString> {
    std::env::var(AUTH_TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .map(|t| SecretString::from(t.trim().to_string()))
}

/// Directory client that pages through the profiles endpoint.
pub struct RecurseDirectoryClient {
    config: DirectoryHttpConfig,
    client: reqwest::blocking::Client,
    token: OnceCell<SecretString>,
    token_source: TokenSource,
}

impl RecurseDirectoryClient {
    /// Default profiles endpoint.
    pub const DEFAULT_API_URL: &'static str = "https://www.recurse.com/api/v1/profiles";

    /// Creates a client that asks `token_source` for the token on first use.
    #[must_use]
    pub fn new(config: DirectoryHttpConfig, token_source: TokenSource) -> Self {
        let client = build_http_client(&config);
        Self {
            config,
            client,
            token: OnceCell::new(),
            token_source,
        }
    }

    /// Creates a client with a known token.
    #[must_use]
    pub fn with_token(config: DirectoryHttpConfig, token: SecretString) -> Self {
        let this = Self::new(
            config,
            Box::new(|| -> Result<SecretString> {
                Err(Error::operation("directory_auth", "token source exhausted"))
            }),
        );
        let _ = this.token.set(token);
        this
    }

    fn token(&self) -> Result<&SecretString> {
        if let Some(token) = self.token.get() {
            return Ok(token);
        }
        let token = (self.token_source)()?;
        Ok(self.token.get_or_init(|| token))
    }

    /// Fetches one page of profiles.
    fn fetch_page(&self, offset: u64) -> Result<Vec<Profile>> {
        let token = self.token()?;

        tracing::debug!(offset, limit = self.config.page_limit, "Fetching directory page");

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("offset", offset), ("limit", self.config.page_limit)])
            .bearer_auth(token.expose_secret())
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    offset,
                    error = %e,
                    error_kind = error_kind,
                    "Directory request failed"
                );
                Error::operation("directory_request", format!("{error_kind} error: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(offset, status = %status, "Directory API returned error status");
            return Err(Error::operation(
                "directory_request",
                format!("API returned status: {status} - {body}"),
            ));
        }

        response.json().map_err(|e| {
            tracing::error!(offset, error = %e, "Failed to parse directory response");
            Error::operation("directory_response", e)
        })
    }

    /// Fetches every profile from `offset` until the API returns an empty page.
    fn fetch_all(&self, offset: u64) -> Result<Vec<Profile>> {
        let limit = self.config.page_limit.max(1);
        let mut offset = offset;
        let mut profiles = Vec::new();

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(offset)?;
            if page.is_empty() {
                tracing::info!(profiles = profiles.len(), "Fetched directory");
                return Ok(profiles);
            }
            profiles.extend(page);
            offset += limit;
        }

        Err(Error::operation(
            "directory_request",
            format!("gave up after {MAX_PAGES} pages"),
        ))
    }
}

impl DirectoryFetcher for RecurseDirectoryClient {
    fn fetch(&self, filter: &ProfileFilter, offset: u64) -> Result<Dataset> {
        let profiles = self.fetch_all(offset)?;
        Ok(super::reduce_profiles(profiles, filter))
    }
}
