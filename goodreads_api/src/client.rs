//! HTTP client for fetching Goodreads pages as HTML text.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Production site root. Site-relative links are resolved against it.
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// HTTP client for Goodreads HTML pages.
///
/// Sends plain GET requests with browser-like headers and a randomized user
/// agent. No cookies, no authentication, no retries: a failed request is
/// returned to the caller as-is.
pub struct Client {
    /// Root that relative hrefs are joined against. Defaults to `https://www.goodreads.com`.
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production site.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl(base_url.to_string())
        })?;
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self { base_url, http })
    }

    /// The root URL relative links are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Turns a site-relative href (e.g. `/genres/fantasy`) into an absolute URL.
    /// Absolute hrefs are returned normalized but otherwise unchanged.
    pub fn resolve(&self, href: &str) -> Result<String, Error> {
        resolve_against(&self.base_url, href)
    }

    /// Fetches `url` and returns the response body as text.
    pub async fn get_html(&self, url: &str) -> Result<String, Error> {
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", url, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request to {} failed with status {}", url, status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn resolve_against(base: &Url, href: &str) -> Result<String, Error> {
    let href = href.trim();
    if href.is_empty() {
        return Err(Error::InvalidUrl(href.to_string()));
    }
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|_| Error::InvalidUrl(href.to_string()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
