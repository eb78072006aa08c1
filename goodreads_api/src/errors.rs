//! Error types for the HTML client.

/// Errors that can occur when fetching pages from the site.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The site returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// A link or base URL could not be turned into an absolute URL.
    #[error("Invalid URL {0}")]
    InvalidUrl(String),
}
