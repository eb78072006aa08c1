//! Error types for the library layer.

use std::fmt;

use crate::db::DbError;
use crate::scrape::ScrapeError;

/// Errors produced by the library layer, wrapping transport, parse and
/// storage failures and adding cache and input validation failures.
#[derive(Debug)]
pub enum ShelfStatError {
    /// An error from the underlying HTML client.
    Api(goodreads_api::Error),
    /// Expected markup was missing or a value could not be parsed.
    Scrape(ScrapeError),
    /// Writing the page cache to disk failed.
    Cache(String),
    /// A SQLite operation failed.
    Db(DbError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for ShelfStatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Scrape(e) => write!(f, "Scrape error: {}", e),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Db(e) => write!(f, "Database error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ShelfStatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Scrape(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<goodreads_api::Error> for ShelfStatError {
    fn from(e: goodreads_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ScrapeError> for ShelfStatError {
    fn from(e: ScrapeError) -> Self {
        Self::Scrape(e)
    }
}

impl From<DbError> for ShelfStatError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}

impl From<serde_json::Error> for ShelfStatError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
