//! Pipeline settings with defaults and environment overrides.

use std::path::PathBuf;

use goodreads_api::DEFAULT_BASE_URL;

use crate::cache::FlushPolicy;
use crate::error::ShelfStatError;
use crate::validation;

/// Entry-point listing page, relative to the base URL.
pub const DEFAULT_ENTRY_PATH: &str = "/genres/list?utf8=%E2%9C%93&filter=none";
pub const DEFAULT_TOP_GENRES: usize = 4;
pub const DEFAULT_BOOKS_PER_GENRE: usize = 5;
pub const DEFAULT_TOP_RATING: f64 = 4.60;
pub const DEFAULT_CACHE_PATH: &str = "practice_library.json";
pub const DEFAULT_DB_PATH: &str = "genre_library.sqlite";

/// How `GenreRecord::top_rated_count` is computed once books are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopRatedMode {
    /// Length of the already-truncated book list, whatever the ratings.
    #[default]
    ListLength,
    /// Books in the list rated at or above `PipelineConfig::top_rating`.
    Threshold,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_url: String,
    pub entry_path: String,
    /// How many genres survive top-genre selection.
    pub top_genres: usize,
    /// Per-genre cap on ranked books.
    pub books_per_genre: usize,
    pub top_rating: f64,
    pub top_rated_mode: TopRatedMode,
    pub cache_path: PathBuf,
    pub flush_policy: FlushPolicy,
    pub db_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            entry_path: DEFAULT_ENTRY_PATH.to_string(),
            top_genres: DEFAULT_TOP_GENRES,
            books_per_genre: DEFAULT_BOOKS_PER_GENRE,
            top_rating: DEFAULT_TOP_RATING,
            top_rated_mode: TopRatedMode::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            flush_policy: FlushPolicy::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `SHELFSTAT_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_string("SHELFSTAT_BASE_URL", &defaults.base_url),
            entry_path: env_string("SHELFSTAT_ENTRY_PATH", &defaults.entry_path),
            top_genres: env_checked(
                "SHELFSTAT_TOP_GENRES",
                env_usize("SHELFSTAT_TOP_GENRES", defaults.top_genres),
                defaults.top_genres,
                validation::validate_top_n,
            ),
            books_per_genre: env_checked(
                "SHELFSTAT_BOOKS_PER_GENRE",
                env_usize("SHELFSTAT_BOOKS_PER_GENRE", defaults.books_per_genre),
                defaults.books_per_genre,
                validation::validate_books_per_genre,
            ),
            top_rating: env_checked(
                "SHELFSTAT_TOP_RATING",
                env_f64("SHELFSTAT_TOP_RATING", defaults.top_rating),
                defaults.top_rating,
                validation::validate_rating,
            ),
            top_rated_mode: defaults.top_rated_mode,
            cache_path: std::env::var_os("SHELFSTAT_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            flush_policy: defaults.flush_policy,
            db_path: std::env::var_os("SHELFSTAT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        }
    }

    /// Absolute URL of the first genre listing page.
    pub fn entry_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.entry_path.trim_start_matches('/')
        )
    }
}

fn env_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    env_parse(key, default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_parse(key, default)
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!("{}={:?} is not valid, using {}", key, raw, default);
            default
        }
    }
}

/// Keeps `value` if `check` accepts it, otherwise warns and falls back to `default`.
fn env_checked<T>(
    key: &str,
    value: T,
    default: T,
    check: fn(T) -> Result<T, ShelfStatError>,
) -> T
where
    T: std::fmt::Display + Copy,
{
    match check(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("{}={} rejected ({}), using {}", key, value, e, default);
            default
        }
    }
}
