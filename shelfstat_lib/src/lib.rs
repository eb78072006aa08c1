//! Library layer for shelfstat: cached page fetching, HTML parsing, the
//! genre/book pipeline, and SQLite persistence.
//!
//! Wraps the `goodreads_api` client with a JSON file cache keyed by URL, turns
//! genre listing pages into ranked genre and book records, and stores them in
//! the `Genres` and `Books` tables.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod validation;

pub use goodreads_api;

pub use cache::{CacheLoad, FlushPolicy, PageCache};
pub use config::{PipelineConfig, TopRatedMode};
pub use db::{Db, DbError, RatingBucket};
pub use error::ShelfStatError;
pub use fetch::{CachedFetcher, FetchStats};
pub use models::{BookRecord, GenreRecord};
pub use pipeline::{
    aggregate_books, discover_pages, extract_genres, rank_books, resolve_most_read, run_pipeline,
    run_pipeline_with_progress, select_top, top_rated_count, Stage,
};
pub use scrape::ScrapeError;
