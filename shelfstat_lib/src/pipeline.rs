//! The scrape-and-aggregate pipeline: page discovery, genre extraction,
//! top-genre selection, most-read link resolution, and book aggregation.
//!
//! Stages run strictly in sequence, one request at a time. Each stage takes
//! the previous stage's output; nothing feeds back.

use crate::config::{PipelineConfig, TopRatedMode};
use crate::error::ShelfStatError;
use crate::fetch::CachedFetcher;
use crate::models::{BookRecord, GenreRecord};
use crate::scrape;
use crate::validation::MAX_BOOKS_PER_GENRE;

/// Entry page followed by every further listing page, in pager order.
pub async fn discover_pages(
    fetcher: &mut CachedFetcher,
    entry_url: &str,
) -> Result<Vec<String>, ShelfStatError> {
    let html = fetcher.get_or_fetch(entry_url).await?;
    let rest = scrape::parse_pagination(&html, fetcher.client()).map_err(|e| {
        tracing::error!("No pager on {}: {}", entry_url, e);
        e
    })?;

    let mut pages = Vec::with_capacity(rest.len() + 1);
    pages.push(entry_url.to_string());
    pages.extend(rest);
    tracing::info!("Discovered {} genre listing pages", pages.len());
    Ok(pages)
}

/// Every genre block on every page, in page order then block order.
pub async fn extract_genres(
    fetcher: &mut CachedFetcher,
    pages: &[String],
) -> Result<Vec<GenreRecord>, ShelfStatError> {
    let mut genres = Vec::new();
    for page in pages {
        let html = fetcher.get_or_fetch(page).await?;
        let found = scrape::parse_genre_stats(&html, fetcher.client()).map_err(|e| {
            tracing::error!("Failed to parse genres on {}: {}", page, e);
            e
        })?;
        tracing::debug!("{} genres on {}", found.len(), page);
        genres.extend(found);
    }
    tracing::info!("Extracted {} genres", genres.len());
    Ok(genres)
}

/// The `n` genres with the most books, ties kept in discovery order.
pub fn select_top(genres: &[GenreRecord], n: usize) -> Vec<GenreRecord> {
    let mut ranked = genres.to_vec();
    ranked.sort_by(|a, b| b.book_count.cmp(&a.book_count));
    ranked.truncate(n);
    ranked
}

/// Sets `most_read_link` on each genre from its detail page. A page without
/// the heading, or whose heading has no usable link, leaves it `None`.
/// Transport failures still propagate.
pub async fn resolve_most_read(
    fetcher: &mut CachedFetcher,
    genres: &mut [GenreRecord],
) -> Result<(), ShelfStatError> {
    for genre in genres.iter_mut() {
        let html = fetcher.get_or_fetch(&genre.detail_link).await?;
        genre.most_read_link = scrape::parse_most_read_link(&html, fetcher.client());
        if genre.most_read_link.is_none() {
            tracing::warn!("No most-read list for genre {}", genre.name);
        }
    }
    Ok(())
}

/// Highest-rated books first, cut to `limit`. Equal ratings keep input order.
pub fn rank_books(mut books: Vec<BookRecord>, limit: usize) -> Vec<BookRecord> {
    books.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    books.truncate(limit);
    books
}

/// How many of `books` count as top rated under `mode`.
pub fn top_rated_count(books: &[BookRecord], mode: TopRatedMode, threshold: f64) -> u64 {
    match mode {
        TopRatedMode::ListLength => books.len() as u64,
        TopRatedMode::Threshold => books.iter().filter(|b| b.rating >= threshold).count() as u64,
    }
}

/// Fills `books` for every genre that has a most-read link, then sets
/// `top_rated_count` on all genres. Any book page missing an expected element
/// fails the whole stage.
///
/// At most [`MAX_BOOKS_PER_GENRE`] books are kept per genre, whatever
/// `config.books_per_genre` says.
pub async fn aggregate_books(
    fetcher: &mut CachedFetcher,
    genres: &mut [GenreRecord],
    config: &PipelineConfig,
) -> Result<(), ShelfStatError> {
    let limit = config.books_per_genre.min(MAX_BOOKS_PER_GENRE);
    for genre in genres.iter_mut() {
        let Some(most_read) = genre.most_read_link.clone() else {
            continue;
        };

        let html = fetcher.get_or_fetch(&most_read).await?;
        let covers = scrape::parse_cover_links(&html, fetcher.client())?;

        let mut books = Vec::with_capacity(covers.len());
        for book_url in &covers {
            let page = fetcher.get_or_fetch(book_url).await?;
            let book = scrape::parse_book_detail(&page, fetcher.client(), &genre.name)
                .map_err(|e| {
                    tracing::error!("Failed to parse book page {}: {}", book_url, e);
                    e
                })?;
            books.push(book);
        }

        genre.books = rank_books(books, limit);
        tracing::debug!(
            "Kept {} of {} books for {}",
            genre.books.len(),
            covers.len(),
            genre.name
        );
    }

    for genre in genres.iter_mut() {
        genre.top_rated_count =
            top_rated_count(&genre.books, config.top_rated_mode, config.top_rating);
    }
    Ok(())
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DiscoverPages,
    ExtractGenres,
    SelectTop,
    ResolveMostRead,
    AggregateBooks,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::DiscoverPages,
        Stage::ExtractGenres,
        Stage::SelectTop,
        Stage::ResolveMostRead,
        Stage::AggregateBooks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::DiscoverPages => "discovering listing pages",
            Stage::ExtractGenres => "extracting genres",
            Stage::SelectTop => "selecting top genres",
            Stage::ResolveMostRead => "resolving most-read links",
            Stage::AggregateBooks => "fetching book pages",
        }
    }
}

/// Runs every stage and returns the selected genres with their books.
pub async fn run_pipeline(
    fetcher: &mut CachedFetcher,
    config: &PipelineConfig,
) -> Result<Vec<GenreRecord>, ShelfStatError> {
    run_pipeline_with_progress(fetcher, config, |_| {}).await
}

/// Like [`run_pipeline`], calling `on_stage` as each stage starts.
///
/// Pages fetched before a failure are still written to the cache, so a rerun
/// picks up where the failed one stopped fetching.
pub async fn run_pipeline_with_progress<F>(
    fetcher: &mut CachedFetcher,
    config: &PipelineConfig,
    mut on_stage: F,
) -> Result<Vec<GenreRecord>, ShelfStatError>
where
    F: FnMut(Stage),
{
    let result = run_stages(fetcher, config, &mut on_stage).await;
    let flushed = fetcher.finish();
    if let (Err(run_err), Err(flush_err)) = (&result, &flushed) {
        tracing::warn!(
            "Could not save page cache after failed run ({}): {}",
            run_err,
            flush_err
        );
    }
    let top = result?;
    let stats = flushed?;
    tracing::info!(
        "Pipeline finished: {} genres, {} cache hits, {} fetches",
        top.len(),
        stats.hits,
        stats.misses
    );
    Ok(top)
}

async fn run_stages<F>(
    fetcher: &mut CachedFetcher,
    config: &PipelineConfig,
    on_stage: &mut F,
) -> Result<Vec<GenreRecord>, ShelfStatError>
where
    F: FnMut(Stage),
{
    on_stage(Stage::DiscoverPages);
    let pages = discover_pages(fetcher, &config.entry_url()).await?;
    on_stage(Stage::ExtractGenres);
    let all = extract_genres(fetcher, &pages).await?;
    on_stage(Stage::SelectTop);
    let mut top = select_top(&all, config.top_genres);
    on_stage(Stage::ResolveMostRead);
    resolve_most_read(fetcher, &mut top).await?;
    on_stage(Stage::AggregateBooks);
    aggregate_books(fetcher, &mut top, config).await?;
    Ok(top)
}
