use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use shelfstat_lib::goodreads_api::Client;
use shelfstat_lib::{
    run_pipeline_with_progress, validation, CacheLoad, CachedFetcher, Db, FlushPolicy, PageCache,
    PipelineConfig, Stage, TopRatedMode,
};

use crate::output::{print_genres, OutputFormat};

#[derive(Args)]
pub struct ScrapeArgs {
    /// Number of genres to keep, by book count
    #[arg(long)]
    pub top_genres: Option<usize>,

    /// Books kept per genre, best rated first
    #[arg(long)]
    pub books_per_genre: Option<usize>,

    /// Rating a book needs to count as top rated (with --strict-top-rated)
    #[arg(long)]
    pub top_rating: Option<f64>,

    /// Count only books at or above --top-rating as top rated
    #[arg(long)]
    pub strict_top_rated: bool,

    /// Page cache file
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Write the page cache after every fetched page instead of once at the end
    #[arg(long)]
    pub flush_every_miss: bool,

    /// Site root to scrape (for mirrors and testing)
    #[arg(long)]
    pub base_url: Option<String>,
}

fn apply_args(args: &ScrapeArgs, mut config: PipelineConfig) -> Result<PipelineConfig> {
    if let Some(n) = args.top_genres {
        config.top_genres = validation::validate_top_n(n)?;
    }
    if let Some(n) = args.books_per_genre {
        config.books_per_genre = validation::validate_books_per_genre(n)?;
    }
    if let Some(r) = args.top_rating {
        config.top_rating = validation::validate_rating(r)?;
    }
    if args.strict_top_rated {
        config.top_rated_mode = TopRatedMode::Threshold;
    }
    if let Some(ref path) = args.cache {
        config.cache_path = path.clone();
    }
    if args.flush_every_miss {
        config.flush_policy = FlushPolicy::EveryMiss;
    }
    if let Some(ref url) = args.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

pub async fn run(args: &ScrapeArgs, config: PipelineConfig, format: &OutputFormat) -> Result<()> {
    let config = apply_args(args, config)?;

    let (cache, load) = PageCache::open(&config.cache_path);
    match load {
        CacheLoad::Loaded { entries } => {
            eprintln!("Loaded {} cached pages from {}", entries, config.cache_path.display())
        }
        CacheLoad::Missing => eprintln!("No page cache yet at {}", config.cache_path.display()),
        CacheLoad::Corrupt { .. } => eprintln!(
            "Page cache at {} was unreadable, starting empty",
            config.cache_path.display()
        ),
    }

    let client = Client::with_base_url(&config.base_url)?;
    let mut fetcher = CachedFetcher::new(client, cache, config.flush_policy);

    let pb = ProgressBar::new(Stage::ALL.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    let mut started = 0;
    let result = run_pipeline_with_progress(&mut fetcher, &config, |stage| {
        pb.set_position(started);
        pb.set_message(stage.label());
        started += 1;
    })
    .await;

    let genres = match result {
        Ok(genres) => {
            pb.finish_with_message("done");
            genres
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            return Err(e.into());
        }
    };

    let mut db = Db::open(&config.db_path)?;
    db.init()?;
    db.save_library(&genres)?;

    let stats = fetcher.stats();
    let books: usize = genres.iter().map(|g| g.books.len()).sum();
    eprintln!(
        "Saved {} genres and {} books to {}",
        genres.len(),
        books,
        config.db_path.display()
    );
    eprintln!(
        "{} pages from cache, {} fetched; {} pages now cached in {}",
        stats.hits,
        stats.misses,
        fetcher.cache().len(),
        fetcher.cache().path().display()
    );

    print_genres(&genres, format)
}
