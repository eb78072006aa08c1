use anyhow::{bail, Result};
use clap::Args;
use shelfstat_lib::{Db, PipelineConfig};

use crate::chart::{bar_chart, share_chart};

#[derive(Args)]
pub struct ChartsArgs {
    /// Which charts to draw: all, genres, top, ratings
    #[arg(long, default_value = "all")]
    pub kind: String,
}

/// Books per rating bucket, as counts and as shares of the library.
pub fn ratings_charts(db: &Db) -> Result<String> {
    let data: Vec<(String, i64)> = db
        .rating_distribution()?
        .into_iter()
        .map(|b| (b.label(), b.count))
        .collect();
    Ok(format!(
        "{}\n{}",
        bar_chart("Books per rating", &data),
        share_chart("Share of books per rating", &data)
    ))
}

/// Total books per genre.
pub fn genre_chart(db: &Db) -> Result<String> {
    Ok(bar_chart("Books per genre", &db.genre_counts()?))
}

/// Each genre's share of all top-rated books.
pub fn top_chart(db: &Db) -> Result<String> {
    Ok(share_chart("Top rated books per genre", &db.genre_top_counts()?))
}

pub fn render(db: &Db, kind: &str) -> Result<String> {
    let out = match kind.trim().to_lowercase().as_str() {
        "all" => format!("{}\n{}\n{}", genre_chart(db)?, top_chart(db)?, ratings_charts(db)?),
        "genres" => genre_chart(db)?,
        "top" => top_chart(db)?,
        "ratings" => ratings_charts(db)?,
        other => bail!(
            "unknown chart kind '{}'. Valid values: all, genres, top, ratings",
            other
        ),
    };
    Ok(out)
}

pub fn run(args: &ChartsArgs, config: &PipelineConfig) -> Result<()> {
    let db = super::open_existing_db(config)?;
    print!("{}", render(&db, &args.kind)?);
    Ok(())
}
