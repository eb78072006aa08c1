mod chart;
mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelfstat_lib::{validation, PipelineConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "shelfstat")]
#[command(about = "Scrape Goodreads genres and their most-read books into SQLite")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// SQLite database path (default: $SHELFSTAT_DB_PATH or genre_library.sqlite)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the top genres and their most-read books into the database
    Scrape(commands::scrape::ScrapeArgs),
    /// List stored genres
    Genres,
    /// List the stored top books of one genre
    Books(commands::books::BooksArgs),
    /// Draw text charts from the stored library
    Charts(commands::charts::ChartsArgs),
    /// Browse charts and books interactively
    Menu,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelfstat=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&validation::validate_output_format(&cli.output)?);

    let mut config = PipelineConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match &cli.command {
        Commands::Scrape(args) => commands::scrape::run(args, config, &format).await?,
        Commands::Genres => commands::genres::run(&config, &format)?,
        Commands::Books(args) => commands::books::run(args, &config, &format)?,
        Commands::Charts(args) => commands::charts::run(args, &config)?,
        Commands::Menu => commands::menu::run(&config)?,
    }

    Ok(())
}
