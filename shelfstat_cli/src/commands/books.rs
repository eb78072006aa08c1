use anyhow::Result;
use clap::Args;
use shelfstat_lib::{validation, PipelineConfig};

use crate::output::{print_books, OutputFormat};

#[derive(Args)]
pub struct BooksArgs {
    /// Genre name, case-insensitive (e.g. "science fiction")
    #[arg(long)]
    pub genre: String,
}

pub fn run(args: &BooksArgs, config: &PipelineConfig, format: &OutputFormat) -> Result<()> {
    let genre = validation::validate_genre_name(&args.genre)?;
    let db = super::open_existing_db(config)?;
    let books = db.books_for_genre(&genre)?;
    if books.is_empty() {
        eprintln!("No books stored for genre '{}'", genre);
        return Ok(());
    }
    print_books(&books, format)
}
