use anyhow::Result;
use shelfstat_lib::PipelineConfig;

use crate::output::{print_genres, OutputFormat};

pub fn run(config: &PipelineConfig, format: &OutputFormat) -> Result<()> {
    let db = super::open_existing_db(config)?;
    let genres = db.load_library()?;
    if genres.is_empty() {
        eprintln!("No genres stored in {}", config.db_path.display());
        return Ok(());
    }
    print_genres(&genres, format)
}
