//! CLI subcommand implementations.

pub mod books;
pub mod charts;
pub mod genres;
pub mod menu;
pub mod scrape;

use anyhow::{bail, Result};
use shelfstat_lib::{Db, PipelineConfig};

/// Opens the configured database, refusing to create an empty one for read-only commands.
fn open_existing_db(config: &PipelineConfig) -> Result<Db> {
    if !config.db_path.exists() {
        bail!(
            "no database at {}; run `shelfstat scrape` first",
            config.db_path.display()
        );
    }
    let db = Db::open(&config.db_path)?;
    db.init()?;
    Ok(db)
}
