//! Domain records produced by the pipeline and stored by [`crate::db::Db`].

use serde::{Deserialize, Serialize};

/// One genre from the listing pages, enriched as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRecord {
    /// Lower-cased display name. Not guaranteed unique across listing pages.
    pub name: String,
    /// Absolute URL of the genre's detail page.
    pub detail_link: String,
    pub book_count: u64,
    /// Absolute URL of the "Most Read This Week" page, if the detail page has one.
    pub most_read_link: Option<String>,
    /// At most `books_per_genre` books, highest rating first.
    pub books: Vec<BookRecord>,
    pub top_rated_count: u64,
}

impl GenreRecord {
    pub fn new(name: &str, detail_link: String, book_count: u64) -> Self {
        Self {
            name: name.to_lowercase(),
            detail_link,
            book_count,
            most_read_link: None,
            books: Vec::new(),
            top_rated_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Average reader rating, 0.0 to 5.0.
    pub rating: f64,
    /// Absolute URL of the store/purchase links page.
    pub purchase_link: String,
    /// Name of the owning genre.
    pub genre_name: String,
}

impl BookRecord {
    /// One-line description used by the interactive listing.
    pub fn info(&self) -> String {
        format!(
            "{} by {} has a rating of {}. Belongs to {}. Stores link is: {}",
            self.title, self.author, self.rating, self.genre_name, self.purchase_link
        )
    }
}
