use anyhow::Result;
use serde::Serialize;
use shelfstat_lib::{BookRecord, GenreRecord};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Maps an already validated format name; anything unknown falls back to a table.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct GenreRow {
    #[tabled(rename = "Genre")]
    #[serde(rename = "Genre")]
    name: String,
    #[tabled(rename = "Books")]
    #[serde(rename = "Books")]
    book_count: String,
    #[tabled(rename = "Top Rated")]
    #[serde(rename = "Top Rated")]
    top_rated: u64,
    #[tabled(rename = "Most Read")]
    #[serde(rename = "Most Read")]
    most_read: String,
}

#[derive(Tabled, Serialize)]
struct BookRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    #[serde(rename = "Author")]
    author: String,
    #[tabled(rename = "Rating")]
    #[serde(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Genre")]
    #[serde(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Stores")]
    #[serde(rename = "Stores")]
    stores: String,
}

fn build_genre_rows(genres: &[GenreRecord]) -> Vec<GenreRow> {
    genres
        .iter()
        .map(|g| GenreRow {
            name: g.name.clone(),
            book_count: format_count(g.book_count),
            top_rated: g.top_rated_count,
            most_read: g.most_read_link.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn build_book_rows(books: &[BookRecord]) -> Vec<BookRow> {
    books
        .iter()
        .map(|b| BookRow {
            title: b.title.clone(),
            author: b.author.clone(),
            rating: format!("{:.2}", b.rating),
            genre: b.genre_name.clone(),
            stores: b.purchase_link.clone(),
        })
        .collect()
}

pub fn print_genres(genres: &[GenreRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_genre_rows(genres))),
        OutputFormat::Markdown => {
            let mut table = Table::new(build_genre_rows(genres));
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => print_csv(build_genre_rows(genres))?,
        OutputFormat::Json => print_json(&genres),
    }
    Ok(())
}

pub fn print_books(books: &[BookRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_book_rows(books))),
        OutputFormat::Markdown => {
            let mut table = Table::new(build_book_rows(books));
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => print_csv(build_book_rows(books))?,
        OutputFormat::Json => print_json(&books),
    }
    Ok(())
}

fn print_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
