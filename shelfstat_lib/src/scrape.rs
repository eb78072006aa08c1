//! HTML parsers for Goodreads genre listings, genre pages, most-read pages
//! and book pages.
//!
//! Every parser is synchronous and returns owned data, so no parsed document
//! is held across an `.await` in the pipeline.

use goodreads_api::Client;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{BookRecord, GenreRecord};

/// Exact text of the genre-page heading that links to the weekly most-read list.
pub const MOST_READ_HEADING: &str = "Most Read This Week";

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("http error: {0}")]
    Api(#[from] goodreads_api::Error),
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("parse error: {0}")]
    Parse(String),
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("selector {}: {:?}", css, e)))
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>, ScrapeError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

fn require<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ScrapeError> {
    first(scope, css)?.ok_or_else(|| ScrapeError::MissingElement(css.to_string()))
}

fn href<'a>(el: ElementRef<'a>, what: &str) -> Result<&'a str, ScrapeError> {
    el.value()
        .attr("href")
        .ok_or_else(|| ScrapeError::MissingElement(format!("href on {}", what)))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Links to the listing pages after the entry page, in page order.
///
/// The pager is the second-to-last `div` inside `div.leftContainer`; its last
/// link is "next" and is dropped.
pub fn parse_pagination(html: &str, client: &Client) -> Result<Vec<String>, ScrapeError> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let container = require(root, "div.leftContainer")?;

    let div_sel = selector("div")?;
    let divs: Vec<ElementRef<'_>> = container
        .select(&div_sel)
        .filter(|d| d.id() != container.id())
        .collect();
    if divs.len() < 2 {
        return Err(ScrapeError::MissingElement(
            "pagination block in div.leftContainer".into(),
        ));
    }
    let pager = divs[divs.len() - 2];

    let a_sel = selector("a")?;
    let anchors: Vec<ElementRef<'_>> = pager.select(&a_sel).collect();
    let Some((_next, pages)) = anchors.split_last() else {
        return Ok(Vec::new());
    };

    pages
        .iter()
        .map(|a| -> Result<String, ScrapeError> {
            Ok(client.resolve(href(*a, "pagination link")?)?)
        })
        .collect()
}

/// Genre records from one listing page, in block order.
pub fn parse_genre_stats(html: &str, client: &Client) -> Result<Vec<GenreRecord>, ScrapeError> {
    let doc = Html::parse_document(html);
    let stat_sel = selector("div.shelfStat")?;

    let mut genres = Vec::new();
    for stat in doc.select(&stat_sel) {
        let link = require(stat, "a")?;
        let name = text_of(link);
        let detail_link = client.resolve(href(link, "genre link")?)?;
        let label = require(stat, "div.smallText.greyText")?;
        let book_count = parse_book_count(&text_of(label))?;
        genres.push(GenreRecord::new(name.trim(), detail_link, book_count));
    }
    Ok(genres)
}

/// Parses a count label such as `"12,345 books"` into `12345`.
pub fn parse_book_count(label: &str) -> Result<u64, ScrapeError> {
    let re = Regex::new(r"^([\d,]+)\s*books?$")
        .map_err(|e| ScrapeError::Parse(format!("regex compile error: {}", e)))?;
    let trimmed = label.trim();
    let digits = re
        .captures(trimmed)
        .and_then(|cap| cap.get(1))
        .ok_or_else(|| ScrapeError::Parse(format!("invalid book count label {:?}", label)))?;
    digits
        .as_str()
        .replace(',', "")
        .parse()
        .map_err(|_| ScrapeError::Parse(format!("invalid book count label {:?}", label)))
}

/// Absolute link under the "Most Read This Week" heading of a genre page, or
/// `None` when the heading is absent.
///
/// When several headings match, the last one decides: a matching heading with
/// no usable link yields `None` even if an earlier one had a link.
pub fn parse_most_read_link(html: &str, client: &Client) -> Option<String> {
    let doc = Html::parse_document(html);
    let h2_sel = Selector::parse("h2").ok()?;
    let a_sel = Selector::parse("a").ok()?;

    doc.select(&h2_sel)
        .filter(|h| text_of(*h) == MOST_READ_HEADING)
        .map(|h| {
            let link = h.select(&a_sel).next()?;
            let raw = link.value().attr("href")?;
            client.resolve(raw).ok()
        })
        .last()
        .flatten()
}

/// Absolute book page links from a most-read page, one per cover block.
pub fn parse_cover_links(html: &str, client: &Client) -> Result<Vec<String>, ScrapeError> {
    let doc = Html::parse_document(html);
    let cover_sel = selector("div.coverWrapper")?;

    doc.select(&cover_sel)
        .map(|cover| -> Result<String, ScrapeError> {
            let link = require(cover, "a")?;
            Ok(client.resolve(href(link, "cover link")?)?)
        })
        .collect()
}

/// Title, author, rating and store link from a single book page.
pub fn parse_book_detail(
    html: &str,
    client: &Client,
    genre_name: &str,
) -> Result<BookRecord, ScrapeError> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let title = text_of(require(root, "h1#bookTitle")?).trim().to_string();
    let author = text_of(require(root, "a.authorName")?).trim().to_string();

    let meta = require(root, "div#bookMeta")?;
    let rating_text = text_of(require(meta, r#"span[itemprop="ratingValue"]"#)?);
    let rating = parse_rating(&rating_text)?;

    let stores = require(root, "div#buyDropButtonStores")?;
    let purchase_link = client.resolve(href(require(stores, "a")?, "store link")?)?;

    Ok(BookRecord {
        title,
        author,
        rating,
        purchase_link,
        genre_name: genre_name.to_string(),
    })
}

fn parse_rating(raw: &str) -> Result<f64, ScrapeError> {
    let rating: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ScrapeError::Parse(format!("invalid rating {:?}", raw.trim())))?;
    if !(0.0..=5.0).contains(&rating) {
        return Err(ScrapeError::Parse(format!("rating {} out of range", rating)));
    }
    Ok(rating)
}
