//! SQLite storage for scraped genres and books.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::models::{BookRecord, GenreRecord};

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Number of stored books whose rating falls in one chart bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    /// Upper label of the bucket; `4.0` collects everything rated below 4.0.
    pub bucket: f64,
    pub count: i64,
}

impl RatingBucket {
    pub fn label(&self) -> String {
        if self.bucket <= 4.0 {
            "< 4.0".to_string()
        } else {
            format!("{:.1}", self.bucket)
        }
    }
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Writes every genre and its books in one transaction. A genre already
    /// stored under the same name is replaced along with its books.
    pub fn save_library(&mut self, genres: &[GenreRecord]) -> Result<(), DbError> {
        let scraped_at = Utc::now().to_rfc3339();
        let names: BTreeSet<&str> = genres.iter().map(|g| g.name.as_str()).collect();

        let tx = self.conn.transaction()?;

        {
            let mut stmt_clear = tx.prepare("DELETE FROM Books WHERE Genre_Name = ?1")?;
            for name in &names {
                stmt_clear.execute(params![name])?;
            }

            let mut stmt_genre = tx.prepare(
                "INSERT INTO Genres (Name, Link, Count, Top_Books_Count, Most_Read_Link, Scraped_At)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(Name) DO UPDATE SET
                   Link = excluded.Link,
                   Count = excluded.Count,
                   Top_Books_Count = excluded.Top_Books_Count,
                   Most_Read_Link = excluded.Most_Read_Link,
                   Scraped_At = excluded.Scraped_At",
            )?;
            let mut stmt_book = tx.prepare(
                "INSERT INTO Books (Id, Title, Author, Rating, Link, Genre_Name)
                 VALUES (NULL, ?1, ?2, ?3, ?4, ?5)",
            )?;

            for genre in genres {
                stmt_genre.execute(params![
                    genre.name,
                    genre.detail_link,
                    genre.book_count as i64,
                    genre.top_rated_count as i64,
                    genre.most_read_link,
                    scraped_at,
                ])?;
                for book in &genre.books {
                    stmt_book.execute(params![
                        book.title,
                        book.author,
                        book.rating,
                        book.purchase_link,
                        genre.name,
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn genre_count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM Genres", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn book_count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM Books", [], |row| row.get(0))?;
        Ok(count)
    }

    /// (genre name, total books on the site), largest first.
    pub fn genre_counts(&self) -> Result<Vec<(String, i64)>, DbError> {
        self.name_value_pairs("SELECT Name, Count FROM Genres ORDER BY Count DESC, Name")
    }

    /// (genre name, top-rated book count), in the same order as [`genre_counts`](Self::genre_counts).
    pub fn genre_top_counts(&self) -> Result<Vec<(String, i64)>, DbError> {
        self.name_value_pairs(
            "SELECT Name, Top_Books_Count FROM Genres ORDER BY Count DESC, Name",
        )
    }

    fn name_value_pairs(&self, sql: &str) -> Result<Vec<(String, i64)>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Stored books grouped into rating buckets, lowest bucket first.
    pub fn rating_distribution(&self) -> Result<Vec<RatingBucket>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT CASE
                    WHEN Rating < 4.0 THEN 4.0
                    WHEN Rating <= 4.55 THEN 4.5
                    WHEN Rating <= 4.65 THEN 4.6
                    WHEN Rating <= 4.75 THEN 4.7
                    WHEN Rating <= 4.85 THEN 4.8
                    WHEN Rating <= 4.95 THEN 4.9
                    ELSE 5.0
                    END AS Bucket,
                    COUNT(*)
             FROM Books
             GROUP BY Bucket
             ORDER BY Bucket",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RatingBucket {
                bucket: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Books stored for `genre_name` (exact, already lower-cased), best rated first.
    pub fn books_for_genre(&self, genre_name: &str) -> Result<Vec<BookRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT Title, Author, Rating, Link, Genre_Name
             FROM Books
             WHERE Genre_Name = ?1
             ORDER BY Rating DESC, Id",
        )?;
        let rows = stmt.query_map(params![genre_name], book_from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Every stored genre with its books, largest genre first.
    pub fn load_library(&self) -> Result<Vec<GenreRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT Name, Link, Count, Top_Books_Count, Most_Read_Link
             FROM Genres
             ORDER BY Count DESC, Name",
        )?;
        let rows = stmt.query_map([], |row| {
            let count: i64 = row.get(2)?;
            let top: i64 = row.get(3)?;
            Ok(GenreRecord {
                name: row.get(0)?,
                detail_link: row.get(1)?,
                book_count: count.max(0) as u64,
                most_read_link: row.get(4)?,
                books: Vec::new(),
                top_rated_count: top.max(0) as u64,
            })
        })?;

        let mut genres = Vec::new();
        for row in rows {
            genres.push(row?);
        }
        for genre in &mut genres {
            genre.books = self.books_for_genre(&genre.name)?;
        }
        Ok(genres)
    }
}

fn book_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BookRecord> {
    Ok(BookRecord {
        title: row.get(0)?,
        author: row.get(1)?,
        rating: row.get(2)?,
        purchase_link: row.get(3)?,
        genre_name: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> Db {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db
    }

    fn has_column(db: &Db, table: &str, column: &str) -> bool {
        let sql = format!("PRAGMA table_info({})", table);
        let mut stmt = db.conn.prepare(&sql).expect("prepare pragma");
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query")
            .filter_map(|r| r.ok())
            .collect();
        names.contains(&column.to_string())
    }

    fn book(genre: &str, title: &str, rating: f64) -> BookRecord {
        BookRecord {
            title: title.into(),
            author: format!("{} author", title),
            rating,
            purchase_link: format!("https://www.goodreads.com/book/stores/{}", title),
            genre_name: genre.into(),
        }
    }

    fn genre(name: &str, count: u64, ratings: &[f64]) -> GenreRecord {
        let mut g = GenreRecord::new(
            name,
            format!("https://www.goodreads.com/genres/{}", name),
            count,
        );
        g.most_read_link = Some(format!("https://www.goodreads.com/genres/most_read/{}", name));
        g.books = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| book(name, &format!("{}-{}", name, i), *r))
            .collect();
        g.top_rated_count = g.books.len() as u64;
        g
    }

    #[test]
    fn test_init_creates_tables() {
        let db = open_test_db();
        for col in ["Name", "Link", "Count", "Top_Books_Count"] {
            assert!(has_column(&db, "Genres", col), "Genres missing {}", col);
        }
        for col in ["Id", "Title", "Author", "Rating", "Link", "Genre_Name"] {
            assert!(has_column(&db, "Books", col), "Books missing {}", col);
        }
    }

    #[test]
    fn test_init_idempotent() {
        let db = open_test_db();
        db.init().expect("second init should not error");
    }

    #[test]
    fn test_save_library_counts() {
        let mut db = open_test_db();
        db.save_library(&[genre("fantasy", 200, &[4.5, 4.1]), genre("poetry", 50, &[])])
            .unwrap();
        assert_eq!(db.genre_count().unwrap(), 2);
        assert_eq!(db.book_count().unwrap(), 2);
    }

    #[test]
    fn test_book_ids_autogenerated() {
        let mut db = open_test_db();
        db.save_library(&[genre("fantasy", 200, &[4.5, 4.1, 3.9])]).unwrap();
        let ids: Vec<i64> = db
            .conn
            .prepare("SELECT Id FROM Books ORDER BY Id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_resave_replaces_genre_and_books() {
        let mut db = open_test_db();
        db.save_library(&[genre("fantasy", 200, &[4.5, 4.1])]).unwrap();
        db.save_library(&[genre("fantasy", 250, &[4.9])]).unwrap();

        assert_eq!(db.genre_count().unwrap(), 1);
        assert_eq!(db.genre_counts().unwrap(), vec![("fantasy".to_string(), 250)]);
        let books = db.books_for_genre("fantasy").unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].rating, 4.9);
    }

    #[test]
    fn test_save_keeps_unrelated_genres() {
        let mut db = open_test_db();
        db.save_library(&[genre("poetry", 50, &[4.0])]).unwrap();
        db.save_library(&[genre("fantasy", 200, &[4.5])]).unwrap();
        assert_eq!(db.genre_count().unwrap(), 2);
        assert_eq!(db.books_for_genre("poetry").unwrap().len(), 1);
    }

    #[test]
    fn test_genre_counts_ordered() {
        let mut db = open_test_db();
        db.save_library(&[
            genre("poetry", 50, &[]),
            genre("fantasy", 200, &[4.5, 4.6]),
            genre("romance", 100, &[4.7]),
        ])
        .unwrap();

        assert_eq!(
            db.genre_counts().unwrap(),
            vec![
                ("fantasy".to_string(), 200),
                ("romance".to_string(), 100),
                ("poetry".to_string(), 50),
            ]
        );
        assert_eq!(
            db.genre_top_counts().unwrap(),
            vec![
                ("fantasy".to_string(), 2),
                ("romance".to_string(), 1),
                ("poetry".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_books_for_genre_sorted_by_rating() {
        let mut db = open_test_db();
        db.save_library(&[genre("fantasy", 200, &[4.1, 4.8, 4.5])]).unwrap();
        let ratings: Vec<f64> = db
            .books_for_genre("fantasy")
            .unwrap()
            .iter()
            .map(|b| b.rating)
            .collect();
        assert_eq!(ratings, vec![4.8, 4.5, 4.1]);
    }

    #[test]
    fn test_books_for_unknown_genre_empty() {
        let db = open_test_db();
        assert!(db.books_for_genre("nope").unwrap().is_empty());
    }

    #[test]
    fn test_rating_distribution_buckets() {
        let mut db = open_test_db();
        db.save_library(&[genre(
            "fantasy",
            200,
            &[3.2, 4.0, 4.55, 4.56, 4.7, 4.8, 4.81, 4.95, 4.97, 5.0],
        )])
        .unwrap();
        let dist = db.rating_distribution().unwrap();
        let pairs: Vec<(String, i64)> = dist.iter().map(|b| (b.label(), b.count)).collect();
        assert_eq!(
            pairs,
            vec![
                ("< 4.0".to_string(), 1),
                ("4.5".to_string(), 2),
                ("4.6".to_string(), 1),
                ("4.7".to_string(), 1),
                ("4.8".to_string(), 2),
                ("4.9".to_string(), 1),
                ("5.0".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_rating_distribution_empty() {
        let db = open_test_db();
        assert!(db.rating_distribution().unwrap().is_empty());
    }

    #[test]
    fn test_load_library_round_trip() {
        let mut db = open_test_db();
        let original = vec![genre("fantasy", 200, &[4.8, 4.5]), genre("poetry", 50, &[])];
        db.save_library(&original).unwrap();

        let loaded = db.load_library().unwrap();
        assert_eq!(loaded, original);
    }
}
