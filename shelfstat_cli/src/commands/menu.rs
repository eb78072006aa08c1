//! Interactive prompt loop over the stored library.
//!
//! The loop walks through three screens: rating charts, genre charts, then a
//! free-text genre lookup. After a lookup, `back` starts over. `exit` quits
//! from any prompt, as does end of input. Any other answer prints an error and
//! repeats the same prompt.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use shelfstat_lib::{validation, Db, PipelineConfig};

use super::charts::{genre_chart, ratings_charts, top_chart};

const RATINGS_PROMPT: &str =
    "To see how many stored books fall in each rating range enter 'yes' or 'exit': ";
const GENRES_PROMPT: &str =
    "To see total and top-rated book counts per genre enter 'yes' or 'exit': ";
const LOOKUP_PROMPT: &str =
    "To view the top books in a specific genre enter its name (one genre only): ";
const AGAIN_PROMPT: &str = "To look at a different genre enter 'back', or 'exit' if done: ";
const INVALID_INPUT: &str = "Error. Invalid input.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Ratings,
    Genres,
    Lookup,
    Again,
}

pub fn run(config: &PipelineConfig) -> Result<()> {
    let db = super::open_existing_db(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(&db, stdin.lock(), &mut stdout)
}

/// Drives the menu from `input`, writing prompts and results to `out`.
pub fn run_loop<R: BufRead, W: Write>(db: &Db, mut input: R, out: &mut W) -> Result<()> {
    let mut screen = Screen::Ratings;

    loop {
        let prompt = match screen {
            Screen::Ratings => RATINGS_PROMPT,
            Screen::Genres => GENRES_PROMPT,
            Screen::Lookup => LOOKUP_PROMPT,
            Screen::Again => AGAIN_PROMPT,
        };
        write!(out, "{}", prompt)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let answer = line.trim().to_lowercase();

        if answer == "exit" {
            return Ok(());
        }

        screen = match (screen, answer.as_str()) {
            (Screen::Ratings, "yes") => {
                writeln!(out, "Books in the library by rating:")?;
                write!(out, "{}", ratings_charts(db)?)?;
                Screen::Genres
            }
            (Screen::Genres, "yes") => {
                write!(out, "{}\n{}", genre_chart(db)?, top_chart(db)?)?;
                Screen::Lookup
            }
            (Screen::Lookup, _) => match validation::validate_genre_name(&answer) {
                Ok(genre) => {
                    print_genre_books(db, &genre, out)?;
                    Screen::Again
                }
                Err(_) => {
                    writeln!(out, "{}", INVALID_INPUT)?;
                    Screen::Lookup
                }
            },
            (Screen::Again, "back") => Screen::Ratings,
            (current, _) => {
                writeln!(out, "{}", INVALID_INPUT)?;
                current
            }
        };
    }
}

fn print_genre_books<W: Write>(db: &Db, genre: &str, out: &mut W) -> Result<()> {
    let books = db.books_for_genre(genre)?;
    if books.is_empty() {
        writeln!(out, "No books stored for genre '{}'.", genre)?;
        return Ok(());
    }

    writeln!(out, "List of Books")?;
    writeln!(out, "----------------------------------------------")?;
    for (i, book) in books.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, book.info())?;
    }
    Ok(())
}
