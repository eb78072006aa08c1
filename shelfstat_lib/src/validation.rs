use crate::error::ShelfStatError;

pub const MAX_GENRE_NAME_LENGTH: usize = 100;
pub const MAX_TOP_N: usize = 100;
/// Most books kept for one genre after ranking.
pub const MAX_BOOKS_PER_GENRE: usize = 5;

/// Output formats understood by the CLI listing commands.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "csv", "markdown"];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, ShelfStatError> {
    if input.len() > max_len {
        return Err(ShelfStatError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(ShelfStatError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a free-text genre lookup and normalize it the way genre names are
/// stored (lower-cased).
pub fn validate_genre_name(input: &str) -> Result<String, ShelfStatError> {
    Ok(sanitize_text(input, MAX_GENRE_NAME_LENGTH)?.to_lowercase())
}

/// Validate the number of genres kept by top-genre selection (must be 1..=100).
pub fn validate_top_n(n: usize) -> Result<usize, ShelfStatError> {
    if !(1..=MAX_TOP_N).contains(&n) {
        return Err(ShelfStatError::InvalidInput(format!(
            "top genre count must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(n)
}

/// Validate the per-genre book cap (must be 1..=5).
pub fn validate_books_per_genre(n: usize) -> Result<usize, ShelfStatError> {
    if !(1..=MAX_BOOKS_PER_GENRE).contains(&n) {
        return Err(ShelfStatError::InvalidInput(format!(
            "books per genre must be between 1 and {}",
            MAX_BOOKS_PER_GENRE
        )));
    }
    Ok(n)
}

/// Validate a rating threshold (must be within 0.0..=5.0).
pub fn validate_rating(rating: f64) -> Result<f64, ShelfStatError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(ShelfStatError::InvalidInput(format!(
            "rating {} is outside 0.0-5.0",
            rating
        )));
    }
    Ok(rating)
}

/// Validate an output format name, case-insensitive.
pub fn validate_output_format(input: &str) -> Result<String, ShelfStatError> {
    let lower = input.trim().to_lowercase();
    if OUTPUT_FORMATS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(ShelfStatError::InvalidInput(format!(
            "unknown output format '{}'. Valid values: {}",
            input,
            OUTPUT_FORMATS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Genre name --

    #[test]
    fn genre_name_lowercased() {
        assert_eq!(validate_genre_name("Science Fiction").unwrap(), "science fiction");
    }

    #[test]
    fn genre_name_trimmed_and_stripped() {
        assert_eq!(validate_genre_name("  Fan\ttasy\n").unwrap(), "fantasy");
    }

    #[test]
    fn genre_name_empty() {
        assert!(validate_genre_name("   ").is_err());
    }

    #[test]
    fn genre_name_too_long() {
        let long = "a".repeat(MAX_GENRE_NAME_LENGTH + 1);
        assert!(validate_genre_name(&long).is_err());
    }

    // -- Numeric bounds --

    #[test]
    fn top_n_bounds() {
        assert!(validate_top_n(0).is_err());
        assert_eq!(validate_top_n(1).unwrap(), 1);
        assert_eq!(validate_top_n(15).unwrap(), 15);
        assert_eq!(validate_top_n(100).unwrap(), 100);
        assert!(validate_top_n(101).is_err());
    }

    #[test]
    fn books_per_genre_bounds() {
        assert!(validate_books_per_genre(0).is_err());
        assert_eq!(validate_books_per_genre(1).unwrap(), 1);
        assert_eq!(validate_books_per_genre(5).unwrap(), 5);
        assert!(validate_books_per_genre(6).is_err());
    }

    #[test]
    fn rating_bounds() {
        assert_eq!(validate_rating(4.6).unwrap(), 4.6);
        assert!(validate_rating(f64::NAN).is_err());
        assert!(validate_rating(-0.1).is_err());
        assert!(validate_rating(5.1).is_err());
        assert!(validate_rating(f64::NAN).is_err());
    }

    // -- Output format --

    #[test]
    fn output_format_case_insensitive() {
        assert_eq!(validate_output_format("JSON").unwrap(), "json");
        assert_eq!(validate_output_format("markdown").unwrap(), "markdown");
    }

    #[test]
    fn output_format_unknown() {
        let err = validate_output_format("xml").unwrap_err();
        assert!(err.to_string().contains("table, json, csv, markdown"));
    }
}
