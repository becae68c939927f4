//! Per-row validation and normalization
//!
//! Rows failing any required check are dropped silently and ingestion
//! continues: a messy dataset must never abort the whole load. Only
//! aggregate missing-field counts are kept for diagnostics.

use crate::isbn;
use crate::source::RawBookRow;
use std::collections::HashMap;
use tracing::info;

/// Default admission cap: bounds memory and downstream transaction size
pub const DEFAULT_MAX_BOOKS: usize = 35_000;

/// Collapse runs of whitespace (including newlines) to single spaces and trim
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove embedded line breaks entirely (descriptions keep their spacing otherwise)
pub fn strip_line_breaks(input: &str) -> String {
    input.replace(['\r', '\n'], "")
}

/// Permissive numeric coercion: trimmed parse, finite results only
pub fn coerce_number(input: Option<&str>) -> Option<f64> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Like [`coerce_number`] but truncated to an integer
pub fn coerce_integer(input: Option<&str>) -> Option<i64> {
    coerce_number(input).map(|n| n as i64)
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

/// Why a row was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingIsbn,
    InvalidIsbn,
    MissingTitle,
    MissingCover,
    BadPrice,
    /// The admission cap was reached; not a data problem
    CapReached,
}

/// Validation result for one raw row
#[derive(Debug)]
pub enum RowOutcome {
    Accepted(Box<ValidatedRow>),
    Rejected(RejectReason),
}

/// A row that passed all required checks, with normalized scalar fields
/// and the raw compound fields the extractor still has to take apart
#[derive(Debug, Clone)]
pub struct ValidatedRow {
    pub isbn: String,
    pub title: String,
    pub cover_url: String,
    pub price: f64,
    pub description: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<i64>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub liked_percent: Option<f64>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub author_field: Option<String>,
    pub genres_raw: Option<String>,
    pub star_ratings_raw: Option<String>,
}

/// Row validator with an admission cap
pub struct RowValidator {
    max_books: usize,
}

impl RowValidator {
    pub fn new(max_books: usize) -> Self {
        Self { max_books }
    }

    /// Validate one raw row given how many books were already accepted
    pub fn validate(&self, row: &RawBookRow, accepted_so_far: usize) -> RowOutcome {
        if accepted_so_far >= self.max_books {
            return RowOutcome::Rejected(RejectReason::CapReached);
        }

        let Some(isbn_raw) = non_blank(row.isbn.as_deref()) else {
            return RowOutcome::Rejected(RejectReason::MissingIsbn);
        };
        let isbn = collapse_whitespace(isbn_raw);
        if isbn::validate_isbn(&isbn).is_err() {
            return RowOutcome::Rejected(RejectReason::InvalidIsbn);
        }

        let title = row
            .title
            .as_deref()
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty());
        let Some(title) = title else {
            return RowOutcome::Rejected(RejectReason::MissingTitle);
        };

        let Some(cover_url) = non_blank(row.cover_img.as_deref()) else {
            return RowOutcome::Rejected(RejectReason::MissingCover);
        };

        let price = match coerce_number(row.price.as_deref()) {
            Some(p) if p >= 0.0 => p,
            _ => return RowOutcome::Rejected(RejectReason::BadPrice),
        };

        RowOutcome::Accepted(Box::new(ValidatedRow {
            isbn,
            title,
            cover_url: cover_url.to_string(),
            price,
            description: non_blank(row.description.as_deref()).map(strip_line_breaks),
            edition: non_blank(row.edition.as_deref()).map(str::to_string),
            pages: coerce_integer(row.pages.as_deref()),
            average_rating: coerce_number(row.rating.as_deref()),
            ratings_count: coerce_integer(row.num_ratings.as_deref()),
            liked_percent: coerce_number(row.liked_percent.as_deref()),
            language: non_blank(row.language.as_deref()).map(collapse_whitespace),
            publisher: non_blank(row.publisher.as_deref()).map(collapse_whitespace),
            publish_date: non_blank(row.publish_date.as_deref()).map(collapse_whitespace),
            author_field: non_blank(row.author.as_deref()).map(str::to_string),
            genres_raw: non_blank(row.genres.as_deref()).map(str::to_string),
            star_ratings_raw: non_blank(row.ratings_by_stars.as_deref()).map(str::to_string),
        }))
    }
}

/// Aggregate per-column missing-value counts across the whole dataset
#[derive(Debug, Default)]
pub struct MissingFieldStats {
    counts: HashMap<&'static str, u64>,
}

impl MissingFieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record which columns are empty in this row
    pub fn record(&mut self, row: &RawBookRow) {
        for (name, value) in row.fields() {
            if non_blank(value).is_none() {
                *self.counts.entry(name).or_insert(0) += 1;
            }
        }
    }

    pub fn count(&self, column: &str) -> u64 {
        self.counts.get(column).copied().unwrap_or(0)
    }

    /// Log the aggregate, worst columns first
    pub fn log_summary(&self) {
        let mut entries: Vec<(&str, u64)> = self.counts.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        for (column, missing) in entries {
            info!("Column '{}': {} rows with missing value", column, missing);
        }
    }
}
