//! Row models for the catalog tables
//!
//! Ids are sequential integers assigned during ingestion, not database
//! autoincrement values: the pipeline resolves every foreign key in memory
//! before anything is written.

/// One book row
#[derive(Debug, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub description: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<i64>,
    pub price: f64,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub liked_percent: Option<f64>,
    /// ISO-8601 date string, or None when the source date was unparseable
    pub publication_date: Option<String>,
    pub cover_url: String,
    pub language_id: Option<i64>,
    pub publisher_id: Option<i64>,
}

/// Name-keyed lookup row (author, publisher, language, genre, authorRole)
#[derive(Debug, Clone)]
pub struct LookupRow {
    pub id: i64,
    pub name: String,
}

/// One (book, author) pairing, in source order
#[derive(Debug, Clone)]
pub struct BookAuthor {
    pub id: i64,
    pub book_id: i64,
    pub author_id: i64,
}

/// Role attributed to one (book, author) pairing
#[derive(Debug, Clone)]
pub struct BookAuthorRole {
    pub id: i64,
    pub book_id: i64,
    pub book_author_id: i64,
    pub author_role_id: i64,
}

/// One (book, genre) pairing, at most 3 per book
#[derive(Debug, Clone)]
pub struct BookGenre {
    pub id: i64,
    pub book_id: i64,
    pub genre_id: i64,
}

/// Per-star ratings count; exactly 5 rows per book or none
#[derive(Debug, Clone)]
pub struct BookStarRating {
    pub id: i64,
    pub book_id: i64,
    /// 1 through 5
    pub star: i64,
    pub ratings_count: i64,
}
