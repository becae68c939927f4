//! Record assembly
//!
//! Merges validated scalar fields with resolved foreign keys into final
//! per-table records. All ids are monotonic counters derived from the output
//! vectors' lengths, so they are dense, unique, and stable within a run.

use crate::dates;
use crate::extract::{self, GenreOutcome, StarOutcome};
use crate::resolve::LookupTable;
use crate::validate::ValidatedRow;
use paperback_common::db::models::{
    Book, BookAuthor, BookAuthorRole, BookGenre, BookStarRating, LookupRow,
};

/// Default records-per-batch for bulk insertion
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Accumulates one ingestion run's worth of records
///
/// Owns the identity-resolver tables; nothing here is shared or persistent.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    authors: LookupTable,
    author_roles: LookupTable,
    publishers: LookupTable,
    languages: LookupTable,
    genres: LookupTable,

    books: Vec<Book>,
    book_authors: Vec<BookAuthor>,
    book_author_roles: Vec<BookAuthorRole>,
    book_genres: Vec<BookGenre>,
    book_star_ratings: Vec<BookStarRating>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Books accepted so far; also the next book id
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Assemble one validated row into book + join records
    pub fn push_row(&mut self, row: ValidatedRow) {
        let book_id = self.books.len() as i64;

        let language_id = row.language.as_deref().map(|l| self.languages.resolve(l));
        let publisher_id = row.publisher.as_deref().map(|p| self.publishers.resolve(p));

        if let Some(raw) = row.star_ratings_raw.as_deref() {
            if let StarOutcome::Counts(counts) = extract::parse_star_counts(raw, &row.isbn) {
                for (i, count) in counts.iter().enumerate() {
                    self.book_star_ratings.push(BookStarRating {
                        id: self.book_star_ratings.len() as i64,
                        book_id,
                        star: (i + 1) as i64,
                        ratings_count: *count,
                    });
                }
            }
        }

        if let Some(raw) = row.genres_raw.as_deref() {
            if let GenreOutcome::Genres(names) = extract::parse_genre_list(raw, &row.isbn) {
                for name in names {
                    let genre_id = self.genres.resolve(&name);
                    self.book_genres.push(BookGenre {
                        id: self.book_genres.len() as i64,
                        book_id,
                        genre_id,
                    });
                }
            }
        }

        if let Some(field) = row.author_field.as_deref() {
            for segment in extract::parse_author_field(field) {
                let book_author_id = self.book_authors.len() as i64;
                let author_id = self.authors.resolve(&segment.name);
                self.book_authors.push(BookAuthor {
                    id: book_author_id,
                    book_id,
                    author_id,
                });

                for role in &segment.roles {
                    let author_role_id = self.author_roles.resolve(role);
                    self.book_author_roles.push(BookAuthorRole {
                        id: self.book_author_roles.len() as i64,
                        book_id,
                        book_author_id,
                        author_role_id,
                    });
                }
            }
        }

        let publication_date = row
            .publish_date
            .as_deref()
            .and_then(dates::parse_publication_date)
            .map(|d| d.format("%Y-%m-%d").to_string());

        self.books.push(Book {
            id: book_id,
            title: row.title,
            isbn: row.isbn,
            description: row.description,
            edition: row.edition,
            pages: row.pages,
            price: row.price,
            average_rating: row.average_rating,
            ratings_count: row.ratings_count,
            liked_percent: row.liked_percent,
            publication_date,
            cover_url: row.cover_url,
            language_id,
            publisher_id,
        });
    }

    /// Materialize the final dataset; the builder (and its resolver state)
    /// is consumed
    pub fn finish(self) -> BookDataset {
        BookDataset {
            languages: self.languages.into_rows(),
            publishers: self.publishers.into_rows(),
            genres: self.genres.into_rows(),
            author_roles: self.author_roles.into_rows(),
            authors: self.authors.into_rows(),
            books: self.books,
            book_authors: self.book_authors,
            book_author_roles: self.book_author_roles,
            book_genres: self.book_genres,
            book_star_ratings: self.book_star_ratings,
        }
    }
}

/// The complete, foreign-key-consistent output of one run
#[derive(Debug)]
pub struct BookDataset {
    pub languages: Vec<LookupRow>,
    pub publishers: Vec<LookupRow>,
    pub genres: Vec<LookupRow>,
    pub author_roles: Vec<LookupRow>,
    pub authors: Vec<LookupRow>,
    pub books: Vec<Book>,
    pub book_authors: Vec<BookAuthor>,
    pub book_author_roles: Vec<BookAuthorRole>,
    pub book_genres: Vec<BookGenre>,
    pub book_star_ratings: Vec<BookStarRating>,
}

/// Partition records into fixed-size batches for bulk insertion
pub fn chunk<T>(records: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    records.chunks(size.max(1))
}
