//! Pre-load integrity checking
//!
//! Runs after assembly and before any write. Every table must be non-empty
//! and free of duplicate ids; otherwise downstream foreign-key references
//! would be silently wrong, so the whole run aborts here.

use crate::assemble::BookDataset;
use crate::error::{IngestError, IntegrityViolation};
use crate::Result;
use std::collections::HashSet;
use tracing::debug;

/// Verify every produced table before persistence
pub fn check_dataset(dataset: &BookDataset) -> Result<()> {
    check_table("language", dataset.languages.iter().map(|r| r.id))?;
    check_table("publisher", dataset.publishers.iter().map(|r| r.id))?;
    check_table("genre", dataset.genres.iter().map(|r| r.id))?;
    check_table("authorRole", dataset.author_roles.iter().map(|r| r.id))?;
    check_table("author", dataset.authors.iter().map(|r| r.id))?;
    check_table("book", dataset.books.iter().map(|r| r.id))?;
    check_table("bookAuthor", dataset.book_authors.iter().map(|r| r.id))?;
    check_table(
        "bookAuthorRole",
        dataset.book_author_roles.iter().map(|r| r.id),
    )?;
    check_table("bookGenre", dataset.book_genres.iter().map(|r| r.id))?;
    check_table(
        "bookStarRating",
        dataset.book_star_ratings.iter().map(|r| r.id),
    )?;

    debug!("Integrity check passed for all 10 tables");
    Ok(())
}

fn check_table(table: &'static str, ids: impl Iterator<Item = i64>) -> Result<()> {
    let mut seen = HashSet::new();
    let mut any = false;

    for id in ids {
        any = true;
        if !seen.insert(id) {
            return Err(IngestError::Integrity {
                table,
                violation: IntegrityViolation::DuplicateId(id),
            });
        }
    }

    if !any {
        return Err(IngestError::Integrity {
            table,
            violation: IntegrityViolation::Empty,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DatasetBuilder;
    use crate::validate::ValidatedRow;
    use paperback_common::db::models::BookGenre;

    fn full_row() -> ValidatedRow {
        ValidatedRow {
            isbn: "0-306-40615-2".to_string(),
            title: "A Novel".to_string(),
            cover_url: "http://x/y.jpg".to_string(),
            price: 12.5,
            description: None,
            edition: None,
            pages: None,
            average_rating: None,
            ratings_count: None,
            liked_percent: None,
            language: Some("eng".to_string()),
            publisher: Some("Acme".to_string()),
            publish_date: None,
            author_field: Some("Someone (Writer)".to_string()),
            genres_raw: Some("['Fiction']".to_string()),
            star_ratings_raw: Some("['5', '4', '3', '2', '1']".to_string()),
        }
    }

    #[test]
    fn complete_dataset_passes() {
        let mut builder = DatasetBuilder::new();
        builder.push_row(full_row());
        let dataset = builder.finish();

        assert!(check_dataset(&dataset).is_ok());
    }

    #[test]
    fn empty_table_fails() {
        let mut builder = DatasetBuilder::new();
        let mut row = full_row();
        row.genres_raw = None;
        builder.push_row(row);
        let dataset = builder.finish();

        match check_dataset(&dataset) {
            Err(IngestError::Integrity { table, violation }) => {
                assert_eq!(table, "genre");
                assert_eq!(violation, IntegrityViolation::Empty);
            }
            other => panic!("expected integrity failure, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_id_fails_deterministically() {
        let mut builder = DatasetBuilder::new();
        builder.push_row(full_row());
        let mut dataset = builder.finish();

        dataset.book_genres.push(BookGenre {
            id: 0,
            book_id: 0,
            genre_id: 0,
        });

        match check_dataset(&dataset) {
            Err(IngestError::Integrity { table, violation }) => {
                assert_eq!(table, "bookGenre");
                assert_eq!(violation, IntegrityViolation::DuplicateId(0));
            }
            other => panic!("expected integrity failure, got {:?}", other),
        }
    }
}
