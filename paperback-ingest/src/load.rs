//! Bulk loading into the relational store
//!
//! All batches go in inside one transaction, in strict dependency order:
//! lookup tables first, then book, then the join tables. Each batch is a
//! single multi-row INSERT awaited before the next; any failure rolls the
//! whole transaction back, so no partial dataset is ever committed.

use crate::assemble::{chunk, BookDataset};
use crate::error::IngestError;
use crate::Result;
use paperback_common::db::models::{
    Book, BookAuthor, BookAuthorRole, BookGenre, BookStarRating, LookupRow,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

/// Number of books already in the target store
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM book")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Refuse to run against a populated target
///
/// Run-scoped sequential ids would collide or duplicate on a second run,
/// so a non-empty book table aborts before anything is read.
pub async fn assert_target_empty(pool: &SqlitePool) -> Result<()> {
    let existing = count_books(pool).await?;
    if existing > 0 {
        return Err(IngestError::AlreadyPopulated(existing));
    }
    Ok(())
}

/// Insert the full dataset in one all-or-nothing transaction
pub async fn load_dataset(
    pool: &SqlitePool,
    dataset: &BookDataset,
    chunk_size: usize,
) -> Result<()> {
    info!("Inserting dataset ({} books) in one transaction", dataset.books.len());

    let mut tx = pool.begin().await?;

    // Referenced entities before referencing entities
    insert_lookup(&mut tx, "language", "language", &dataset.languages, chunk_size).await?;
    insert_lookup(&mut tx, "publisher", "publisher", &dataset.publishers, chunk_size).await?;
    insert_lookup(&mut tx, "genre", "genre", &dataset.genres, chunk_size).await?;
    insert_lookup(&mut tx, "authorRole", "authorRole", &dataset.author_roles, chunk_size).await?;
    insert_lookup(&mut tx, "author", "author", &dataset.authors, chunk_size).await?;

    insert_books(&mut tx, &dataset.books, chunk_size).await?;

    insert_book_authors(&mut tx, &dataset.book_authors, chunk_size).await?;
    insert_book_author_roles(&mut tx, &dataset.book_author_roles, chunk_size).await?;
    insert_book_genres(&mut tx, &dataset.book_genres, chunk_size).await?;
    insert_book_star_ratings(&mut tx, &dataset.book_star_ratings, chunk_size).await?;

    tx.commit().await?;

    info!("Dataset insert committed");
    Ok(())
}

async fn insert_lookup(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    name_column: &str,
    rows: &[LookupRow],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("INSERT INTO {} (id, {}) ", table, name_column));
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id).push_bind(&row.name);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into {}", rows.len(), table);
    Ok(())
}

async fn insert_books(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[Book],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO book (id, title, isbn, description, edition, pages, price, \
             averageRating, ratingsCount, likedPercent, publicationDate, coverUrl, \
             languageId, publisherId) ",
        );
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(&row.title)
                .push_bind(&row.isbn)
                .push_bind(&row.description)
                .push_bind(&row.edition)
                .push_bind(row.pages)
                .push_bind(row.price)
                .push_bind(row.average_rating)
                .push_bind(row.ratings_count)
                .push_bind(row.liked_percent)
                .push_bind(&row.publication_date)
                .push_bind(&row.cover_url)
                .push_bind(row.language_id)
                .push_bind(row.publisher_id);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into book", rows.len());
    Ok(())
}

async fn insert_book_authors(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[BookAuthor],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO bookAuthor (id, bookId, authorId) ");
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.book_id)
                .push_bind(row.author_id);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into bookAuthor", rows.len());
    Ok(())
}

async fn insert_book_author_roles(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[BookAuthorRole],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO bookAuthorRole (id, bookId, bookAuthorId, authorRoleId) ",
        );
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.book_id)
                .push_bind(row.book_author_id)
                .push_bind(row.author_role_id);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into bookAuthorRole", rows.len());
    Ok(())
}

async fn insert_book_genres(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[BookGenre],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO bookGenre (id, bookId, genreId) ");
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.book_id)
                .push_bind(row.genre_id);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into bookGenre", rows.len());
    Ok(())
}

async fn insert_book_star_ratings(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[BookStarRating],
    chunk_size: usize,
) -> Result<()> {
    for batch in chunk(rows, chunk_size) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO bookStarRating (id, bookId, star, ratingsCount) ");
        builder.push_values(batch, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.book_id)
                .push_bind(row.star)
                .push_bind(row.ratings_count);
        });
        builder.build().execute(&mut **tx).await?;
    }
    debug!("Inserted {} rows into bookStarRating", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DatasetBuilder;
    use crate::validate::ValidatedRow;

    fn full_row(isbn: &str, title: &str) -> ValidatedRow {
        ValidatedRow {
            isbn: isbn.to_string(),
            title: title.to_string(),
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

    #[tokio::test]
    async fn loads_dataset_in_dependency_order() {
        let pool = paperback_common::db::init_memory_pool().await.unwrap();

        let mut builder = DatasetBuilder::new();
        builder.push_row(full_row("0-306-40615-2", "One"));
        builder.push_row(full_row("9780306406157", "Two"));
        let dataset = builder.finish();

        load_dataset(&pool, &dataset, 100).await.unwrap();

        let books = count_books(&pool).await.unwrap();
        assert_eq!(books, 2);

        let (stars,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookStarRating")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stars, 10);

        // Foreign keys actually join
        let (joined,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookAuthor ba
             JOIN book b ON b.id = ba.bookId
             JOIN author a ON a.id = ba.authorId",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(joined, 2);
    }

    #[tokio::test]
    async fn chunked_load_spans_multiple_batches() {
        let pool = paperback_common::db::init_memory_pool().await.unwrap();

        let mut builder = DatasetBuilder::new();
        builder.push_row(full_row("0-306-40615-2", "One"));
        builder.push_row(full_row("9780306406157", "Two"));
        builder.push_row(full_row("0-9752298-0-X", "Three"));
        let dataset = builder.finish();

        // chunk_size 1 forces one INSERT per record
        load_dataset(&pool, &dataset, 1).await.unwrap();
        assert_eq!(count_books(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn failure_rolls_back_everything() {
        let pool = paperback_common::db::init_memory_pool().await.unwrap();

        let mut builder = DatasetBuilder::new();
        builder.push_row(full_row("0-306-40615-2", "One"));
        let mut dataset = builder.finish();

        // Dangling genre reference violates the FK constraint mid-load
        dataset.book_genres.push(
            paperback_common::db::models::BookGenre {
                id: 1,
                book_id: 0,
                genre_id: 999,
            },
        );

        let result = load_dataset(&pool, &dataset, 100).await;
        assert!(result.is_err());

        // Nothing from any earlier batch survives
        assert_eq!(count_books(&pool).await.unwrap(), 0);
        let (authors,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM author")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(authors, 0);
    }

    #[tokio::test]
    async fn populated_target_is_refused() {
        let pool = paperback_common::db::init_memory_pool().await.unwrap();

        sqlx::query(
            "INSERT INTO book (id, title, isbn, price, coverUrl)
             VALUES (0, 'T', '0306406152', 1.0, 'http://x')",
        )
        .execute(&pool)
        .await
        .unwrap();

        match assert_target_empty(&pool).await {
            Err(IngestError::AlreadyPopulated(1)) => {}
            other => panic!("expected AlreadyPopulated, got {:?}", other),
        }
    }
}
