//! Relational schema for the book catalog
//!
//! Lookup tables (language, publisher, genre, authorRole, author) are
//! name-keyed with UNIQUE constraints. Join tables cascade on delete of
//! their parents; the optional book -> language/publisher links are
//! severed with SET NULL instead so deleting a lookup row never removes
//! books.

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create all catalog tables if they don't exist
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS language (
            id INTEGER PRIMARY KEY,
            language TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS publisher (
            id INTEGER PRIMARY KEY,
            publisher TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS genre (
            id INTEGER PRIMARY KEY,
            genre TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS authorRole (
            id INTEGER PRIMARY KEY,
            authorRole TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS author (
            id INTEGER PRIMARY KEY,
            author TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS book (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            isbn TEXT NOT NULL,
            description TEXT,
            edition TEXT,
            pages INTEGER,
            price REAL NOT NULL,
            averageRating REAL,
            ratingsCount INTEGER,
            likedPercent REAL,
            publicationDate TEXT,
            coverUrl TEXT NOT NULL,
            languageId INTEGER REFERENCES language(id) ON DELETE SET NULL,
            publisherId INTEGER REFERENCES publisher(id) ON DELETE SET NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bookAuthor (
            id INTEGER PRIMARY KEY,
            bookId INTEGER NOT NULL REFERENCES book(id) ON DELETE CASCADE,
            authorId INTEGER NOT NULL REFERENCES author(id) ON DELETE CASCADE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bookAuthorRole (
            id INTEGER PRIMARY KEY,
            bookId INTEGER NOT NULL REFERENCES book(id) ON DELETE CASCADE,
            bookAuthorId INTEGER NOT NULL REFERENCES bookAuthor(id) ON DELETE CASCADE,
            authorRoleId INTEGER NOT NULL REFERENCES authorRole(id) ON DELETE CASCADE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bookGenre (
            id INTEGER PRIMARY KEY,
            bookId INTEGER NOT NULL REFERENCES book(id) ON DELETE CASCADE,
            genreId INTEGER NOT NULL REFERENCES genre(id) ON DELETE CASCADE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bookStarRating (
            id INTEGER PRIMARY KEY,
            bookId INTEGER NOT NULL REFERENCES book(id) ON DELETE CASCADE,
            star INTEGER NOT NULL CHECK (star BETWEEN 1 AND 5),
            ratingsCount INTEGER NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized (10 catalog tables)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_initialization_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        initialize_schema(&pool).await.expect("First init failed");
        initialize_schema(&pool).await.expect("Second init failed");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        for expected in [
            "language",
            "publisher",
            "genre",
            "authorRole",
            "author",
            "book",
            "bookAuthor",
            "bookAuthorRole",
            "bookGenre",
            "bookStarRating",
        ] {
            assert!(names.contains(&expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_deleting_language_nulls_book_link() {
        let pool = crate::db::init_memory_pool().await.unwrap();

        sqlx::query("INSERT INTO language (id, language) VALUES (0, 'English')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO book (id, title, isbn, price, coverUrl, languageId)
             VALUES (0, 'T', '0306406152', 1.0, 'http://x/y.jpg', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("DELETE FROM language WHERE id = 0")
            .execute(&pool)
            .await
            .unwrap();

        let language_id: (Option<i64>,) =
            sqlx::query_as("SELECT languageId FROM book WHERE id = 0")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(language_id.0, None);
    }

    #[tokio::test]
    async fn test_deleting_book_cascades_to_joins() {
        let pool = crate::db::init_memory_pool().await.unwrap();

        sqlx::query("INSERT INTO author (id, author) VALUES (0, 'A')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO book (id, title, isbn, price, coverUrl)
             VALUES (0, 'T', '0306406152', 1.0, 'http://x/y.jpg')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO bookAuthor (id, bookId, authorId) VALUES (0, 0, 0)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM book WHERE id = 0")
            .execute(&pool)
            .await
            .unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookAuthor")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
