//! Book storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{conflict_on_unique, resync_id_sequence};
use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books by ascending id
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// Books currently checked out by the given patron
    async fn find_by_patron(&self, patron_id: i64) -> AppResult<Vec<Book>>;

    async fn insert(&self, book: NewBook) -> AppResult<Book>;

    /// Write the book under `id`, replacing any book already there
    async fn save_with_id(&self, id: i64, book: NewBook) -> AppResult<Book>;

    async fn count(&self) -> AppResult<i64>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_patron(&self, patron_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE checked_out_by_patron_id = $1 ORDER BY id",
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (author, is_audio_book, is_checked_out, isbn, title, checked_out_by_patron_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.author)
        .bind(book.is_audio_book)
        .bind(book.is_checked_out)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(book.checked_out_by_patron_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Book id already in use"))
    }

    async fn save_with_id(&self, id: i64, book: NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, author, is_audio_book, is_checked_out, isbn, title, checked_out_by_patron_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                author = EXCLUDED.author,
                is_audio_book = EXCLUDED.is_audio_book,
                is_checked_out = EXCLUDED.is_checked_out,
                isbn = EXCLUDED.isbn,
                title = EXCLUDED.title,
                checked_out_by_patron_id = EXCLUDED.checked_out_by_patron_id
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.author)
        .bind(book.is_audio_book)
        .bind(book.is_checked_out)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(book.checked_out_by_patron_id)
        .fetch_one(&self.pool)
        .await?;

        resync_id_sequence(&self.pool, "books").await?;

        Ok(row)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
