//! Book service

use crate::{
    error::{AppError, AppResult, ErrorCode, Resource},
    models::book::{Book, BookPayload, NewBook},
    repository::Repository,
};

use super::ensure_assignable_id;

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(Resource::Book, id))
    }

    async fn ensure_patron_exists(&self, patron_id: i64) -> AppResult<()> {
        match self.repository.patrons.find_by_id(patron_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(Resource::Patron, patron_id)),
        }
    }

    /// Turn a payload into a record whose borrower, if any, exists
    async fn checked_record(&self, payload: BookPayload) -> AppResult<NewBook> {
        let record = payload.into_record()?;
        if let Some(patron_id) = record.checked_out_by_patron_id {
            self.ensure_patron_exists(patron_id).await.map_err(|_| {
                AppError::Validation(format!("Patron {} does not exist", patron_id))
            })?;
        }
        Ok(record)
    }

    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let record = self.checked_record(payload).await?;
        let book = self.repository.books.insert(record).await?;

        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Replace every field of the book at `id`, creating it there when absent
    pub async fn replace(&self, id: i64, payload: BookPayload) -> AppResult<Book> {
        ensure_assignable_id(id)?;
        let record = self.checked_record(payload).await?;
        let book = self.repository.books.save_with_id(id, record).await?;

        tracing::info!(book_id = id, "Book replaced");
        Ok(book)
    }

    /// Idempotent: deleting an absent book is not an error
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repository.books.delete_by_id(id).await? {
            tracing::info!(book_id = id, "Book deleted");
        }
        Ok(())
    }

    /// Books not checked out, in store order
    pub async fn available(&self) -> AppResult<Vec<Book>> {
        let books = self.repository.books.find_all().await?;
        Ok(books.into_iter().filter(Book::is_available).collect())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }

    pub async fn count_checked_out(&self) -> AppResult<i64> {
        let books = self.repository.books.find_all().await?;
        Ok(books.iter().filter(|b| b.is_checked_out).count() as i64)
    }

    /// Lend an available book to an existing patron
    pub async fn checkout(&self, id: i64, patron_id: i64) -> AppResult<Book> {
        let book = self.get_by_id(id).await?;
        self.ensure_patron_exists(patron_id).await?;

        if book.is_checked_out {
            return Err(AppError::Conflict(
                ErrorCode::BookCheckedOut,
                format!("Book {} is already checked out", id),
            ));
        }

        let book = self
            .repository
            .books
            .save_with_id(id, book.to_record().checked_out_by(patron_id))
            .await?;

        tracing::info!(book_id = id, patron_id, "Book checked out");
        Ok(book)
    }

    /// Bring a checked out book back into circulation
    pub async fn return_book(&self, id: i64) -> AppResult<Book> {
        let book = self.get_by_id(id).await?;

        let Some(patron_id) = book.checked_out_by_patron_id.filter(|_| book.is_checked_out) else {
            return Err(AppError::Conflict(
                ErrorCode::BookNotCheckedOut,
                format!("Book {} is not checked out", id),
            ));
        };

        let book = self
            .repository
            .books
            .save_with_id(id, book.to_record().returned())
            .await?;

        tracing::info!(book_id = id, patron_id, "Book returned");
        Ok(book)
    }
}
