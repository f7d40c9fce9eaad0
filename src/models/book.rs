//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub is_audio_book: bool,
    pub is_checked_out: bool,
    pub isbn: String,
    pub title: String,
    /// Set exactly when the book is checked out
    pub checked_out_by_patron_id: Option<i64>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        !self.is_checked_out
    }

    /// Fields of this book, ready to be written back
    pub fn to_record(&self) -> NewBook {
        NewBook {
            author: self.author.clone(),
            is_audio_book: self.is_audio_book,
            is_checked_out: self.is_checked_out,
            isbn: self.isbn.clone(),
            title: self.title.clone(),
            checked_out_by_patron_id: self.checked_out_by_patron_id,
        }
    }
}

/// Book fields ready to be written; the checkout invariant already holds
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub author: String,
    pub is_audio_book: bool,
    pub is_checked_out: bool,
    pub isbn: String,
    pub title: String,
    pub checked_out_by_patron_id: Option<i64>,
}

impl NewBook {
    pub fn with_id(self, id: i64) -> Book {
        Book {
            id,
            author: self.author,
            is_audio_book: self.is_audio_book,
            is_checked_out: self.is_checked_out,
            isbn: self.isbn,
            title: self.title,
            checked_out_by_patron_id: self.checked_out_by_patron_id,
        }
    }

    pub fn checked_out_by(mut self, patron_id: i64) -> Self {
        self.is_checked_out = true;
        self.checked_out_by_patron_id = Some(patron_id);
        self
    }

    pub fn returned(mut self) -> Self {
        self.is_checked_out = false;
        self.checked_out_by_patron_id = None;
        self
    }
}

/// Create or replace book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub is_audio_book: bool,
    #[serde(default)]
    pub is_checked_out: bool,
    #[validate(length(min = 10, max = 17, message = "ISBN must be 10 to 17 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub checked_out_by_patron_id: Option<i64>,
}

impl BookPayload {
    /// Validate the payload and enforce the checkout invariant.
    ///
    /// A checked-out book must name its patron. A patron id sent along with
    /// an available book is dropped.
    pub fn into_record(self) -> AppResult<NewBook> {
        self.validate()?;

        let checked_out_by_patron_id = match (self.is_checked_out, self.checked_out_by_patron_id) {
            (true, None) => {
                return Err(AppError::Validation(
                    "A checked out book requires checkedOutByPatronId".to_string(),
                ))
            }
            (true, id) => id,
            (false, _) => None,
        };

        Ok(NewBook {
            author: self.author,
            is_audio_book: self.is_audio_book,
            is_checked_out: self.is_checked_out,
            isbn: self.isbn,
            title: self.title,
            checked_out_by_patron_id,
        })
    }
}

/// Checkout request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub patron_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> BookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_serialized_field_names() {
        let book = NewBook {
            author: "Author".to_string(),
            is_audio_book: true,
            is_checked_out: false,
            isbn: "1234567890".to_string(),
            title: "Title".to_string(),
            checked_out_by_patron_id: None,
        }
        .with_id(1);

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["author"], "Author");
        assert_eq!(value["isAudioBook"], true);
        assert_eq!(value["isCheckedOut"], false);
        assert_eq!(value["isbn"], "1234567890");
        assert_eq!(value["title"], "Title");
        assert!(value["checkedOutByPatronId"].is_null());
    }

    #[test]
    fn test_checked_out_requires_patron() {
        let err = payload(json!({
            "author": "New Author",
            "isAudioBook": false,
            "isCheckedOut": true,
            "isbn": "0987654321",
            "title": "New Title"
        }))
        .into_record()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_available_book_drops_patron() {
        let record = payload(json!({
            "author": "Author",
            "isbn": "1234567890",
            "title": "Title",
            "checkedOutByPatronId": 123
        }))
        .into_record()
        .unwrap();
        assert!(!record.is_checked_out);
        assert_eq!(record.checked_out_by_patron_id, None);
        assert!(!record.is_audio_book);
    }

    #[test]
    fn test_short_isbn_rejected() {
        let err = payload(json!({
            "author": "Author",
            "isbn": "123",
            "title": "Title"
        }))
        .into_record()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_checkout_and_return_keep_invariant() {
        let record = payload(json!({
            "author": "Author",
            "isbn": "1234567890",
            "title": "Title"
        }))
        .into_record()
        .unwrap();

        let out = record.checked_out_by(42);
        assert!(out.is_checked_out);
        assert_eq!(out.checked_out_by_patron_id, Some(42));

        let back = out.returned().with_id(3);
        assert!(back.is_available());
        assert_eq!(back.checked_out_by_patron_id, None);
    }
}
