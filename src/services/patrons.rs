//! Patron service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorCode, Resource},
    models::patron::{Patron, PatronPayload},
    repository::Repository,
};

use super::{auth::hash_password, ensure_assignable_id};

#[derive(Clone)]
pub struct PatronService {
    repository: Repository,
}

impl PatronService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Patron>> {
        self.repository.patrons.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Patron> {
        self.repository
            .patrons
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(Resource::Patron, id))
    }

    /// Admins and patrons share the sign-in email namespace
    async fn ensure_email_free(&self, email: &str, id: Option<i64>) -> AppResult<()> {
        let taken_by_patron = matches!(
            self.repository.patrons.find_by_email(email).await?,
            Some(other) if Some(other.id) != id
        );
        if taken_by_patron || self.repository.admins.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                ErrorCode::Duplicate,
                "Email already in use".to_string(),
            ));
        }
        Ok(())
    }

    /// Register a patron
    pub async fn create(&self, payload: PatronPayload) -> AppResult<Patron> {
        payload.validate()?;
        self.ensure_email_free(&payload.email, None).await?;

        let hash = hash_password(&payload.password)?;
        let patron = self.repository.patrons.insert(payload.into_record(hash)).await?;

        tracing::info!(patron_id = patron.id, "Patron registered");
        Ok(patron)
    }

    /// Replace every field of the patron at `id`, creating it there when absent
    pub async fn replace(&self, id: i64, payload: PatronPayload) -> AppResult<Patron> {
        ensure_assignable_id(id)?;
        payload.validate()?;
        self.ensure_email_free(&payload.email, Some(id)).await?;

        let hash = hash_password(&payload.password)?;
        let patron = self
            .repository
            .patrons
            .save_with_id(id, payload.into_record(hash))
            .await?;

        tracing::info!(patron_id = id, "Patron replaced");
        Ok(patron)
    }

    /// Idempotent, but refuses while the patron still holds books
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let held = self.repository.books.find_by_patron(id).await?;
        if !held.is_empty() {
            return Err(AppError::Conflict(
                ErrorCode::PatronHasCheckedOutBooks,
                format!("Patron {} still has {} checked out book(s)", id, held.len()),
            ));
        }

        if self.repository.patrons.delete_by_id(id).await? {
            tracing::info!(patron_id = id, "Patron deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Book,
        repository::{books::MockBookStore, patrons::MockPatronStore},
    };
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn payload(email: &str) -> PatronPayload {
        PatronPayload {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "password".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            address: Some("Address".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = PatronService::new(Repository::in_memory());
        let created = service.create(payload("john@example.com")).await.unwrap();
        assert!(created.password.starts_with("$argon2"));

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.list().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = PatronService::new(Repository::in_memory());
        service.create(payload("john@example.com")).await.unwrap();

        let err = service.create(payload("John@Example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ErrorCode::Duplicate, _)));
    }

    #[tokio::test]
    async fn test_admin_email_conflicts() {
        let repository = Repository::in_memory();
        crate::services::admins::AdminService::new(repository.clone())
            .bootstrap("root@library.local", "change-me")
            .await
            .unwrap();
        let service = PatronService::new(repository);

        let err = service.create(payload("Root@Library.local")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ErrorCode::Duplicate, _)));

        let err = service.replace(3, payload("root@library.local")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ErrorCode::Duplicate, _)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let err = PatronService::new(Repository::in_memory())
            .create(payload("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_refused_while_holding_books() {
        let mut books = MockBookStore::new();
        books.expect_find_by_patron().returning(|patron_id| {
            Ok(vec![Book {
                id: 1,
                author: "Author2".to_string(),
                is_audio_book: true,
                is_checked_out: true,
                isbn: "0987654321".to_string(),
                title: "Title2".to_string(),
                checked_out_by_patron_id: Some(patron_id),
            }])
        });
        let mut patrons = MockPatronStore::new();
        patrons.expect_delete_by_id().never();

        let mut repository = Repository::in_memory();
        repository.books = Arc::new(books);
        repository.patrons = Arc::new(patrons);

        let err = PatronService::new(repository).delete(123).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict(ErrorCode::PatronHasCheckedOutBooks, _)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let service = PatronService::new(Repository::in_memory());
        assert!(service.delete(5).await.is_ok());
    }
}
