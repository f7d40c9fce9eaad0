//! Business logic services

pub mod admins;
pub mod auth;
pub mod books;
pub mod patrons;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

pub use auth::CredentialVerifier;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub admins: admins::AdminService,
    pub books: books::BookService,
    pub patrons: patrons::PatronService,
    pub auth: Arc<dyn CredentialVerifier>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            admins: admins::AdminService::new(repository.clone()),
            books: books::BookService::new(repository.clone()),
            patrons: patrons::PatronService::new(repository.clone()),
            auth: Arc::new(auth::AuthService::new(repository, auth_config)),
        }
    }
}

/// Ids a client may choose on create-or-replace.
///
/// `i64::MAX` is kept back so the id sequence can always move past the row.
pub(crate) fn ensure_assignable_id(id: i64) -> AppResult<()> {
    if (1..i64::MAX).contains(&id) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Id {} is out of range, expected 1 to {}",
            id,
            i64::MAX - 1
        )))
    }
}
