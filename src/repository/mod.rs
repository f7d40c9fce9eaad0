//! Repository layer: typed storage traits and their backends

pub mod admins;
pub mod books;
pub mod memory;
pub mod patrons;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use admins::AdminStore;
pub use books::BookStore;
pub use memory::MemoryStore;
pub use patrons::PatronStore;

use crate::error::{AppError, AppResult, ErrorCode};

/// Handles on every store, shared by the services
#[derive(Clone)]
pub struct Repository {
    pub admins: Arc<dyn AdminStore>,
    pub books: Arc<dyn BookStore>,
    pub patrons: Arc<dyn PatronStore>,
}

impl Repository {
    /// Repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            admins: Arc::new(admins::AdminsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            patrons: Arc::new(patrons::PatronsRepository::new(pool)),
        }
    }

    /// Repository backed by process-local tables
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            admins: store.clone(),
            books: store.clone(),
            patrons: store,
        }
    }
}

/// Report unique-index violations as conflicts instead of database failures
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    let is_unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == "23505");

    if is_unique_violation {
        AppError::Conflict(ErrorCode::Duplicate, message.to_string())
    } else {
        AppError::Database(e)
    }
}

/// Statement moving the id sequence of `table` past every id written so far.
///
/// The sequence only ever moves forward: ids handed out and since deleted
/// stay consumed. `pg_sequence_last_value` is NULL before the first
/// `nextval`, which `GREATEST` ignores.
fn resync_id_sequence_sql(table: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), GREATEST(\
         (SELECT MAX(id) FROM {table}), \
         pg_sequence_last_value(pg_get_serial_sequence('{table}', 'id')::regclass), \
         1))"
    )
}

/// Move the id sequence past rows written with explicit ids
pub(crate) async fn resync_id_sequence(pool: &Pool<Postgres>, table: &'static str) -> AppResult<()> {
    sqlx::query(&resync_id_sequence_sql(table)).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resync_never_lowers_the_sequence() {
        let sql = resync_id_sequence_sql("patrons");
        assert_eq!(
            sql,
            "SELECT setval(pg_get_serial_sequence('patrons', 'id'), GREATEST(\
             (SELECT MAX(id) FROM patrons), \
             pg_sequence_last_value(pg_get_serial_sequence('patrons', 'id')::regclass), \
             1))"
        );
    }

    #[test]
    fn test_unique_violation_needs_a_database_error() {
        let err = conflict_on_unique(sqlx::Error::RowNotFound, "Book id already in use");
        assert!(matches!(err, AppError::Database(_)));
    }
}
