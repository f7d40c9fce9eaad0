//! Patron storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{conflict_on_unique, resync_id_sequence};
use crate::{
    error::AppResult,
    models::patron::{NewPatron, Patron},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatronStore: Send + Sync {
    /// All patrons by ascending id
    async fn find_all(&self) -> AppResult<Vec<Patron>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Patron>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Patron>>;

    async fn insert(&self, patron: NewPatron) -> AppResult<Patron>;

    /// Write the patron under `id`, replacing any patron already there
    async fn save_with_id(&self, id: i64, patron: NewPatron) -> AppResult<Patron>;

    async fn count(&self) -> AppResult<i64>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PatronsRepository {
    pool: Pool<Postgres>,
}

impl PatronsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatronStore for PatronsRepository {
    async fn find_all(&self) -> AppResult<Vec<Patron>> {
        let rows = sqlx::query_as::<_, Patron>("SELECT * FROM patrons ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Patron>> {
        let row = sqlx::query_as::<_, Patron>("SELECT * FROM patrons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Patron>> {
        let row = sqlx::query_as::<_, Patron>(
            "SELECT * FROM patrons WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, patron: NewPatron) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>(
            r#"
            INSERT INTO patrons (first_name, last_name, email, password, date_of_birth, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&patron.first_name)
        .bind(&patron.last_name)
        .bind(&patron.email)
        .bind(&patron.password)
        .bind(patron.date_of_birth)
        .bind(&patron.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))
    }

    async fn save_with_id(&self, id: i64, patron: NewPatron) -> AppResult<Patron> {
        let row = sqlx::query_as::<_, Patron>(
            r#"
            INSERT INTO patrons (id, first_name, last_name, email, password, date_of_birth, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                date_of_birth = EXCLUDED.date_of_birth,
                address = EXCLUDED.address
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patron.first_name)
        .bind(&patron.last_name)
        .bind(&patron.email)
        .bind(&patron.password)
        .bind(patron.date_of_birth)
        .bind(&patron.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))?;

        resync_id_sequence(&self.pool, "patrons").await?;

        Ok(row)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patrons")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM patrons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
