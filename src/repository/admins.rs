//! Admin storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{conflict_on_unique, resync_id_sequence};
use crate::{
    error::AppResult,
    models::admin::{Admin, NewAdmin},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// All admins by ascending id
    async fn find_all(&self) -> AppResult<Vec<Admin>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Admin>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>>;

    async fn insert(&self, admin: NewAdmin) -> AppResult<Admin>;

    /// Write the admin under `id`, replacing any admin already there
    async fn save_with_id(&self, id: i64, admin: NewAdmin) -> AppResult<Admin>;

    async fn count(&self) -> AppResult<i64>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct AdminsRepository {
    pool: Pool<Postgres>,
}

impl AdminsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for AdminsRepository {
    async fn find_all(&self) -> AppResult<Vec<Admin>> {
        let rows = sqlx::query_as::<_, Admin>("SELECT * FROM admins ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>(
            "SELECT * FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, admin: NewAdmin) -> AppResult<Admin> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (first_name, last_name, email, password, date_of_birth, phone_number, address, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(&admin.email)
        .bind(&admin.password)
        .bind(admin.date_of_birth)
        .bind(&admin.phone_number)
        .bind(&admin.address)
        .bind(admin.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))
    }

    async fn save_with_id(&self, id: i64, admin: NewAdmin) -> AppResult<Admin> {
        let row = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, first_name, last_name, email, password, date_of_birth, phone_number, address, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                date_of_birth = EXCLUDED.date_of_birth,
                phone_number = EXCLUDED.phone_number,
                address = EXCLUDED.address,
                role = EXCLUDED.role
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(&admin.email)
        .bind(&admin.password)
        .bind(admin.date_of_birth)
        .bind(&admin.phone_number)
        .bind(&admin.address)
        .bind(admin.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))?;

        resync_id_sequence(&self.pool, "admins").await?;

        Ok(row)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
