//! Admin service

use crate::{
    error::{AppError, AppResult, ErrorCode, Resource},
    models::admin::{Admin, AdminPayload, AdminRole, NewAdmin},
    repository::Repository,
};

use super::{auth::hash_password, ensure_assignable_id};
use validator::Validate;

#[derive(Clone)]
pub struct AdminService {
    repository: Repository,
}

impl AdminService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Admin>> {
        self.repository.admins.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Admin> {
        self.repository
            .admins
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(Resource::Admin, id))
    }

    /// Fails with a conflict when another admin or any patron owns the email.
    ///
    /// Sign-in resolves emails across both tables, so they share one namespace.
    async fn ensure_email_free(&self, email: &str, id: Option<i64>) -> AppResult<()> {
        let taken_by_admin = matches!(
            self.repository.admins.find_by_email(email).await?,
            Some(other) if Some(other.id) != id
        );
        if taken_by_admin || self.repository.patrons.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                ErrorCode::Duplicate,
                "Email already in use".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(&self, payload: AdminPayload) -> AppResult<Admin> {
        payload.validate()?;
        self.ensure_email_free(&payload.email, None).await?;

        let hash = hash_password(&payload.password)?;
        let admin = self.repository.admins.insert(payload.into_record(hash)).await?;

        tracing::info!(admin_id = admin.id, role = %admin.role, "Admin created");
        Ok(admin)
    }

    /// Replace every field of the admin at `id`, creating it there when absent
    pub async fn replace(&self, id: i64, payload: AdminPayload) -> AppResult<Admin> {
        ensure_assignable_id(id)?;
        payload.validate()?;
        self.ensure_email_free(&payload.email, Some(id)).await?;

        let existed = self.repository.admins.find_by_id(id).await?.is_some();
        let hash = hash_password(&payload.password)?;
        let admin = self
            .repository
            .admins
            .save_with_id(id, payload.into_record(hash))
            .await?;

        if existed {
            tracing::info!(admin_id = id, "Admin replaced");
        } else {
            tracing::info!(admin_id = id, "Admin created by replace");
        }
        Ok(admin)
    }

    /// Idempotent: deleting an absent admin is not an error
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repository.admins.delete_by_id(id).await? {
            tracing::info!(admin_id = id, "Admin deleted");
        }
        Ok(())
    }

    /// Make sure a superadmin with this email exists
    pub async fn bootstrap(&self, email: &str, password: &str) -> AppResult<Option<Admin>> {
        if self.repository.admins.find_by_email(email).await?.is_some() {
            return Ok(None);
        }
        if self.repository.patrons.find_by_email(email).await?.is_some() {
            tracing::warn!(email, "Bootstrap email belongs to a patron, no superadmin created");
            return Ok(None);
        }

        let admin = self
            .repository
            .admins
            .insert(NewAdmin {
                first_name: "Library".to_string(),
                last_name: "Administrator".to_string(),
                email: email.to_string(),
                password: hash_password(password)?,
                date_of_birth: None,
                phone_number: None,
                address: None,
                role: AdminRole::Superadmin,
            })
            .await?;

        tracing::info!(admin_id = admin.id, email, "Bootstrap superadmin created");
        Ok(Some(admin))
    }
}
