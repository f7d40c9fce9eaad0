//! Authentication service: credential checks and token issuing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::auth::{Claims, Role, SigninRequest, SigninResponse},
    repository::Repository,
};

/// Checks a username/password pair and answers with a sign-in response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn sign_in(&self, request: &SigninRequest) -> AppResult<SigninResponse>;
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    /// Verified against when the account is unknown, so both failures cost one Argon2 run
    dummy_hash: Option<String>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        let dummy_hash = hash_password("library-server-dummy-password")
            .map_err(|e| tracing::warn!("Could not prepare dummy password hash: {}", e))
            .ok();
        Self {
            repository,
            config,
            dummy_hash,
        }
    }

    /// Resolve an email to (id, role, password hash), admins first
    async fn find_account(&self, email: &str) -> AppResult<Option<(i64, Role, String)>> {
        if let Some(admin) = self.repository.admins.find_by_email(email).await? {
            return Ok(Some((admin.id, admin.role.into(), admin.password)));
        }
        let patron = self.repository.patrons.find_by_email(email).await?;
        Ok(patron.map(|p| (p.id, Role::Patron, p.password)))
    }

    fn issue_token(&self, email: &str, user_id: i64, role: Role) -> AppResult<SigninResponse> {
        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;

        let claims = Claims {
            sub: email.to_string(),
            user_id,
            role,
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(SigninResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            role,
            user_id,
        })
    }
}

#[async_trait]
impl CredentialVerifier for AuthService {
    async fn sign_in(&self, request: &SigninRequest) -> AppResult<SigninResponse> {
        let invalid = || AppError::Authentication("Invalid username or password".to_string());

        let Some((user_id, role, hash)) = self.find_account(&request.username).await? else {
            if let Some(dummy) = &self.dummy_hash {
                let _ = verify_password(dummy, &request.password);
            }
            tracing::warn!(username = %request.username, "Sign-in for unknown account");
            return Err(invalid());
        };

        if !verify_password(&hash, &request.password)? {
            tracing::warn!(username = %request.username, "Sign-in with wrong password");
            return Err(invalid());
        }

        tracing::info!(user_id, ?role, "Signed in");
        self.issue_token(&request.username, user_id, role)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
