//! Sign-in payloads and JWT claims

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::admin::AdminRole};

/// Role carried by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patron,
    Admin,
    Superadmin,
}

impl From<AdminRole> for Role {
    fn from(role: AdminRole) -> Self {
        match role {
            AdminRole::Admin => Role::Admin,
            AdminRole::Superadmin => Role::Superadmin,
        }
    }
}

/// Sign-in request
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct SigninRequest {
    /// Account email
    pub username: String,
    pub password: String,
}

/// Sign-in response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub role: Role,
    pub user_id: i64,
}

/// JWT claims for authenticated callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account email
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Superadmin)
    }

    // Authorization checks
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }

    pub fn require_superadmin(&self) -> Result<(), AppError> {
        if self.role == Role::Superadmin {
            Ok(())
        } else {
            Err(AppError::Authorization("Superadmin privileges required".to_string()))
        }
    }

    /// Patrons may only see their own record
    pub fn require_patron_or_staff(&self, patron_id: i64) -> Result<(), AppError> {
        if self.is_staff() || (self.role == Role::Patron && self.user_id == patron_id) {
            Ok(())
        } else {
            Err(AppError::Authorization("Not allowed to access this patron".to_string()))
        }
    }
}
