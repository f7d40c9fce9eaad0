//! Admin model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Staff role of an admin account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Admin,
    Superadmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::Superadmin => "superadmin",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(AdminRole::Admin),
            "superadmin" => Ok(AdminRole::Superadmin),
            _ => Err(format!("Invalid admin role: {}", s)),
        }
    }
}

// Stored as TEXT, constrained by a CHECK in the schema
impl sqlx::Type<Postgres> for AdminRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AdminRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AdminRole {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Admin account as stored
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Hashed password (argon2), never serialized
    #[serde(skip_serializing)]
    pub password: String,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: AdminRole,
}

/// Admin fields ready to be written, password already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: AdminRole,
}

impl NewAdmin {
    pub fn with_id(self, id: i64) -> Admin {
        Admin {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
            address: self.address,
            role: self.role,
        }
    }
}

/// Create or replace admin request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plain password, write-only
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub role: AdminRole,
}

impl AdminPayload {
    /// Turn the payload into a storable record using an already hashed password
    pub fn into_record(self, password_hash: String) -> NewAdmin {
        NewAdmin {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: password_hash,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
            address: self.address,
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_never_serialized() {
        let admin = Admin {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            phone_number: Some("1234567890".to_string()),
            address: Some("123 Main St".to_string()),
            role: AdminRole::Admin,
        };

        let value = serde_json::to_value(&admin).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["dateOfBirth"], "1990-01-01");
        assert_eq!(value["phoneNumber"], "1234567890");
        assert_eq!(value["role"], "admin");
    }

    #[test]
    fn test_payload_role_defaults_to_admin() {
        let payload: AdminPayload = serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Smith",
            "email": "jane.smith@example.com",
            "password": "newpassword"
        }))
        .unwrap();
        assert_eq!(payload.role, AdminRole::Admin);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_payload_rejects_unknown_role() {
        let parsed = serde_json::from_value::<AdminPayload>(json!({
            "firstName": "Jane",
            "lastName": "Smith",
            "email": "jane.smith@example.com",
            "password": "newpassword",
            "role": "librarian"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_payload_validation() {
        let payload: AdminPayload = serde_json::from_value(json!({
            "firstName": "",
            "lastName": "Smith",
            "email": "not-an-email",
            "password": "abc",
            "role": "superadmin"
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("SuperAdmin".parse::<AdminRole>().unwrap(), AdminRole::Superadmin);
        assert!("patron".parse::<AdminRole>().is_err());
    }
}
