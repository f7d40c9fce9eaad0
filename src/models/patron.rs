//! Patron model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Patron record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patron {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Hashed password (argon2), never serialized
    #[serde(skip_serializing)]
    pub password: String,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPatron {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl NewPatron {
    pub fn with_id(self, id: i64) -> Patron {
        Patron {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            date_of_birth: self.date_of_birth,
            address: self.address,
        }
    }
}

/// Registration / replace request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatronPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl PatronPayload {
    pub fn into_record(self, password_hash: String) -> NewPatron {
        NewPatron {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: password_hash,
            date_of_birth: self.date_of_birth,
            address: self.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_is_write_only() {
        let payload: PatronPayload = serde_json::from_value(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@example.com",
            "password": "password",
            "dateOfBirth": "1990-01-01",
            "address": "Address"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.password, "password");

        let patron = payload.into_record("hashed".to_string()).with_id(1);
        let value = serde_json::to_value(&patron).unwrap();

        assert!(value.get("password").is_none());
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["lastName"], "Doe");
        assert_eq!(value["email"], "john@example.com");
        assert_eq!(value["dateOfBirth"], "1990-01-01");
        assert_eq!(value["address"], "Address");
    }

    #[test]
    fn test_bad_date_rejected() {
        let parsed = serde_json::from_value::<PatronPayload>(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@example.com",
            "password": "password",
            "dateOfBirth": "01/01/1990"
        }));
        assert!(parsed.is_err());
    }
}
