//! Data models for the library server

pub mod admin;
pub mod auth;
pub mod book;
pub mod patron;

// Re-export commonly used types
pub use admin::{Admin, AdminPayload, AdminRole, NewAdmin};
pub use auth::{Claims, Role, SigninRequest, SigninResponse};
pub use book::{Book, BookPayload, CheckoutRequest, NewBook};
pub use patron::{NewPatron, Patron, PatronPayload};
