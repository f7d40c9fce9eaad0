//! API handlers for the library REST endpoints

pub mod admins;
pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod patrons;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::auth::Claims, AppState};

/// Extractor for the caller identified by a bearer token
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = Claims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/signin", post(auth::signin))
        .route("/auth/me", get(auth::me))
        // Admins
        .route("/admins", get(admins::all))
        .route("/admins", post(admins::create))
        .route("/admins/:id", get(admins::one))
        .route("/admins/:id", put(admins::replace))
        .route("/admins/:id", delete(admins::delete))
        // Books
        .route("/books", get(books::list))
        .route("/books", post(books::create))
        .route("/books/available", get(books::available))
        .route("/books/numberOfBooks", get(books::number_of_books))
        .route("/books/numberOfCheckedOut", get(books::number_of_checked_out))
        .route("/books/:id", get(books::get))
        .route("/books/:id", put(books::replace))
        .route("/books/:id", delete(books::delete))
        .route("/books/:id/checkout", post(books::checkout))
        .route("/books/:id/return", post(books::return_book))
        // Patrons
        .route("/patron", get(patrons::list))
        .route("/patron", post(patrons::create))
        .route("/patron/:id", get(patrons::get))
        .route("/patron/:id", put(patrons::replace))
        .route("/patron/:id", delete(patrons::delete))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
