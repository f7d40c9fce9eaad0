//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admins, auth, books, health, patrons};

/// Registers the bearer scheme the secured paths refer to
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library management REST API: admins, books, patrons and sign-in",
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signin,
        auth::me,
        // Admins
        admins::all,
        admins::one,
        admins::create,
        admins::replace,
        admins::delete,
        // Books
        books::list,
        books::get,
        books::create,
        books::replace,
        books::delete,
        books::available,
        books::number_of_books,
        books::number_of_checked_out,
        books::checkout,
        books::return_book,
        // Patrons
        patrons::list,
        patrons::get,
        patrons::create,
        patrons::replace,
        patrons::delete,
    ),
    components(
        schemas(
            // Auth
            crate::models::auth::SigninRequest,
            crate::models::auth::SigninResponse,
            crate::models::auth::Claims,
            crate::models::auth::Role,
            // Admins
            crate::models::admin::Admin,
            crate::models::admin::AdminPayload,
            crate::models::admin::AdminRole,
            // Books
            crate::models::book::Book,
            crate::models::book::BookPayload,
            crate::models::book::CheckoutRequest,
            // Patrons
            crate::models::patron::Patron,
            crate::models::patron::PatronPayload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "admins", description = "Admin management"),
        (name = "books", description = "Book catalog and circulation"),
        (name = "patrons", description = "Patron management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_library_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/admins/{id}", "/books/available", "/books/{id}/checkout", "/patron", "/auth/signin"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
