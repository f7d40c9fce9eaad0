//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookPayload, CheckoutRequest},
};

use super::AuthenticatedUser;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_staff()?;
    let book = state.services.books.create(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book, creating it at this ID when absent
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book replaced or created", body = Book),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn replace(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_staff()?;
    let book = state.services.books.replace(id, payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted, or never existed")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List books that are not checked out
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = Vec<Book>)
    )
)]
pub async fn available(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.available().await?;
    Ok(Json(books))
}

/// Total number of books
#[utoipa::path(
    get,
    path = "/books/numberOfBooks",
    tag = "books",
    responses(
        (status = 200, description = "Book count", body = i64)
    )
)]
pub async fn number_of_books(State(state): State<crate::AppState>) -> AppResult<Json<i64>> {
    let count = state.services.books.count().await?;
    Ok(Json(count))
}

/// Number of checked out books
#[utoipa::path(
    get,
    path = "/books/numberOfCheckedOut",
    tag = "books",
    responses(
        (status = 200, description = "Checked out book count", body = i64)
    )
)]
pub async fn number_of_checked_out(State(state): State<crate::AppState>) -> AppResult<Json<i64>> {
    let count = state.services.books.count_checked_out().await?;
    Ok(Json(count))
}

/// Check a book out to a patron
#[utoipa::path(
    post,
    path = "/books/{id}/checkout",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Book checked out", body = Book),
        (status = 404, description = "Book or patron not found"),
        (status = 409, description = "Book already checked out")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<Book>> {
    claims.require_staff()?;
    let book = state.services.books.checkout(id, request.patron_id).await?;
    Ok(Json(book))
}

/// Return a checked out book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book returned", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book was not checked out")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    claims.require_staff()?;
    let book = state.services.books.return_book(id).await?;
    Ok(Json(book))
}
