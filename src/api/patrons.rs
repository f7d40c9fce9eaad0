//! Patron endpoints
//!
//! Patron passwords are accepted on writes and never serialized back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::patron::{Patron, PatronPayload},
};

use super::AuthenticatedUser;

/// List all patrons
#[utoipa::path(
    get,
    path = "/patron",
    tag = "patrons",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All patrons", body = Vec<Patron>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Patron>>> {
    claims.require_staff()?;
    let patrons = state.services.patrons.list().await?;
    Ok(Json(patrons))
}

/// Get patron by ID
#[utoipa::path(
    get,
    path = "/patron/{id}",
    tag = "patrons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Patron ID")),
    responses(
        (status = 200, description = "Patron details", body = Patron),
        (status = 403, description = "Not this patron"),
        (status = 404, description = "Patron not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Patron>> {
    claims.require_patron_or_staff(id)?;
    let patron = state.services.patrons.get_by_id(id).await?;
    Ok(Json(patron))
}

/// Register a patron
#[utoipa::path(
    post,
    path = "/patron",
    tag = "patrons",
    request_body = PatronPayload,
    responses(
        (status = 201, description = "Patron registered", body = Patron),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    Json(payload): Json<PatronPayload>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    let patron = state.services.patrons.create(payload).await?;
    Ok((StatusCode::CREATED, Json(patron)))
}

/// Replace a patron, creating it at this ID when absent
#[utoipa::path(
    put,
    path = "/patron/{id}",
    tag = "patrons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Patron ID")),
    request_body = PatronPayload,
    responses(
        (status = 201, description = "Patron replaced or created", body = Patron),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn replace(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<PatronPayload>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    claims.require_staff()?;
    let patron = state.services.patrons.replace(id, payload).await?;
    Ok((StatusCode::CREATED, Json(patron)))
}

/// Delete a patron
#[utoipa::path(
    delete,
    path = "/patron/{id}",
    tag = "patrons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Patron ID")),
    responses(
        (status = 204, description = "Patron deleted, or never existed"),
        (status = 409, description = "Patron still has checked out books")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.patrons.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
