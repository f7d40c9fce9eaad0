//! Admin endpoints
//!
//! Responses are hypermedia models built by [`AdminModelAssembler`].

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    assembler::{AdminModelAssembler, CollectionModel, EntityModel, ModelAssembler},
    error::AppResult,
    models::admin::{Admin, AdminPayload},
};

use super::AuthenticatedUser;

/// 201 with the model and a Location header pointing at it
fn created(model: EntityModel<Admin>) -> Response {
    let location = model.self_href().unwrap_or("/admins").to_string();
    (StatusCode::CREATED, [(LOCATION, location)], Json(model)).into_response()
}

/// List all admins
#[utoipa::path(
    get,
    path = "/admins",
    tag = "admins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admins embedded under _embedded.adminList", body = Vec<Admin>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn all(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CollectionModel<Admin>>> {
    claims.require_staff()?;
    let admins = state.services.admins.list().await?;
    Ok(Json(AdminModelAssembler.to_collection_model(admins)))
}

/// Get admin by ID
#[utoipa::path(
    get,
    path = "/admins/{id}",
    tag = "admins",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin with _links", body = Admin),
        (status = 404, description = "Admin not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn one(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EntityModel<Admin>>> {
    claims.require_staff()?;
    let admin = state.services.admins.get_by_id(id).await?;
    Ok(Json(AdminModelAssembler.to_model(admin)))
}

/// Create an admin
#[utoipa::path(
    post,
    path = "/admins",
    tag = "admins",
    security(("bearer_auth" = [])),
    request_body = AdminPayload,
    responses(
        (status = 201, description = "Admin created", body = Admin),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Superadmin privileges required"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<AdminPayload>,
) -> AppResult<Response> {
    claims.require_superadmin()?;
    let admin = state.services.admins.create(payload).await?;
    Ok(created(AdminModelAssembler.to_model(admin)))
}

/// Replace an admin, creating it at this ID when absent
#[utoipa::path(
    put,
    path = "/admins/{id}",
    tag = "admins",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Admin ID")),
    request_body = AdminPayload,
    responses(
        (status = 201, description = "Admin replaced or created", body = Admin),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn replace(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<AdminPayload>,
) -> AppResult<Response> {
    claims.require_superadmin()?;
    let admin = state.services.admins.replace(id, payload).await?;
    Ok(created(AdminModelAssembler.to_model(admin)))
}

/// Delete an admin
#[utoipa::path(
    delete,
    path = "/admins/{id}",
    tag = "admins",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Admin ID")),
    responses(
        (status = 204, description = "Admin deleted, or never existed")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_superadmin()?;
    state.services.admins.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
