//! Authentication endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::auth::{Claims, SigninRequest, SigninResponse},
};

use super::AuthenticatedUser;

/// Sign in with email and password
///
/// The credential verifier's answer is passed through as is.
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 401, description = "Invalid username or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<crate::AppState>,
    Json(request): Json<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let response = state.services.auth.sign_in(&request).await?;
    Ok(Json(response))
}

/// Claims of the current token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current caller", body = Claims),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<Claims> {
    Json(claims)
}
