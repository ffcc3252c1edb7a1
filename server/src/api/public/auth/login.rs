use super::CredentialsRequest;
use crate::api::{ApiJson, ErrorResponse};
use crate::auth::create_session;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::accounts;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = CredentialsRequest, example = json!({"username": "alice", "password": "pw123"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing field, unknown user or invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;

    let user = accounts::authenticate(&mut conn, req.username.as_deref(), req.password.as_deref())?;
    let token = create_session(&mut conn, user.id)?;

    Ok(Json(LoginResponse { token }))
}
