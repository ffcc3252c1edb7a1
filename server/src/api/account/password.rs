use crate::api::{ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::accounts;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChangePasswordResponse {
    /// Replaces every token issued before the change
    pub token: String,
}

#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, other sessions revoked", body = ChangePasswordResponse),
        (status = 400, description = "Wrong current password or missing field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;

    let token = accounts::change_password(
        &mut conn,
        user.id,
        req.current_password.as_deref(),
        req.new_password.as_deref(),
    )?;

    Ok(Json(ChangePasswordResponse { token }))
}
