use crate::api::{ApiJson, ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::{cupboard, Outcome};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddToCupboardRequest {
    /// Catalog id of the ingredient
    pub id: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/cupboard",
    tag = "cupboard",
    request_body(content = AddToCupboardRequest, example = json!({"id": 1})),
    responses(
        (status = 201, description = "Ingredient added to cupboard", body = MessageResponse),
        (status = 200, description = "Ingredient already in cupboard", body = MessageResponse),
        (status = 400, description = "Missing or unknown ingredient id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_to_cupboard(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<AddToCupboardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;

    let response = match cupboard::add_to_cupboard(&mut conn, user.id, req.id)? {
        Outcome::Created(()) => (
            StatusCode::CREATED,
            Json(MessageResponse::new("Ingredient added to cupboard")),
        ),
        Outcome::Existing(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Ingredient already in cupboard")),
        ),
    };

    Ok(response)
}
