use crate::api::{ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::ingredients;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: Option<String>,
    /// One of the category names, e.g. `dairy` or `herbs_spices`
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateIngredientResponse {
    pub id: i32,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body(content = CreateIngredientRequest, example = json!({"name": "Egg", "category": "dairy"})),
    responses(
        (status = 201, description = "Ingredient successfully created", body = CreateIngredientResponse),
        (status = 200, description = "Ingredient already exists in this category", body = CreateIngredientResponse),
        (status = 400, description = "Missing name or category, or unknown category", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredient(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;

    let outcome =
        ingredients::create_ingredient(&mut conn, req.name.as_deref(), req.category.as_deref())?;

    let (status, message) = if outcome.is_created() {
        (StatusCode::CREATED, "Ingredient successfully created")
    } else {
        (StatusCode::OK, "Ingredient already exists")
    };

    Ok((
        status,
        Json(CreateIngredientResponse {
            id: outcome.into_inner(),
            message: message.to_string(),
        }),
    ))
}
