use crate::api::{ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::recipes::{self, RecipeInput};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub method: Option<String>,
    pub image_url: Option<String>,
    /// Catalog ids; repeated ids are linked once
    pub ingredient_ids: Option<Vec<i32>>,
}

impl CreateRecipeRequest {
    fn input(&self) -> RecipeInput<'_> {
        RecipeInput {
            title: self.title.as_deref(),
            method: self.method.as_deref(),
            image_url: self.image_url.as_deref(),
            ingredient_ids: self.ingredient_ids.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: i32,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content = CreateRecipeRequest, example = json!({"title": "Omelette", "method": "Whisk and fry", "ingredient_ids": [1]})),
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Missing title or ingredients, or unknown ingredient id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;
    let id = recipes::create_recipe(&mut conn, user.id, request.input())?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            id,
            message: "Recipe created successfully".to_string(),
        }),
    ))
}
