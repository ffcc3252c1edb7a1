use crate::api::{nullable, ApiJson, ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::recipes::{self, RecipeChanges};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Omitted fields keep their current value; `null` clears `method` or
/// `image_url`. A non-empty `ingredient_ids` replaces the recipe's whole
/// ingredient list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub method: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub ingredient_ids: Option<Vec<i32>>,
}

impl UpdateRecipeRequest {
    fn changes(&self) -> RecipeChanges<'_> {
        RecipeChanges {
            title: self.title.as_deref(),
            method: self.method.as_ref().map(Option::as_deref),
            image_url: self.image_url.as_ref().map(Option::as_deref),
            ingredient_ids: self.ingredient_ids.as_deref(),
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = MessageResponse),
        (status = 400, description = "Invalid field or unknown ingredient id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;
    recipes::update_recipe(&mut conn, user.id, id, request.changes())?;
    Ok(Json(MessageResponse::new("Recipe updated")))
}
