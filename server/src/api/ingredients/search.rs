use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::models::Ingredient;
use crate::services::ingredients;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/ingredients/{name}",
    tag = "ingredients",
    params(
        ("name" = String, Path, description = "Name to match, ignoring case. `%` and `_` act as wildcards")
    ),
    responses(
        (status = 200, description = "Matching catalog entries", body = Vec<Ingredient>),
        (status = 404, description = "Ingredient not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_ingredients(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;
    let found = ingredients::search_by_name(&mut conn, &name)?;
    Ok(Json(found))
}
