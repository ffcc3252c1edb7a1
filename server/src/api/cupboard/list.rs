use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::models::Ingredient;
use crate::services::cupboard;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/cupboard",
    tag = "cupboard",
    responses(
        (status = 200, description = "Ingredients in the user's cupboard", body = Vec<Ingredient>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_cupboard(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;
    let items = cupboard::list_cupboard(&mut conn, user.id)?;
    Ok(Json(items))
}
