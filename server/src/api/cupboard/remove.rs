use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::services::cupboard;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/cupboard/{ingredient_id}",
    tag = "cupboard",
    params(
        ("ingredient_id" = i32, Path, description = "Catalog id of the ingredient")
    ),
    responses(
        (status = 200, description = "Ingredient deleted from cupboard", body = MessageResponse),
        (status = 404, description = "Ingredient not found in cupboard", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_from_cupboard(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(ingredient_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = pool.get()?;
    cupboard::remove_from_cupboard(&mut conn, user.id, ingredient_id)?;
    Ok(Json(MessageResponse::new("Ingredient deleted from cupboard")))
}
