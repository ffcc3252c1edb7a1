pub mod add;
pub mod list;
pub mod remove;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/cupboard endpoints (mounted at /api/cupboard)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_cupboard).post(add::add_to_cupboard))
        .route("/{ingredient_id}", delete(remove::remove_from_cupboard))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_cupboard, add::add_to_cupboard, remove::remove_from_cupboard),
    components(schemas(add::AddToCupboardRequest))
)]
pub struct ApiDoc;
