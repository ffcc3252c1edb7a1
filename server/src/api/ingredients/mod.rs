pub mod create;
pub mod search;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredients endpoints (mounted at /api/ingredients)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create::create_ingredient))
        .route("/{name}", get(search::search_ingredients))
}

#[derive(OpenApi)]
#[openapi(
    paths(search::search_ingredients, create::create_ingredient),
    components(schemas(create::CreateIngredientRequest, create::CreateIngredientResponse))
)]
pub struct ApiDoc;
