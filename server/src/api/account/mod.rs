pub mod password;

use crate::AppState;
use axum::routing::put;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/auth endpoints that need a session (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new().route("/password", put(password::change_password))
}

#[derive(OpenApi)]
#[openapi(
    paths(password::change_password),
    components(schemas(password::ChangePasswordRequest, password::ChangePasswordResponse))
)]
pub struct ApiDoc;
