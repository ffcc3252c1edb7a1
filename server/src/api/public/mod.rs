pub mod auth;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register::register))
        .route("/api/auth/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::register::register, auth::login::login),
    components(schemas(
        auth::CredentialsRequest,
        auth::login::LoginResponse,
        auth::register::RegisterResponse,
    ))
)]
pub struct ApiDoc;
