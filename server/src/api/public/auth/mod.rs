pub mod login;
pub mod register;

use serde::Deserialize;
use utoipa::ToSchema;

/// Body shared by register and login. Missing fields are reported as 400s by
/// the account service rather than rejected during deserialization.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}
