mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password};
pub use db::create_session;
#[cfg(test)]
pub use db::find_user_by_token;
pub use extractor::AuthUser;
