//! Data-layer operations behind the HTTP handlers.
//!
//! Every function takes a plain `PgConnection` and the caller's user id, so
//! the same code runs against a pooled connection in production and a test
//! transaction in tests. Writes go through [`crate::db::transact`].

pub mod accounts;
pub mod cupboard;
pub mod ingredients;
pub mod recipes;

/// Result of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    /// A new row was inserted
    Created(T),
    /// An equivalent row already existed; nothing was written
    Existing(T),
}

impl<T> Outcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Created(value) | Outcome::Existing(value) => value,
        }
    }
}
