use crate::error::ServiceError;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("Failed to run database migrations: {0}")]
    Migrations(String),
}

pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, SetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().max_size(max_size).build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| SetupError::Migrations(e.to_string()))?;
    for version in applied {
        tracing::info!(%version, "applied migration");
    }

    Ok(pool)
}

/// Runs `work` as a single unit of work.
///
/// The transaction commits only if `work` returns `Ok`. Any error, including a
/// failed commit, rolls back every write made by `work`. Storage failures are
/// logged against `operation` before being handed back.
pub fn transact<T, F>(conn: &mut PgConnection, operation: &str, work: F) -> Result<T, ServiceError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, ServiceError>,
{
    conn.transaction(work).inspect_err(|e| {
        if let ServiceError::Storage(cause) = e {
            tracing::error!(operation, error = %cause, "unit of work rolled back");
        }
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::schema::users;

    fn user_count(conn: &mut PgConnection, username: &str) -> i64 {
        users::table
            .filter(users::username.eq(username))
            .count()
            .get_result(conn)
            .unwrap()
    }

    fn insert_user(conn: &mut PgConnection, username: &str) -> QueryResult<usize> {
        diesel::insert_into(users::table)
            .values(NewUser {
                username,
                password_hash: "not-a-real-hash",
            })
            .execute(conn)
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_transact_rolls_back_writes_already_made() {
        let mut conn = testing::conn();

        let result: Result<(), ServiceError> = transact(&mut conn, "rollback_check", |conn| {
            insert_user(conn, "transact_rolled_back")?;
            assert_eq!(user_count(conn, "transact_rolled_back"), 1);
            Err(ServiceError::Storage(diesel::result::Error::NotFound))
        });

        assert!(matches!(
            result,
            Err(ServiceError::Storage(diesel::result::Error::NotFound))
        ));
        assert_eq!(user_count(&mut conn, "transact_rolled_back"), 0);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_transact_rolls_back_on_client_error_too() {
        let mut conn = testing::conn();

        let result: Result<(), ServiceError> = transact(&mut conn, "rollback_check", |conn| {
            insert_user(conn, "transact_validation")?;
            Err(ServiceError::validation("rejected after the write"))
        });

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(user_count(&mut conn, "transact_validation"), 0);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_transact_keeps_writes_on_success() {
        let mut conn = testing::conn();

        let inserted = transact(&mut conn, "commit_check", |conn| {
            Ok(insert_user(conn, "transact_committed")?)
        })
        .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(user_count(&mut conn, "transact_committed"), 1);
    }
}
