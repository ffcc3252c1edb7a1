use crate::auth::{create_session, hash_password, verify_password};
use crate::db::transact;
use crate::error::ServiceError;
use crate::models::{NewUser, User};
use crate::schema::{sessions, users};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const MAX_USERNAME_LEN: usize = 100;

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ServiceError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::validation(message)),
    }
}

fn hash(password: &str) -> Result<String, ServiceError> {
    hash_password(password)
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {e}")))
}

#[tracing::instrument(skip(conn, password))]
pub fn register(
    conn: &mut PgConnection,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, ServiceError> {
    let username = required(username.map(str::trim), "Username is required")?;
    let password = required(password, "Password is required")?;
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ServiceError::validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }

    let password_hash = hash(password)?;

    transact(conn, "register", |conn| {
        let inserted = diesel::insert_into(users::table)
            .values(NewUser {
                username,
                password_hash: &password_hash,
            })
            .returning(User::as_returning())
            .get_result(conn);

        match inserted {
            Ok(user) => {
                tracing::info!(user_id = user.id, "registered user");
                Ok(user)
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(ServiceError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    })
}

/// Registers a user and issues their first session token in one unit of work,
/// so a failed session insert leaves no account behind.
pub fn register_with_session(
    conn: &mut PgConnection,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(User, String), ServiceError> {
    transact(conn, "register_with_session", |conn| {
        let user = register(conn, username, password)?;
        let token = create_session(conn, user.id)?;
        Ok((user, token))
    })
}

/// Checks a username/password pair. Both failure modes are client errors.
pub fn authenticate(
    conn: &mut PgConnection,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, ServiceError> {
    let username = required(username.map(str::trim), "Username is required")?;
    let password = required(password, "Password is required")?;

    let user = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ServiceError::validation("User not found"))?;

    if !verify_password(password, &user.password_hash) {
        return Err(ServiceError::validation("Invalid credentials"));
    }

    Ok(user)
}

/// Replaces the password hash, revokes every existing session and returns a
/// fresh token for the caller.
#[tracing::instrument(skip(conn, current_password, new_password))]
pub fn change_password(
    conn: &mut PgConnection,
    user_id: i32,
    current_password: Option<&str>,
    new_password: Option<&str>,
) -> Result<String, ServiceError> {
    let current_password = required(current_password, "Current password is required")?;
    let new_password = required(new_password, "New password is required")?;

    transact(conn, "change_password", |conn| {
        let stored: String = users::table
            .find(user_id)
            .select(users::password_hash)
            .first(conn)?;

        if !verify_password(current_password, &stored) {
            return Err(ServiceError::validation("Invalid credentials"));
        }

        let password_hash = hash(new_password)?;
        diesel::update(users::table.find(user_id))
            .set((
                users::password_hash.eq(&password_hash),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?;

        Ok(create_session(conn, user_id)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_register_with_session_issues_working_token() {
        let mut conn = testing::conn();

        let (user, token) =
            register_with_session(&mut conn, Some("accounts_with_session"), Some("pw123")).unwrap();
        let found = crate::auth::find_user_by_token(&mut conn, &token)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);

        let err = register_with_session(&mut conn, Some("accounts_with_session"), Some("pw"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let sessions: i64 = sessions::table
            .filter(sessions::user_id.eq(user.id))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(sessions, 1);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_register_then_authenticate() {
        let mut conn = testing::conn();

        let user = register(&mut conn, Some("accounts_alice"), Some("pw123")).unwrap();
        assert_eq!(user.username, "accounts_alice");
        assert_ne!(user.password_hash, "pw123");

        let found = authenticate(&mut conn, Some("accounts_alice"), Some("pw123")).unwrap();
        assert_eq!(found.id, user.id);

        let err = authenticate(&mut conn, Some("accounts_alice"), Some("nope")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid credentials"));

        let err = authenticate(&mut conn, Some("accounts_nobody"), Some("pw123")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "User not found"));
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_register_rejects_duplicates_and_missing_fields() {
        let mut conn = testing::conn();

        register(&mut conn, Some("accounts_dupe"), Some("pw")).unwrap();
        let err = register(&mut conn, Some("accounts_dupe"), Some("other")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = register(&mut conn, None, Some("pw")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Username is required"));

        let err = register(&mut conn, Some("accounts_nopw"), Some("")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Password is required"));
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_change_password_revokes_old_sessions() {
        let mut conn = testing::conn();

        let user = register(&mut conn, Some("accounts_rotate"), Some("old-pw")).unwrap();
        create_session(&mut conn, user.id).unwrap();

        let err = change_password(&mut conn, user.id, Some("wrong"), Some("new-pw")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        change_password(&mut conn, user.id, Some("old-pw"), Some("new-pw")).unwrap();

        let remaining: i64 = sessions::table
            .filter(sessions::user_id.eq(user.id))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(remaining, 1);

        assert!(authenticate(&mut conn, Some("accounts_rotate"), Some("old-pw")).is_err());
        assert!(authenticate(&mut conn, Some("accounts_rotate"), Some("new-pw")).is_ok());
    }
}
