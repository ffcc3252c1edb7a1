use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

/// How long a bearer token stays valid after login
pub const SESSION_TTL_DAYS: i64 = 30;

/// Issues a new bearer token for `user_id`. Only its hash is stored.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    diesel::insert_into(sessions::table)
        .values(NewSession {
            user_id,
            token_hash: &token_hash,
            expires_at,
        })
        .execute(conn)?;

    Ok(token)
}

pub fn find_user_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<User>, diesel::result::Error> {
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use crate::services::accounts;

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_token_resolves_to_its_user() {
        let mut conn = testing::conn();
        let user = accounts::register(&mut conn, Some("session_owner"), Some("pw")).unwrap();

        let token = create_session(&mut conn, user.id).unwrap();
        let found = find_user_by_token(&mut conn, &token).unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(find_user_by_token(&mut conn, "not-a-token").unwrap().is_none());
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_expired_session_is_rejected() {
        let mut conn = testing::conn();
        let user = accounts::register(&mut conn, Some("session_expired"), Some("pw")).unwrap();
        let token = create_session(&mut conn, user.id).unwrap();

        diesel::update(sessions::table.filter(sessions::user_id.eq(user.id)))
            .set(sessions::expires_at.eq(Utc::now() - Duration::minutes(1)))
            .execute(&mut conn)
            .unwrap();

        assert!(find_user_by_token(&mut conn, &token).unwrap().is_none());
    }
}
