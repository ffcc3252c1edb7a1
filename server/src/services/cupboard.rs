use super::Outcome;
use crate::db::transact;
use crate::error::ServiceError;
use crate::models::{Ingredient, NewUserIngredient};
use crate::schema::{ingredients, user_ingredients};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Every ingredient in the user's cupboard, by name.
pub fn list_cupboard(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Vec<Ingredient>, ServiceError> {
    let items = ingredients::table
        .inner_join(user_ingredients::table)
        .filter(user_ingredients::user_id.eq(user_id))
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::id.asc()))
        .load(conn)?;

    Ok(items)
}

/// Adds an ingredient to the cupboard. Adding one that is already there is a no-op.
#[tracing::instrument(skip(conn))]
pub fn add_to_cupboard(
    conn: &mut PgConnection,
    user_id: i32,
    ingredient_id: Option<i32>,
) -> Result<Outcome<()>, ServiceError> {
    let ingredient_id =
        ingredient_id.ok_or_else(|| ServiceError::validation("Ingredient ID is required"))?;

    transact(conn, "add_to_cupboard", |conn| {
        // The unique (user_id, ingredient_id) constraint makes a duplicate add affect no rows
        let inserted = diesel::insert_into(user_ingredients::table)
            .values(NewUserIngredient {
                user_id,
                ingredient_id,
            })
            .on_conflict((user_ingredients::user_id, user_ingredients::ingredient_id))
            .do_nothing()
            .execute(conn);

        match inserted {
            Ok(0) => Ok(Outcome::Existing(())),
            Ok(_) => Ok(Outcome::Created(())),
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                Err(ServiceError::validation(format!(
                    "Ingredient with id {ingredient_id} doesn't exist"
                )))
            }
            Err(e) => Err(e.into()),
        }
    })
}

#[tracing::instrument(skip(conn))]
pub fn remove_from_cupboard(
    conn: &mut PgConnection,
    user_id: i32,
    ingredient_id: i32,
) -> Result<(), ServiceError> {
    transact(conn, "remove_from_cupboard", |conn| {
        let deleted = diesel::delete(
            user_ingredients::table
                .filter(user_ingredients::user_id.eq(user_id))
                .filter(user_ingredients::ingredient_id.eq(ingredient_id)),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(ServiceError::not_found("Ingredient not found in cupboard"));
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use crate::models::Category;
    use crate::services::{accounts, ingredients::create_ingredient};

    fn setup(conn: &mut PgConnection, username: &str) -> (i32, i32) {
        let user = accounts::register(conn, Some(username), Some("pw123")).unwrap();
        let ingredient = create_ingredient(
            conn,
            Some(format!("Cupboard test item {username}").as_str()),
            Some(Category::Other.as_str()),
        )
        .unwrap()
        .into_inner();
        (user.id, ingredient)
    }

    fn cupboard_rows(conn: &mut PgConnection, user_id: i32) -> i64 {
        user_ingredients::table
            .filter(user_ingredients::user_id.eq(user_id))
            .count()
            .get_result(conn)
            .unwrap()
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_add_twice_keeps_one_row() {
        let mut conn = testing::conn();
        let (user_id, ingredient_id) = setup(&mut conn, "cupboard_add_twice");

        let first = add_to_cupboard(&mut conn, user_id, Some(ingredient_id)).unwrap();
        let second = add_to_cupboard(&mut conn, user_id, Some(ingredient_id)).unwrap();

        assert_eq!(first, Outcome::Created(()));
        assert_eq!(second, Outcome::Existing(()));
        assert_eq!(cupboard_rows(&mut conn, user_id), 1);

        let listed = list_cupboard(&mut conn, user_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ingredient_id);
        assert_eq!(listed[0].category, Category::Other);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_add_without_id_is_validation_error() {
        let mut conn = testing::conn();
        let (user_id, _) = setup(&mut conn, "cupboard_add_missing");

        let err = add_to_cupboard(&mut conn, user_id, None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(cupboard_rows(&mut conn, user_id), 0);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_add_unknown_ingredient_is_rejected() {
        let mut conn = testing::conn();
        let (user_id, _) = setup(&mut conn, "cupboard_add_unknown");

        let err = add_to_cupboard(&mut conn, user_id, Some(i32::MAX)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // The failed insert was rolled back to its savepoint, the connection is still usable
        assert_eq!(cupboard_rows(&mut conn, user_id), 0);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_remove_missing_entry_is_not_found() {
        let mut conn = testing::conn();
        let (user_id, ingredient_id) = setup(&mut conn, "cupboard_remove_missing");

        let err = remove_from_cupboard(&mut conn, user_id, ingredient_id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(cupboard_rows(&mut conn, user_id), 0);
    }

    #[test]
    #[ignore = "needs TEST_DATABASE_URL"]
    fn test_remove_only_touches_own_cupboard() {
        let mut conn = testing::conn();
        let (alice, ingredient_id) = setup(&mut conn, "cupboard_remove_alice");
        let bob = accounts::register(&mut conn, Some("cupboard_remove_bob"), Some("pw"))
            .unwrap()
            .id;

        add_to_cupboard(&mut conn, alice, Some(ingredient_id)).unwrap();

        let err = remove_from_cupboard(&mut conn, bob, ingredient_id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(cupboard_rows(&mut conn, alice), 1);

        remove_from_cupboard(&mut conn, alice, ingredient_id).unwrap();
        assert_eq!(cupboard_rows(&mut conn, alice), 0);
        assert!(list_cupboard(&mut conn, alice).unwrap().is_empty());
    }
}
