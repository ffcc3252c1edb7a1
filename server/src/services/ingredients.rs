use super::Outcome;
use crate::db::transact;
use crate::error::ServiceError;
use crate::models::{Category, Ingredient, NewIngredient};
use crate::schema::ingredients;
use diesel::prelude::*;
use diesel::sql_types::Text;
use std::borrow::Cow;

/// Longest name the `ingredients.name` column accepts
pub const MAX_NAME_LEN: usize = 100;

diesel::define_sql_function! {
    fn lower(x: Text) -> Text;
}

/// Postgres rejects a LIKE pattern ending in an unpaired escape character.
/// Doubling it makes the trailing backslash match itself.
fn close_trailing_escape(pattern: &str) -> Cow<'_, str> {
    let trailing = pattern.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        Cow::Owned(format!("{pattern}\\"))
    } else {
        Cow::Borrowed(pattern)
    }
}

/// Case-insensitive LIKE match on the ingredient name.
///
/// `%` and `_` in `pattern` keep their LIKE meaning, so `egg` only matches
/// names equal to "egg" in any case while `%egg%` matches any name containing it.
/// A trailing lone `\` matches a literal backslash.
pub fn search_by_name(
    conn: &mut PgConnection,
    pattern: &str,
) -> Result<Vec<Ingredient>, ServiceError> {
    let pattern = close_trailing_escape(pattern);
    let found = ingredients::table
        .filter(ingredients::name.ilike(&*pattern))
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::id.asc()))
        .load(conn)?;

    if found.is_empty() {
        return Err(ServiceError::not_found("Ingredient not found"));
    }

    Ok(found)
}

fn find_in_category(
    conn: &mut PgConnection,
    name: &str,
    category: Category,
) -> QueryResult<Option<i32>> {
    ingredients::table
        .filter(lower(ingredients::name).eq(lower(name)))
        .filter(ingredients::category.eq(category))
        .select(ingredients::id)
        .first(conn)
        .optional()
}

/// Adds a catalog entry, or returns the id of the entry that already has
/// this name (ignoring case) in the same category.
#[tracing::instrument(skip(conn))]
pub fn create_ingredient(
    conn: &mut PgConnection,
    name: Option<&str>,
    category: Option<&str>,
) -> Result<Outcome<i32>, ServiceError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ServiceError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }

    let category = match category.map(str::trim) {
        None | Some("") => return Err(ServiceError::validation("Category is required")),
        Some(raw) => raw
            .parse::<Category>()
            .map_err(|_| ServiceError::validation("Invalid category"))?,
    };

    transact(conn, "create_ingredient", |conn| {
        if let Some(id) = find_in_category(conn, name, category)? {
            return Ok(Outcome::Existing(id));
        }

        // A concurrent request may have inserted the same entry since the lookup;
        // the unique index turns our insert into a no-op and we report theirs.
        let inserted: Option<i32> = diesel::insert_into(ingredients::table)
            .values(NewIngredient { name, category })
            .on_conflict_do_nothing()
            .returning(ingredients::id)
            .get_result(conn)
            .optional()?;

        match inserted {
            Some(id) => {
                tracing::info!(id, name, %category, "created ingredient");
                Ok(Outcome::Created(id))
            }
            None => find_in_category(conn, name, category)?
                .map(Outcome::Existing)
                .ok_or(ServiceError::Storage(diesel::result::Error::NotFound)),
        }
    })
}
