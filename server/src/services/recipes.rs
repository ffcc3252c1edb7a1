use crate::db::transact;
use crate::error::ServiceError;
use crate::models::{Ingredient, NewRecipe, NewRecipeIngredient, Recipe, RecipeChangeset};
use crate::schema::{ingredients, recipe_ingredients, recipes};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

const MAX_TITLE_LEN: usize = 100;
const MAX_IMAGE_URL_LEN: usize = 500;

/// A recipe with the catalog entries it uses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecipeView {
    pub id: i32,
    pub title: String,
    pub method: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

/// Fields of a new recipe as supplied by a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeInput<'a> {
    pub title: Option<&'a str>,
    pub method: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub ingredient_ids: Option<&'a [i32]>,
}

/// Partial update of a recipe. The outer `None` keeps the stored value;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeChanges<'a> {
    pub title: Option<&'a str>,
    pub method: Option<Option<&'a str>>,
    pub image_url: Option<Option<&'a str>>,
    pub ingredient_ids: Option<&'a [i32]>,
}

fn validate_title(title: &str) -> Result<&str, ServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title)
}

fn validate_image_url(image_url: Option<&str>) -> Result<(), ServiceError> {
    match image_url {
        Some(url) if url.chars().count() > MAX_IMAGE_URL_LEN => Err(ServiceError::validation(
            format!("Image URL must be at most {MAX_IMAGE_URL_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// First id of `requested`, in request order, that is not in `existing`.
fn first_missing(requested: &[i32], existing: &HashSet<i32>) -> Option<i32> {
    requested.iter().copied().find(|id| !existing.contains(id))
}

/// Fails on the first requested id that has no catalog entry.
fn ensure_ingredients_exist(conn: &mut PgConnection, ids: &[i32]) -> Result<(), ServiceError> {
    let existing: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(ids))
        .select(ingredients::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();

    match first_missing(ids, &existing) {
        Some(missing) => Err(ServiceError::validation(format!(
            "Ingredient with id {missing} doesn't exist"
        ))),
        None => Ok(()),
    }
}

fn link_ingredients(conn: &mut PgConnection, recipe_id: i32, ids: &[i32]) -> QueryResult<usize> {
    let links: Vec<NewRecipeIngredient> = ids
        .iter()
        .map(|&ingredient_id| NewRecipeIngredient {
            recipe_id,
            ingredient_id,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&links)
        .execute(conn)
}

fn group_by_recipe(rows: Vec<(i32, Ingredient)>) -> HashMap<i32, Vec<Ingredient>> {
    let mut grouped: HashMap<i32, Vec<Ingredient>> = HashMap::new();
    for (recipe_id, ingredient) in rows {
        grouped.entry(recipe_id).or_default().push(ingredient);
    }
    grouped
}

/// All of the user's recipes with their ingredients.
///
/// Uses two queries no matter how many recipes there are: one for the
/// recipes and one for every ingredient link of the whole set.
pub fn list_recipes(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Vec<RecipeView>, ServiceError> {
    let owned: Vec<Recipe> = recipes::table
        .filter(recipes::user_id.eq(user_id))
        .select(Recipe::as_select())
        .order(recipes::id.asc())
        .load(conn)?;

    if owned.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = owned.iter().map(|r| r.id).collect();
    let rows: Vec<(i32, Ingredient)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .select((recipe_ingredients::recipe_id, Ingredient::as_select()))
        .order((recipe_ingredients::recipe_id.asc(), recipe_ingredients::id.asc()))
        .load(conn)?;

    let mut by_recipe = group_by_recipe(rows);

    Ok(owned
        .into_iter()
        .map(|recipe| RecipeView {
            ingredients: by_recipe.remove(&recipe.id).unwrap_or_default(),
            id: recipe.id,
            title: recipe.title,
            method: recipe.method,
            image_url: recipe.image_url,
        })
        .collect())
}

/// Creates a recipe and its ingredient links. Returns the new recipe id.
#[tracing::instrument(skip(conn))]
pub fn create_recipe(
    conn: &mut PgConnection,
    user_id: i32,
    input: RecipeInput<'_>,
) -> Result<i32, ServiceError> {
    let title = validate_title(input.title.unwrap_or_default())?;
    let ingredient_ids = match input.ingredient_ids {
        Some(ids) if !ids.is_empty() => dedup_ids(ids),
        _ => {
            return Err(ServiceError::validation(
                "A list of ingredient IDs are required",
            ))
        }
    };
    validate_image_url(input.image_url)?;

    transact(conn, "create_recipe", |conn| {
        ensure_ingredients_exist(conn, &ingredient_ids)?;

        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                user_id,
                title,
                method: input.method,
                image_url: input.image_url,
            })
            .returning(recipes::id)
            .get_result(conn)?;

        link_ingredients(conn, recipe_id, &ingredient_ids)?;

        tracing::info!(recipe_id, links = ingredient_ids.len(), "created recipe");
        Ok(recipe_id)
    })
}

/// Applies a partial update to a recipe the user owns.
///
/// A non-empty `ingredient_ids` replaces the whole ingredient set; omitted or
/// empty leaves it as it is. Ownership is checked before any field, so a
/// recipe the user cannot see is always reported as missing.
#[tracing::instrument(skip(conn))]
pub fn update_recipe(
    conn: &mut PgConnection,
    user_id: i32,
    recipe_id: i32,
    changes: RecipeChanges<'_>,
) -> Result<(), ServiceError> {
    let replacement = changes
        .ingredient_ids
        .filter(|ids| !ids.is_empty())
        .map(dedup_ids);

    transact(conn, "update_recipe", |conn| {
        // Another user's recipe is reported exactly like a missing one
        let owned = recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::user_id.eq(user_id))
            .select(recipes::id)
            .first::<i32>(conn)
            .optional()?;
        if owned.is_none() {
            return Err(ServiceError::not_found("Recipe not found"));
        }

        let title = changes.title.map(validate_title).transpose()?;
        validate_image_url(changes.image_url.flatten())?;

        if let Some(ids) = &replacement {
            ensure_ingredients_exist(conn, ids)?;
        }

        diesel::update(recipes::table.find(recipe_id))
            .set(RecipeChangeset {
                title,
                method: changes.method,
                image_url: changes.image_url,
                updated_at: Utc::now(),
            })
            .execute(conn)?;

        if let Some(ids) = &replacement {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            link_ingredients(conn, recipe_id, ids)?;
        }

        Ok(())
    })
}

/// Deletes a recipe the user owns. Its ingredient links go with it through
/// the foreign key's ON DELETE CASCADE.
#[tracing::instrument(skip(conn))]
pub fn delete_recipe(
    conn: &mut PgConnection,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), ServiceError> {
    transact(conn, "delete_recipe", |conn| {
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::user_id.eq(user_id)),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(ServiceError::not_found("Recipe not found"));
        }

        Ok(())
    })
}
