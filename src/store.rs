//! Storage operations for the recipe catalog.
//!
//! Every write happens inside a single transaction; a recipe and all of its
//! children become visible atomically or not at all. Reads run as plain
//! queries since recipes are immutable once created.

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::error::StoreError;
use crate::models::{NewIngredient, NewRecipe, NewRecipeIngredient, NewRecipeStep, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipe_steps, recipes};

/// A validated recipe ready to persist.
#[derive(Debug, Clone)]
pub struct NewRecipeData {
    pub name: String,
    pub picture_path: Option<String>,
    pub cooking_time: Option<i32>,
    pub estimated_price: Option<f64>,
    pub rating: Option<i32>,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<StepLine>,
}

#[derive(Debug, Clone)]
pub struct IngredientLine {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StepLine {
    pub instruction: String,
}

#[derive(Debug)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientDetail>,
    pub steps: Vec<StepDetail>,
}

/// One ingredient line of a recipe, with the unit already resolved.
#[derive(Debug)]
pub struct IngredientDetail {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Queryable)]
pub struct StepDetail {
    pub step_number: i32,
    pub instruction: String,
}

/// Insert a recipe with its ingredient links and steps in one transaction.
/// Returns the generated recipe id.
///
/// Ingredients form a shared catalog: a name that already exists is reused
/// via `ON CONFLICT (name)`, never duplicated. The upsert also overwrites the
/// catalog row's default unit with the latest submitted value (last writer
/// wins), matching how the catalog has always behaved.
pub fn create_recipe(conn: &mut PgConnection, data: &NewRecipeData) -> Result<i32, StoreError> {
    conn.transaction(|conn| {
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                name: &data.name,
                picture_path: data.picture_path.as_deref(),
                cooking_time: data.cooking_time,
                estimated_price: data.estimated_price,
                rating: data.rating,
            })
            .returning(recipes::id)
            .get_result(conn)?;

        for line in &data.ingredients {
            let ingredient_id: i32 = diesel::insert_into(ingredients::table)
                .values(NewIngredient {
                    name: &line.name,
                    unit: line.unit.as_deref(),
                })
                .on_conflict(ingredients::name)
                .do_update()
                .set(ingredients::unit.eq(excluded(ingredients::unit)))
                .returning(ingredients::id)
                .get_result(conn)?;

            diesel::insert_into(recipe_ingredients::table)
                .values(NewRecipeIngredient {
                    recipe_id,
                    ingredient_id,
                    amount: line.amount,
                    unit: line.unit.as_deref(),
                })
                .execute(conn)?;
        }

        // Steps are numbered 1..N in submission order.
        for (index, step) in data.steps.iter().enumerate() {
            diesel::insert_into(recipe_steps::table)
                .values(NewRecipeStep {
                    recipe_id,
                    step_number: index as i32 + 1,
                    instruction: &step.instruction,
                })
                .execute(conn)?;
        }

        Ok(recipe_id)
    })
}

/// Fetch a recipe with its ingredient lines (ordered by ingredient name) and
/// steps (ordered by step number). Returns `None` for an unknown id.
pub fn get_recipe(conn: &mut PgConnection, id: i32) -> Result<Option<RecipeDetail>, StoreError> {
    let recipe: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<(String, f64, Option<String>, Option<String>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(id))
        .order(ingredients::name.asc())
        .select((
            ingredients::name,
            recipe_ingredients::amount,
            recipe_ingredients::unit,
            ingredients::unit,
        ))
        .load(conn)?;

    let ingredients = lines
        .into_iter()
        .map(|(name, amount, link_unit, default_unit)| IngredientDetail {
            name,
            amount,
            unit: resolve_unit(link_unit, default_unit),
        })
        .collect();

    let steps = recipe_steps::table
        .filter(recipe_steps::recipe_id.eq(id))
        .order(recipe_steps::step_number.asc())
        .select((recipe_steps::step_number, recipe_steps::instruction))
        .load(conn)?;

    Ok(Some(RecipeDetail {
        recipe,
        ingredients,
        steps,
    }))
}

/// All recipe summary rows, newest first.
pub fn list_recipes(conn: &mut PgConnection) -> Result<Vec<Recipe>, StoreError> {
    Ok(recipes::table
        .order(recipes::created_at.desc())
        .select(Recipe::as_select())
        .load(conn)?)
}

/// The recipe-specific unit wins over the ingredient's catalog default,
/// mirroring `COALESCE(ri.unit, i.unit)`.
fn resolve_unit(link_unit: Option<String>, default_unit: Option<String>) -> Option<String> {
    link_unit.or(default_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_unit_wins_over_catalog_default() {
        assert_eq!(
            resolve_unit(Some("tbsp".into()), Some("g".into())),
            Some("tbsp".into())
        );
    }

    #[test]
    fn catalog_default_fills_missing_link_unit() {
        assert_eq!(resolve_unit(None, Some("g".into())), Some("g".into()));
    }

    #[test]
    fn no_unit_at_all_stays_absent() {
        assert_eq!(resolve_unit(None, None), None);
    }
}
