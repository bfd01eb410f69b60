//! # Recipe Store
//!
//! SQLite persistence for recipes, their ingredients and the meal plan.
//!
//! Ingredients are stored one row per ingredient with the raw quantity text, so grocery
//! totals can be recomputed without losing fractions. A meal plan row is unique per
//! (recipe, date); planning the same recipe again on the same day increments its
//! quantity instead of adding a row.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, Transaction};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DEFAULT_CATEGORY;
use crate::errors::{validate_recipe_title, CookbookError};
use crate::ingredient_model::{
    Category, MealPlanEntry, NewRecipe, ParsedIngredient, PlannedMeal, Recipe, ScheduledMeal,
};

/// Outcome of removing one serving of a planned meal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealRemoval {
    /// The entry is still planned with the new quantity
    Decremented(i64),
    /// The last serving was removed and the entry deleted
    Deleted,
    /// Nothing was planned for this recipe on this date
    NotFound,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    instructions: String,
    category: String,
    thumbnail_url: Option<String>,
    is_meal_plan_candidate: bool,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    recipe_id: i64,
    quantity: String,
    unit: String,
    name: String,
}

#[derive(Debug, FromRow)]
struct MealRow {
    id: i64,
    recipe_id: i64,
    date: NaiveDate,
    quantity: i64,
}

#[derive(Debug, FromRow)]
struct ScheduledMealRow {
    id: i64,
    recipe_id: i64,
    recipe_title: String,
    category: String,
    date: NaiveDate,
    quantity: i64,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<ParsedIngredient>) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            category: Category::parse(&self.category),
            instructions: self.instructions,
            thumbnail_url: self.thumbnail_url,
            meal_plan_candidate: self.is_meal_plan_candidate,
            ingredients,
        }
    }
}

impl From<IngredientRow> for ParsedIngredient {
    fn from(row: IngredientRow) -> Self {
        ParsedIngredient {
            quantity: row.quantity,
            unit: row.unit,
            name: row.name,
        }
    }
}

impl From<MealRow> for MealPlanEntry {
    fn from(row: MealRow) -> Self {
        MealPlanEntry {
            id: row.id,
            recipe_id: row.recipe_id,
            date: row.date,
            quantity: row.quantity,
        }
    }
}

impl From<ScheduledMealRow> for ScheduledMeal {
    fn from(row: ScheduledMealRow) -> Self {
        ScheduledMeal {
            id: row.id,
            recipe_id: row.recipe_id,
            recipe_title: row.recipe_title,
            category: Category::parse(&row.category),
            date: row.date,
            quantity: row.quantity,
        }
    }
}

/// Open a connection pool, creating the database file if needed
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    info!(database_url = %database_url, "Connecting to database");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives only as long as its single connection
    let in_memory = database_url.contains(":memory:");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options
        .connect_with(options)
        .await
        .context("Failed to connect to database")
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            instructions TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'appetizer',
            thumbnail_url TEXT,
            is_meal_plan_candidate INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            position INTEGER NOT NULL,
            quantity TEXT NOT NULL DEFAULT '',
            unit TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id, position)",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients index")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            date TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
            UNIQUE (recipe_id, date)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create meals table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

async fn insert_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    ingredients: &[ParsedIngredient],
) -> Result<()> {
    for (position, ingredient) in ingredients.iter().enumerate() {
        sqlx::query(
            "INSERT INTO ingredients (recipe_id, position, quantity, unit, name)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(recipe_id)
        .bind(position as i64)
        .bind(&ingredient.quantity)
        .bind(&ingredient.unit)
        .bind(&ingredient.name)
        .execute(&mut **tx)
        .await
        .context("Failed to insert ingredient")?;
    }
    Ok(())
}

/// Title, category and instructions ready to be written
fn prepare_recipe(recipe: &NewRecipe) -> Result<(String, String, String)> {
    let title = validate_recipe_title(&recipe.title)?;
    let category = recipe
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);
    let category = Category::parse(category).to_string();
    let instructions = recipe.instructions.clone().unwrap_or_default();
    Ok((title, category, instructions))
}

/// Create a recipe and its ingredients, returning the new recipe id
///
/// Ingredients given as text are split and parsed; lines without a name are dropped.
/// A recipe without a category is stored under [`DEFAULT_CATEGORY`]; use
/// [`NewRecipe::with_default_category`] to apply a configured default instead.
pub async fn create_recipe(pool: &SqlitePool, recipe: &NewRecipe) -> Result<i64> {
    let (title, category, instructions) = prepare_recipe(recipe)?;
    let ingredients = recipe.ingredients.parsed();
    info!(title = %title, ingredients = ingredients.len(), "Creating recipe");

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let recipe_id = sqlx::query(
        "INSERT INTO recipes (title, instructions, category, thumbnail_url) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&title)
    .bind(&instructions)
    .bind(&category)
    .bind(&recipe.thumbnail_url)
    .execute(&mut *tx)
    .await
    .context("Failed to insert new recipe")?
    .last_insert_rowid();

    insert_ingredients(&mut tx, recipe_id, &ingredients).await?;
    tx.commit().await.context("Failed to commit new recipe")?;

    info!(recipe_id, "Recipe created");
    Ok(recipe_id)
}

/// Read a recipe with its ingredients
pub async fn read_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<Option<Recipe>> {
    debug!(recipe_id, "Reading recipe");

    let row = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, title, instructions, category, thumbnail_url, is_meal_plan_candidate
         FROM recipes WHERE id = ?1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read recipe")?;

    let Some(row) = row else {
        debug!(recipe_id, "No recipe found");
        return Ok(None);
    };

    let ingredients = sqlx::query_as::<_, IngredientRow>(
        "SELECT recipe_id, quantity, unit, name FROM ingredients
         WHERE recipe_id = ?1 ORDER BY position",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to read recipe ingredients")?
    .into_iter()
    .map(ParsedIngredient::from)
    .collect();

    Ok(Some(row.into_recipe(ingredients)))
}

/// Group ingredient rows by recipe, keeping row order
fn group_ingredients(rows: Vec<IngredientRow>) -> HashMap<i64, Vec<ParsedIngredient>> {
    let mut grouped: HashMap<i64, Vec<ParsedIngredient>> = HashMap::new();
    for row in rows {
        grouped.entry(row.recipe_id).or_default().push(row.into());
    }
    grouped
}

/// List all recipes, ordered by category then title
pub async fn list_recipes(pool: &SqlitePool) -> Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, title, instructions, category, thumbnail_url, is_meal_plan_candidate
         FROM recipes ORDER BY title, id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list recipes")?;

    let ingredient_rows = sqlx::query_as::<_, IngredientRow>(
        "SELECT recipe_id, quantity, unit, name FROM ingredients ORDER BY recipe_id, position",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list ingredients")?;
    let mut ingredients = group_ingredients(ingredient_rows);

    let mut recipes: Vec<Recipe> = rows
        .into_iter()
        .map(|row| {
            let recipe_ingredients = ingredients.remove(&row.id).unwrap_or_default();
            row.into_recipe(recipe_ingredients)
        })
        .collect();
    recipes.sort_by(|a, b| a.category.order_cmp(&b.category));

    debug!(count = recipes.len(), "Listed recipes");
    Ok(recipes)
}

/// Replace a recipe's fields and ingredients
pub async fn update_recipe(pool: &SqlitePool, recipe_id: i64, recipe: &NewRecipe) -> Result<bool> {
    let (title, category, instructions) = prepare_recipe(recipe)?;
    let ingredients = recipe.ingredients.parsed();
    info!(recipe_id, "Updating recipe");

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let rows_affected = sqlx::query(
        "UPDATE recipes SET title = ?1, instructions = ?2, category = ?3, thumbnail_url = ?4
         WHERE id = ?5",
    )
    .bind(&title)
    .bind(&instructions)
    .bind(&category)
    .bind(&recipe.thumbnail_url)
    .bind(recipe_id)
    .execute(&mut *tx)
    .await
    .context("Failed to update recipe")?
    .rows_affected();

    if rows_affected == 0 {
        info!(recipe_id, "No recipe found");
        return Ok(false);
    }

    sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete old ingredients")?;

    insert_ingredients(&mut tx, recipe_id, &ingredients).await?;
    tx.commit().await.context("Failed to commit recipe update")?;

    info!(recipe_id, "Recipe updated successfully");
    Ok(true)
}

/// Delete a recipe together with its ingredients and planned meals
pub async fn delete_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<bool> {
    info!(recipe_id, "Deleting recipe");

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete ingredients")?;

    sqlx::query("DELETE FROM meals WHERE recipe_id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete meals")?;

    let rows_affected = sqlx::query("DELETE FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete recipe")?
        .rows_affected();

    tx.commit().await.context("Failed to commit recipe deletion")?;

    if rows_affected > 0 {
        info!(recipe_id, "Recipe deleted successfully");
        Ok(true)
    } else {
        info!(recipe_id, "No recipe found");
        Ok(false)
    }
}

/// Flag or unflag a recipe as a meal plan candidate
pub async fn set_meal_plan_candidate(
    pool: &SqlitePool,
    recipe_id: i64,
    candidate: bool,
) -> Result<bool> {
    let rows_affected =
        sqlx::query("UPDATE recipes SET is_meal_plan_candidate = ?1 WHERE id = ?2")
            .bind(candidate)
            .bind(recipe_id)
            .execute(pool)
            .await
            .context("Failed to update meal plan candidate flag")?
            .rows_affected();

    Ok(rows_affected > 0)
}

async fn recipe_exists(pool: &SqlitePool, recipe_id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .context("Failed to look up recipe")?;
    Ok(found.is_some())
}

/// Plan a recipe on a date, or add one more serving if it is already planned
///
/// The insert and the increment are a single upsert statement, so concurrent calls
/// for the same recipe and date never create two rows.
pub async fn add_meal(pool: &SqlitePool, recipe_id: i64, date: NaiveDate) -> Result<MealPlanEntry> {
    if !recipe_exists(pool, recipe_id).await? {
        return Err(CookbookError::RecipeNotFound(recipe_id).into());
    }

    let row = sqlx::query_as::<_, MealRow>(
        "INSERT INTO meals (recipe_id, date, quantity) VALUES (?1, ?2, 1)
         ON CONFLICT (recipe_id, date) DO UPDATE SET quantity = quantity + 1
         RETURNING id, recipe_id, date, quantity",
    )
    .bind(recipe_id)
    .bind(date)
    .fetch_one(pool)
    .await
    .context("Failed to add meal")?;

    info!(recipe_id, date = %date, quantity = row.quantity, "Meal planned");
    Ok(row.into())
}

/// Remove one serving of a planned meal, deleting the entry at zero
pub async fn remove_meal(pool: &SqlitePool, recipe_id: i64, date: NaiveDate) -> Result<MealRemoval> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let deleted = sqlx::query("DELETE FROM meals WHERE recipe_id = ?1 AND date = ?2 AND quantity <= 1")
        .bind(recipe_id)
        .bind(date)
        .execute(&mut *tx)
        .await
        .context("Failed to delete meal")?
        .rows_affected();

    let removal = if deleted > 0 {
        MealRemoval::Deleted
    } else {
        let remaining: Option<i64> = sqlx::query_scalar(
            "UPDATE meals SET quantity = quantity - 1 WHERE recipe_id = ?1 AND date = ?2
             RETURNING quantity",
        )
        .bind(recipe_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to decrement meal")?;

        match remaining {
            Some(quantity) => MealRemoval::Decremented(quantity),
            None => MealRemoval::NotFound,
        }
    };

    tx.commit().await.context("Failed to commit meal removal")?;

    info!(recipe_id, date = %date, outcome = ?removal, "Meal removed");
    Ok(removal)
}

/// List planned meals with their recipe titles, optionally within an inclusive date range
///
/// Meals are ordered by date, then by category order, then by title.
pub async fn list_meals(
    pool: &SqlitePool,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<ScheduledMeal>> {
    let base = "SELECT m.id, m.recipe_id, r.title AS recipe_title, r.category, m.date, m.quantity
                FROM meals m JOIN recipes r ON m.recipe_id = r.id";

    let rows = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, ScheduledMealRow>(&format!(
                "{base} WHERE m.date BETWEEN ?1 AND ?2 ORDER BY m.date, r.title, m.id"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ScheduledMealRow>(&format!(
                "{base} ORDER BY m.date, r.title, m.id"
            ))
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list meals")?;

    let mut meals: Vec<ScheduledMeal> = rows.into_iter().map(ScheduledMeal::from).collect();
    meals.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.category.order_cmp(&b.category)));

    debug!(count = meals.len(), "Listed meals");
    Ok(meals)
}

/// Planned meals in an inclusive date range, joined with their recipe ingredients
pub async fn planned_meals(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PlannedMeal>> {
    let meals = list_meals(pool, Some((start, end))).await?;

    let ingredient_rows = sqlx::query_as::<_, IngredientRow>(
        "SELECT recipe_id, quantity, unit, name FROM ingredients
         WHERE recipe_id IN (SELECT recipe_id FROM meals WHERE date BETWEEN ?1 AND ?2)
         ORDER BY recipe_id, position",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .context("Failed to read planned ingredients")?;
    let ingredients = group_ingredients(ingredient_rows);

    let planned = meals
        .into_iter()
        .map(|meal| PlannedMeal {
            quantity: u32::try_from(meal.quantity).unwrap_or(0),
            ingredients: ingredients.get(&meal.recipe_id).cloned().unwrap_or_default(),
        })
        .collect();

    Ok(planned)
}

/// Remove every recipe, ingredient and planned meal
pub async fn clear_database(pool: &SqlitePool) -> Result<()> {
    info!("Clearing all recipes and meals");

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    for table in ["meals", "ingredients", "recipes"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to clear {table}"))?;
    }
    tx.commit().await.context("Failed to commit clear")?;
    Ok(())
}
