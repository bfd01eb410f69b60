//! # Meal Planner
//!
//! Builds the grocery list for a window of days: planned meals are read from the store
//! with their recipe ingredients, then combined by the grocery aggregator.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cookbook::{db, meal_planner};
//! use chrono::NaiveDate;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let pool = db::connect("sqlite://recipes.db").await?;
//! let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
//! let list = meal_planner::grocery_list(&pool, start, 7).await?;
//! println!("{}", meal_planner::format_grocery_list(&list));
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use chrono::{Days, NaiveDate};
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::db::planned_meals;
use crate::grocery_list::aggregate;
use crate::ingredient_model::AggregateIngredient;

/// Inclusive date range covering `days` days from `start`
///
/// A window of 0 days is treated as a single day.
pub fn week_range(start: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let span = u64::from(days.max(1) - 1);
    let end = start.checked_add_days(Days::new(span)).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Grocery list for the meals planned in `days` days from `start`
pub async fn grocery_list(
    pool: &SqlitePool,
    start: NaiveDate,
    days: u32,
) -> Result<Vec<AggregateIngredient>> {
    let (start, end) = week_range(start, days);
    let meals = planned_meals(pool, start, end).await?;
    let list = aggregate(&meals);

    info!(
        start = %start,
        end = %end,
        meals = meals.len(),
        items = list.len(),
        "Grocery list computed"
    );
    Ok(list)
}

/// One grocery line per item
pub fn format_grocery_list(items: &[AggregateIngredient]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
