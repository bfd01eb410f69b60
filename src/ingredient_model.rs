//! # Recipe, Ingredient and Meal Plan Data Model
//!
//! This module defines the values that flow between the ingredient parser, the grocery
//! aggregator and the recipe store.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredient**: one ingredient line split into raw quantity, unit and name
//! - **AggregateIngredient**: a grocery list line, totals summed across planned meals
//! - **Recipe**: a stored recipe with its ingredients in recipe order
//! - **MealPlanEntry**: a recipe scheduled on a calendar date, with a multiplier
//! - **Category**: recipe category, ordered by one shared table
//!
//! ## Usage
//!
//! ```rust
//! use cookbook::ingredient_model::{ParsedIngredient, RecipeIngredients};
//!
//! let flour = ParsedIngredient::new("1 1/2", "cups", "flour");
//! assert_eq!(flour.to_string(), "1 1/2 cups flour");
//!
//! let legacy = RecipeIngredients::Text("2 eggs, 1 tbsp milk".to_string());
//! assert_eq!(legacy.parsed().len(), 2);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::ingredient_parser::parse_ingredient_list;

/// An ingredient line split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Raw quantity text (e.g., "1 1/2", "200", or empty)
    pub quantity: String,

    /// Recognized unit (e.g., "cups", "g", or empty)
    pub unit: String,

    /// Ingredient name, trimmed
    pub name: String,
}

/// One line of a computed grocery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateIngredient {
    pub name: String,
    pub unit: String,
    /// Total rendered for display (e.g., "2 1/2")
    pub quantity: String,
}

/// Recipe categories
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Appetizer,
    Soup,
    SideDish,
    Snack,
    Dessert,
    /// Any category outside the shared table
    Other(String),
}

/// How recipes are stored and listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub category: Category,
    pub instructions: String,
    pub thumbnail_url: Option<String>,
    /// Flagged for suggestion when planning meals
    pub meal_plan_candidate: bool,
    /// Ingredients in recipe order
    pub ingredients: Vec<ParsedIngredient>,
}

/// Ingredients as submitted with a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeIngredients {
    /// Comma-joined ingredient lines (e.g., "2 cups flour, 1 tsp salt")
    Text(String),
    /// Already split rows
    Structured(Vec<ParsedIngredient>),
}

/// Fields for creating or replacing a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub category: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail_url: Option<String>,
    pub ingredients: RecipeIngredients,
}

/// A recipe scheduled on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub id: i64,
    pub recipe_id: i64,
    pub date: NaiveDate,
    /// How many times the recipe is planned for that date, always >= 1
    pub quantity: i64,
}

/// A meal plan entry joined with its recipe, for calendar listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMeal {
    pub id: i64,
    pub recipe_id: i64,
    pub recipe_title: String,
    pub category: Category,
    pub date: NaiveDate,
    pub quantity: i64,
}

/// A planned meal reduced to what the grocery aggregator needs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlannedMeal {
    /// Multiplier applied to every ingredient quantity
    pub quantity: u32,
    pub ingredients: Vec<ParsedIngredient>,
}

impl ParsedIngredient {
    /// Create a parsed ingredient from its parts
    pub fn new(quantity: &str, unit: &str, name: &str) -> Self {
        Self {
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            name: name.to_string(),
        }
    }

    /// An ingredient with no quantity or unit
    pub fn name_only(name: &str) -> Self {
        Self::new("", "", name)
    }

    /// Whether the ingredient carries a usable name
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl Category {
    /// Display order shared by recipe listings and meal plans
    pub const ORDER: [Category; 8] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Appetizer,
        Category::Soup,
        Category::SideDish,
        Category::Snack,
        Category::Dessert,
    ];

    /// Parse a stored category name (case-insensitive)
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "breakfast" => Category::Breakfast,
            "lunch" => Category::Lunch,
            "dinner" => Category::Dinner,
            "appetizer" => Category::Appetizer,
            "soup" => Category::Soup,
            "side dish" | "side" => Category::SideDish,
            "snack" => Category::Snack,
            "dessert" => Category::Dessert,
            _ => Category::Other(trimmed.to_string()),
        }
    }

    /// The stored name of this category
    pub fn as_str(&self) -> &str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Dinner => "dinner",
            Category::Appetizer => "appetizer",
            Category::Soup => "soup",
            Category::SideDish => "side dish",
            Category::Snack => "snack",
            Category::Dessert => "dessert",
            Category::Other(name) => name,
        }
    }

    /// Position in [`Category::ORDER`]; categories outside the table sort last
    pub fn rank(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ORDER.len())
    }

    /// Compare two categories by the shared order, then by name for unlisted ones
    pub fn order_cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::parse(&name)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl RecipeIngredients {
    /// Ingredients in parsed form, entries without a name dropped
    pub fn parsed(&self) -> Vec<ParsedIngredient> {
        match self {
            RecipeIngredients::Text(text) => parse_ingredient_list(text),
            RecipeIngredients::Structured(rows) => rows
                .iter()
                .filter(|row| row.has_name())
                .map(|row| ParsedIngredient {
                    quantity: row.quantity.trim().to_string(),
                    unit: row.unit.trim().to_string(),
                    name: row.name.trim().to_string(),
                })
                .collect(),
        }
    }
}

impl NewRecipe {
    /// Use `category` when none was given
    ///
    /// The store falls back to [`crate::config::DEFAULT_CATEGORY`] for recipes without
    /// a category; apply the configured default here before saving to override it.
    pub fn with_default_category(mut self, category: &str) -> Self {
        let missing = self
            .category
            .as_deref()
            .map_or(true, |current| current.trim().is_empty());
        if missing {
            self.category = Some(category.trim().to_string());
        }
        self
    }
}

impl Recipe {
    /// Ingredients joined back into the comma-separated editing form
    pub fn ingredients_text(&self) -> String {
        self.ingredients
            .iter()
            .map(|ingredient| ingredient.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Join the non-empty parts with single spaces
fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_parts(&[&self.quantity, &self.unit, &self.name]))
    }
}

impl fmt::Display for AggregateIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_parts(&[&self.quantity, &self.unit, &self.name]))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ScheduledMeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity > 1 {
            write!(f, "{} {} x{}", self.date, self.recipe_title, self.quantity)
        } else {
            write!(f, "{} {}", self.date, self.recipe_title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_ingredient_display() {
        let ingredient = ParsedIngredient::new("1 1/2", "cups", "flour");
        assert_eq!(ingredient.to_string(), "1 1/2 cups flour");

        let no_unit = ParsedIngredient::new("2", "", "eggs");
        assert_eq!(no_unit.to_string(), "2 eggs");

        let name_only = ParsedIngredient::name_only("salt to taste");
        assert_eq!(name_only.to_string(), "salt to taste");
    }

    #[test]
    fn test_has_name() {
        assert!(ParsedIngredient::new("1", "", "egg").has_name());
        assert!(!ParsedIngredient::new("1", "cup", "   ").has_name());
        assert!(!ParsedIngredient::default().has_name());
    }

    #[test]
    fn test_category_parse_round_trip() {
        for category in Category::ORDER.iter() {
            assert_eq!(&Category::parse(category.as_str()), category);
        }
        assert_eq!(Category::parse("Side Dish"), Category::SideDish);
        assert_eq!(
            Category::parse(" brunch "),
            Category::Other("brunch".to_string())
        );
    }

    #[test]
    fn test_category_order() {
        assert!(Category::Breakfast.rank() < Category::Dinner.rank());
        assert!(Category::Dinner.rank() < Category::Dessert.rank());
        assert_eq!(
            Category::Other("brunch".to_string()).rank(),
            Category::ORDER.len()
        );
        assert_eq!(
            Category::Dessert.order_cmp(&Category::Other("aaa".to_string())),
            Ordering::Less
        );
    }

    #[test]
    fn test_category_serializes_as_string() {
        let json = serde_json::to_string(&Category::SideDish).unwrap();
        assert_eq!(json, "\"side dish\"");

        let category: Category = serde_json::from_str("\"lunch\"").unwrap();
        assert_eq!(category, Category::Lunch);
    }

    #[test]
    fn test_legacy_text_ingredients() {
        let ingredients = RecipeIngredients::Text("2 eggs, 1 tbsp milk, ,".to_string());
        let parsed = ingredients.parsed();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], ParsedIngredient::new("2", "", "eggs"));
        assert_eq!(parsed[1], ParsedIngredient::new("1", "tbsp", "milk"));
    }

    #[test]
    fn test_structured_ingredients_drop_nameless_rows() {
        let ingredients = RecipeIngredients::Structured(vec![
            ParsedIngredient::new(" 1 ", " cup ", " flour "),
            ParsedIngredient::new("1", "", ""),
        ]);
        let parsed = ingredients.parsed();
        assert_eq!(parsed, vec![ParsedIngredient::new("1", "cup", "flour")]);
    }

    #[test]
    fn test_recipe_ingredients_untagged_json() {
        let text: RecipeIngredients = serde_json::from_str("\"2 eggs\"").unwrap();
        assert_eq!(text, RecipeIngredients::Text("2 eggs".to_string()));

        let rows: RecipeIngredients =
            serde_json::from_str(r#"[{"quantity":"1","unit":"cup","name":"flour"}]"#).unwrap();
        assert_eq!(
            rows,
            RecipeIngredients::Structured(vec![ParsedIngredient::new("1", "cup", "flour")])
        );
    }

    #[test]
    fn test_recipe_ingredients_text() {
        let recipe = Recipe {
            id: 1,
            title: "Oatmeal".to_string(),
            category: Category::Breakfast,
            instructions: String::new(),
            thumbnail_url: None,
            meal_plan_candidate: false,
            ingredients: vec![
                ParsedIngredient::new("1", "cup", "oats"),
                ParsedIngredient::new("2", "cups", "water"),
            ],
        };
        assert_eq!(recipe.ingredients_text(), "1 cup oats, 2 cups water");
    }

    #[test]
    fn test_with_default_category() {
        let recipe = |category: Option<&str>| NewRecipe {
            title: "Stew".to_string(),
            category: category.map(str::to_string),
            instructions: None,
            thumbnail_url: None,
            ingredients: RecipeIngredients::Text(String::new()),
        };

        let filled = recipe(None).with_default_category("dinner");
        assert_eq!(filled.category.as_deref(), Some("dinner"));

        let blank = recipe(Some("  ")).with_default_category(" soup ");
        assert_eq!(blank.category.as_deref(), Some("soup"));

        let kept = recipe(Some("dessert")).with_default_category("dinner");
        assert_eq!(kept.category.as_deref(), Some("dessert"));
    }

    #[test]
    fn test_scheduled_meal_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let meal = ScheduledMeal {
            id: 1,
            recipe_id: 2,
            recipe_title: "Pasta".to_string(),
            category: Category::Dinner,
            date,
            quantity: 2,
        };
        assert_eq!(meal.to_string(), "2024-03-04 Pasta x2");
    }
}
