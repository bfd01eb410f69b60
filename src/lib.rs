//! # Cookbook
//!
//! Recipe storage and meal planning with grocery list generation. Free-text
//! ingredient lines are parsed into quantity, unit and name, and the ingredients of
//! every meal planned in a week are summed into one shopping list.

pub mod config;
pub mod db;
pub mod errors;
pub mod grocery_list;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod meal_planner;
pub mod measurement_units;
pub mod quantity;
pub mod seed;
