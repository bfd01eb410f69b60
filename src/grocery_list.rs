//! # Grocery List Aggregation
//!
//! Combines the ingredients of planned meals into one shopping list. Lines are keyed by
//! trimmed name and unit, exactly as written: "cup" and "cups" stay separate, as do
//! "Flour" and "flour". Each ingredient's quantity is multiplied by the meal's
//! multiplier before it is added to the running total.
//!
//! Malformed quantities count as zero and never abort the computation.

use log::{debug, trace};
use std::collections::HashMap;

use crate::ingredient_model::{AggregateIngredient, ParsedIngredient, PlannedMeal};
use crate::quantity::{finite_or_zero, format_quantity, to_number};

/// Running total for one (name, unit) key
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientTotal {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
}

/// Accumulator for grocery totals, ordered by first occurrence of each key
///
/// Partial accumulators can be combined with [`GroceryTotals::merge`], which gives
/// the same totals as feeding every meal into a single accumulator.
#[derive(Debug, Clone, Default)]
pub struct GroceryTotals {
    totals: Vec<IngredientTotal>,
    index: HashMap<(String, String), usize>,
}

impl GroceryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_amount(&mut self, name: &str, unit: &str, amount: f64) {
        let key = (name.to_string(), unit.to_string());
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.totals.push(IngredientTotal {
                    name: key.0.clone(),
                    unit: key.1.clone(),
                    quantity: 0.0,
                });
                self.index.insert(key, self.totals.len() - 1);
                self.totals.len() - 1
            }
        };
        self.totals[slot].quantity += finite_or_zero(amount);
    }

    /// Add one ingredient, scaled by the meal multiplier
    pub fn add_ingredient(&mut self, ingredient: &ParsedIngredient, multiplier: u32) {
        let name = ingredient.name.trim();
        if name.is_empty() {
            trace!("Skipping ingredient without a name: {:?}", ingredient);
            return;
        }

        let amount = finite_or_zero(to_number(&ingredient.quantity)) * f64::from(multiplier);
        self.add_amount(name, ingredient.unit.trim(), amount);
    }

    /// Add every ingredient of a planned meal
    pub fn add_meal(&mut self, meal: &PlannedMeal) {
        for ingredient in &meal.ingredients {
            self.add_ingredient(ingredient, meal.quantity);
        }
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: GroceryTotals) {
        for total in other.totals {
            self.add_amount(&total.name, &total.unit, total.quantity);
        }
    }

    /// Totals in first-occurrence order
    pub fn totals(&self) -> &[IngredientTotal] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Render the totals as grocery list lines
    pub fn into_aggregate(self) -> Vec<AggregateIngredient> {
        self.totals
            .into_iter()
            .map(|total| AggregateIngredient {
                name: total.name,
                unit: total.unit,
                quantity: format_quantity(total.quantity),
            })
            .collect()
    }
}

/// Combine the ingredients of all planned meals into grocery list lines
pub fn aggregate(meals: &[PlannedMeal]) -> Vec<AggregateIngredient> {
    let mut totals = GroceryTotals::new();
    for meal in meals {
        totals.add_meal(meal);
    }
    debug!(
        "Aggregated {} meals into {} grocery lines",
        meals.len(),
        totals.len()
    );
    totals.into_aggregate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(quantity: u32, ingredients: &[(&str, &str, &str)]) -> PlannedMeal {
        PlannedMeal {
            quantity,
            ingredients: ingredients
                .iter()
                .map(|(q, u, n)| ParsedIngredient::new(q, u, n))
                .collect(),
        }
    }

    #[test]
    fn test_weighted_sum_across_meals() {
        let meals = vec![
            meal(2, &[("1", "cup", "flour")]),
            meal(1, &[("1/2", "cup", "flour")]),
        ];
        let list = aggregate(&meals);
        assert_eq!(
            list,
            vec![AggregateIngredient {
                name: "flour".to_string(),
                unit: "cup".to_string(),
                quantity: "2 1/2".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_name_is_skipped() {
        let meals = vec![meal(1, &[("1", "", ""), ("2", "", "eggs"), ("1", "cup", "  ")])];
        let list = aggregate(&meals);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "eggs");
        assert_eq!(list[0].quantity, "2");
    }

    #[test]
    fn test_units_are_not_normalized() {
        let meals = vec![meal(
            1,
            &[("1", "cup", "milk"), ("1", "cups", "milk"), ("1", "Cup", "milk")],
        )];
        assert_eq!(aggregate(&meals).len(), 3);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let meals = vec![meal(1, &[("1", " tbsp", "oil "), ("2", "tbsp ", " oil")])];
        let list = aggregate(&meals);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].quantity, "3");
        assert_eq!(list[0].to_string(), "3 tbsp oil");
    }

    #[test]
    fn test_insertion_order() {
        let meals = vec![
            meal(1, &[("1", "", "banana"), ("1", "", "apple")]),
            meal(1, &[("1", "", "orange"), ("1", "", "banana")]),
        ];
        let names: Vec<_> = aggregate(&meals).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["banana", "apple", "orange"]);
    }

    #[test]
    fn test_bad_quantities_do_not_corrupt_totals() {
        let meals = vec![meal(
            1,
            &[("1/0", "cup", "sugar"), ("some", "cup", "sugar"), ("1/2", "cup", "sugar")],
        )];
        let list = aggregate(&meals);
        assert_eq!(list[0].quantity, "1/2");
    }

    #[test]
    fn test_missing_quantity_still_listed() {
        let meals = vec![meal(3, &[("", "", "salt")])];
        let list = aggregate(&meals);
        assert_eq!(list[0].quantity, "0");
        assert_eq!(list[0].to_string(), "0 salt");
    }

    #[test]
    fn test_zero_multiplier_registers_key() {
        let meals = vec![meal(0, &[("2", "", "eggs")])];
        let list = aggregate(&meals);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].quantity, "0");
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let a = meal(2, &[("1", "cup", "flour"), ("2", "", "eggs")]);
        let b = meal(1, &[("1/2", "cup", "flour")]);
        let c = meal(3, &[("1 1/2", "tsp", "salt"), ("1", "", "eggs")]);

        let mut first = GroceryTotals::new();
        first.add_meal(&a);
        first.add_meal(&b);
        let mut second = GroceryTotals::new();
        second.add_meal(&c);
        first.merge(second);

        let direct = aggregate(&[a, b, c]);
        assert_eq!(first.into_aggregate(), direct);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
        assert!(GroceryTotals::new().is_empty());
    }
}
