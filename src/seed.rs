//! Sample recipes for a fresh database.

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::db::{clear_database, create_recipe};
use crate::ingredient_model::{NewRecipe, RecipeIngredients};

/// (title, ingredients, instructions, category)
pub const SAMPLE_RECIPES: &[(&str, &str, &str, &str)] = &[
    ("Scrambled Eggs", "2 eggs, 1 tbsp milk", "Whisk eggs with milk, cook in pan", "breakfast"),
    ("Tomato Soup", "1 can tomatoes, 1 cup broth", "Simmer tomatoes and broth, blend", "soup"),
    (
        "Grilled Cheese",
        "2 slices bread, 1 slice cheese, 1 tbsp butter",
        "Butter bread, add cheese, grill",
        "lunch",
    ),
    ("Pasta", "200g spaghetti, 1 cup marinara", "Boil pasta, mix with sauce", "dinner"),
    ("Fruit Salad", "1 apple, 1 banana, 1 orange", "Chop fruits, mix together", "dessert"),
    ("Oatmeal", "1 cup oats, 2 cups water", "Boil water, add oats, cook", "breakfast"),
    (
        "Tuna Salad",
        "1 can tuna, 2 tbsp mayo, 1 celery stalk",
        "Mix tuna, mayo, and chopped celery",
        "lunch",
    ),
    (
        "Roasted Veggies",
        "1 carrot, 1 zucchini, 1 tbsp oil, 1 tsp salt",
        "Chop veggies, toss with oil and salt, roast",
        "side dish",
    ),
    (
        "Peanut Butter Toast",
        "1 slice bread, 1 tbsp peanut butter",
        "Toast bread, spread peanut butter",
        "snack",
    ),
    ("Chocolate Milk", "1 cup milk, 1 tbsp cocoa", "Mix milk and cocoa, stir well", "dessert"),
];

/// The sample recipes as store input
pub fn sample_recipes() -> Vec<NewRecipe> {
    SAMPLE_RECIPES
        .iter()
        .map(|(title, ingredients, instructions, category)| NewRecipe {
            title: title.to_string(),
            category: Some(category.to_string()),
            instructions: Some(instructions.to_string()),
            thumbnail_url: None,
            ingredients: RecipeIngredients::Text(ingredients.to_string()),
        })
        .collect()
}

/// Replace all data with the sample recipes, returning how many were created
pub async fn seed_database(pool: &SqlitePool) -> Result<usize> {
    clear_database(pool).await?;

    let recipes = sample_recipes();
    for recipe in &recipes {
        create_recipe(pool, recipe).await?;
    }

    info!(count = recipes.len(), "Database seeded with sample recipes");
    Ok(recipes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_recipes_parse() {
        let recipes = sample_recipes();
        assert_eq!(recipes.len(), 10);

        for recipe in &recipes {
            assert!(!recipe.ingredients.parsed().is_empty(), "{}", recipe.title);
        }

        let pasta = recipes.iter().find(|r| r.title == "Pasta").unwrap();
        let parsed = pasta.ingredients.parsed();
        assert_eq!(parsed[0].quantity, "200");
        assert_eq!(parsed[0].unit, "g");
        assert_eq!(parsed[0].name, "spaghetti");
    }
}
