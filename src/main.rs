use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sqlx::sqlite::SqlitePool;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cookbook::config::{AppConfig, LogFormat};
use cookbook::db::{self, MealRemoval};
use cookbook::errors::CookbookError;
use cookbook::ingredient_model::{NewRecipe, RecipeIngredients};
use cookbook::ingredient_parser::parse_ingredient_line;
use cookbook::meal_planner::{format_grocery_list, grocery_list, week_range};
use cookbook::seed::seed_database;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace all data with the sample recipes
    Seed,
    /// Add a recipe
    AddRecipe(RecipeArgs),
    /// Replace a recipe's fields and ingredients
    UpdateRecipe {
        id: i64,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Delete a recipe and its planned meals
    DeleteRecipe { id: i64 },
    /// List recipes with their ingredients
    Recipes,
    /// Flag a recipe as a meal plan candidate
    Candidate {
        id: i64,
        /// Remove the flag instead
        #[arg(long)]
        off: bool,
    },
    /// Plan a recipe on a date (YYYY-MM-DD), adding a serving if already planned
    Plan { recipe_id: i64, date: NaiveDate },
    /// Remove one serving of a planned recipe
    Unplan { recipe_id: i64, date: NaiveDate },
    /// List planned meals
    Meals {
        /// First day; without --end the grocery window length is used
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day, inclusive
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Print the grocery list for the meals planned in a window of days
    Groceries {
        /// First day, defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Window length, defaults to COOKBOOK_GROCERY_DAYS
        #[arg(long)]
        days: Option<u32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show how ingredient lines are parsed
    Parse {
        /// Comma-separated ingredient lines
        ingredients: String,
    },
}

#[derive(Args, Debug)]
struct RecipeArgs {
    #[arg(long)]
    title: String,
    /// Comma-separated ingredient lines, e.g. "2 cups flour, 1 tsp salt"
    #[arg(long, default_value = "")]
    ingredients: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    instructions: Option<String>,
    #[arg(long)]
    thumbnail_url: Option<String>,
}

impl RecipeArgs {
    fn into_new_recipe(self, default_category: &str) -> NewRecipe {
        NewRecipe {
            title: self.title,
            category: self.category,
            instructions: self.instructions,
            thumbnail_url: self.thumbnail_url,
            ingredients: RecipeIngredients::Text(self.ingredients),
        }
        .with_default_category(default_category)
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, warnings) = AppConfig::from_env();
    init_logging(config.log_format);
    for warning in &warnings {
        warn!("{warning}");
    }

    let cli = Cli::parse();

    if let Command::Parse { ingredients } = &cli.command {
        print_parsed(ingredients);
        return Ok(());
    }

    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| config.database_url.clone());

    let pool = db::connect(&database_url).await?;
    db::init_database_schema(&pool).await?;

    info!(command = ?cli.command, "Running command");
    run(cli.command, &pool, &config).await
}

fn print_parsed(ingredients: &str) {
    for segment in ingredients.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed = parse_ingredient_line(segment);
        let status = if parsed.has_name() { "" } else { "  (dropped: no name)" };
        println!(
            "{segment}\n  quantity: '{}'  unit: '{}'  name: '{}'{status}",
            parsed.quantity, parsed.unit, parsed.name
        );
    }
}

async fn run(command: Command, pool: &SqlitePool, config: &AppConfig) -> Result<()> {
    match command {
        Command::Seed => {
            let count = seed_database(pool).await?;
            println!("Database seeded with {count} recipes.");
        }
        Command::AddRecipe(args) => {
            let recipe = args.into_new_recipe(&config.default_category);
            let id = db::create_recipe(pool, &recipe).await?;
            println!("Created recipe {id}");
        }
        Command::UpdateRecipe { id, recipe } => {
            let recipe = recipe.into_new_recipe(&config.default_category);
            if !db::update_recipe(pool, id, &recipe).await? {
                return Err(CookbookError::RecipeNotFound(id).into());
            }
            println!("Recipe updated");
        }
        Command::DeleteRecipe { id } => {
            if !db::delete_recipe(pool, id).await? {
                return Err(CookbookError::RecipeNotFound(id).into());
            }
            println!("Recipe deleted");
        }
        Command::Recipes => {
            for recipe in db::list_recipes(pool).await? {
                let marker = if recipe.meal_plan_candidate { " *" } else { "" };
                println!("{:>4}  {} [{}]{}", recipe.id, recipe.title, recipe.category, marker);
                for ingredient in &recipe.ingredients {
                    println!("        - {ingredient}");
                }
            }
        }
        Command::Candidate { id, off } => {
            if !db::set_meal_plan_candidate(pool, id, !off).await? {
                return Err(CookbookError::RecipeNotFound(id).into());
            }
            println!("Recipe {id} updated");
        }
        Command::Plan { recipe_id, date } => {
            let entry = db::add_meal(pool, recipe_id, date).await?;
            println!(
                "Recipe {} planned on {} (x{})",
                entry.recipe_id, entry.date, entry.quantity
            );
        }
        Command::Unplan { recipe_id, date } => match db::remove_meal(pool, recipe_id, date).await? {
            MealRemoval::Decremented(quantity) => {
                println!("Recipe {recipe_id} on {date} now x{quantity}")
            }
            MealRemoval::Deleted => println!("Recipe {recipe_id} removed from {date}"),
            MealRemoval::NotFound => println!("Recipe {recipe_id} is not planned on {date}"),
        },
        Command::Meals { start, end } => {
            let range = match (start, end) {
                (Some(start), Some(end)) => Some((start, end)),
                (Some(start), None) => Some(week_range(start, config.grocery_days)),
                _ => None,
            };
            for meal in db::list_meals(pool, range).await? {
                println!("{meal}");
            }
        }
        Command::Groceries { start, days, json } => {
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            let days = days.unwrap_or(config.grocery_days);
            let items = grocery_list(pool, start, days).await?;

            if json {
                let rendered =
                    serde_json::to_string_pretty(&items).context("Failed to render grocery list")?;
                println!("{rendered}");
            } else {
                let (start, end) = week_range(start, days);
                println!("Grocery list {start} to {end}");
                println!("{}", format_grocery_list(&items));
            }
        }
        Command::Parse { ingredients } => print_parsed(&ingredients),
    }

    Ok(())
}
