//! # Configuration Module
//!
//! Runtime settings for the cookbook binary, read from the environment after loading
//! an optional `.env` file.

use std::env;
use std::fmt;

// Defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://recipes.db";
pub const DEFAULT_CATEGORY: &str = "appetizer";
pub const DEFAULT_GROCERY_DAYS: u32 = 7;

// Environment variable names
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DEFAULT_CATEGORY_VAR: &str = "COOKBOOK_DEFAULT_CATEGORY";
pub const GROCERY_DAYS_VAR: &str = "COOKBOOK_GROCERY_DAYS";
pub const LOG_FORMAT_VAR: &str = "COOKBOOK_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "plain" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// A variable that was set to a value that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub variable: &'static str,
    pub value: String,
    /// What is used instead
    pub fallback: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}={:?}, using {}",
            self.variable, self.value, self.fallback
        )
    }
}

/// Configuration structure for the cookbook
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite connection string (e.g., "sqlite://recipes.db", "sqlite::memory:")
    pub database_url: String,
    /// Category stored for recipes saved without one
    pub default_category: String,
    /// Number of days covered by a grocery list
    pub grocery_days: u32,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            grocery_days: DEFAULT_GROCERY_DAYS,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the environment
    ///
    /// Values that could not be used are returned as warnings, so they can be logged
    /// once logging is set up.
    pub fn from_env() -> (Self, Vec<ConfigWarning>) {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from any variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigWarning>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let grocery_days = match non_empty(GROCERY_DAYS_VAR) {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                _ => {
                    warnings.push(ConfigWarning {
                        variable: GROCERY_DAYS_VAR,
                        value,
                        fallback: defaults.grocery_days.to_string(),
                    });
                    defaults.grocery_days
                }
            },
            None => defaults.grocery_days,
        };

        let log_format = match non_empty(LOG_FORMAT_VAR) {
            Some(value) => match LogFormat::parse(&value) {
                Some(format) => format,
                None => {
                    warnings.push(ConfigWarning {
                        variable: LOG_FORMAT_VAR,
                        value,
                        fallback: "text".to_string(),
                    });
                    LogFormat::Text
                }
            },
            None => defaults.log_format,
        };

        let config = Self {
            database_url: non_empty(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
            default_category: non_empty(DEFAULT_CATEGORY_VAR)
                .map(|value| value.trim().to_string())
                .unwrap_or(defaults.default_category),
            grocery_days,
            log_format,
        };
        (config, warnings)
    }
}
