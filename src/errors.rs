//! # Error Types Module
//!
//! Failures of the recipe store that callers need to tell apart. They travel inside
//! `anyhow::Error` and can be recovered with `downcast_ref::<CookbookError>()`.
//! Parsing and aggregation have no error channel.

/// Maximum length of a recipe title, in bytes
pub const MAX_TITLE_LENGTH: usize = 255;

/// Custom error types for store operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookbookError {
    /// No recipe with this id
    RecipeNotFound(i64),
    /// Rejected input
    Validation(String),
}

impl std::fmt::Display for CookbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CookbookError::RecipeNotFound(id) => write!(f, "Recipe not found: {id}"),
            CookbookError::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for CookbookError {}

/// Validates a recipe title, returning it trimmed
pub fn validate_recipe_title(title: &str) -> Result<String, CookbookError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(CookbookError::Validation(
            "recipe title must not be empty".to_string(),
        ));
    }

    if trimmed.len() > MAX_TITLE_LENGTH {
        return Err(CookbookError::Validation(format!(
            "recipe title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_reports_validation_error() {
        for title in ["", "   ", "\t\n"] {
            assert_eq!(
                validate_recipe_title(title),
                Err(CookbookError::Validation(
                    "recipe title must not be empty".to_string()
                ))
            );
        }
    }

    #[test]
    fn test_title_length_limit_counts_trimmed_bytes() {
        let at_limit = "b".repeat(MAX_TITLE_LENGTH);
        assert_eq!(
            validate_recipe_title(&format!("  {at_limit}  ")),
            Ok(at_limit.clone())
        );

        let err = validate_recipe_title(&format!("{at_limit}b")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: recipe title must be at most 255 characters"
        );

        // Multi-byte characters count by their encoded length
        assert!(validate_recipe_title(&"é".repeat(128)).is_err());
        assert!(validate_recipe_title(&"é".repeat(127)).is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CookbookError::RecipeNotFound(7).to_string(),
            "Recipe not found: 7"
        );
        assert_eq!(
            CookbookError::Validation("bad".to_string()).to_string(),
            "Validation error: bad"
        );
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = CookbookError::RecipeNotFound(3).into();
        assert_eq!(
            err.downcast_ref::<CookbookError>(),
            Some(&CookbookError::RecipeNotFound(3))
        );
    }
}
