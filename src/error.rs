use thiserror::Error;

use crate::models::Course;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Failed to load catalog {path}: {reason}")]
    CatalogLoad { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Course not configured: {0}")]
    CourseNotConfigured(Course),
}

impl MenuError {
    pub fn catalog_load(path: impl Into<String>, reason: impl ToString) -> Self {
        MenuError::CatalogLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;

/// Recoverable data problems. The build continues and these are reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuWarning {
    #[error("Recipe '{recipe}': no nutrition data for ingredient '{ingredient}'{}", suggestion_suffix(.suggestion))]
    UnresolvedIngredient {
        recipe: String,
        ingredient: String,
        suggestion: Option<String>,
    },

    #[error("Skipped '{candidate}': nutrition data missing or incomplete")]
    MissingNutrition { candidate: String },

    #[error("{course}: no eligible ingredient available")]
    EmptyPool { course: Course },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}
