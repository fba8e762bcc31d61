pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{MenuError, MenuWarning, Result};
pub use models::{Course, Dish, IngredientRecord, Menu, NutrientTotals, RecipeRecord};
