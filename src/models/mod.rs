pub mod ingredient;
pub mod menu;
pub mod nutrition;
pub mod population;
pub mod recipe;

pub use ingredient::{normalize_key, DietClass, IngredientRecord};
pub use menu::{Course, Dish, Menu, MenuSnapshot};
pub use nutrition::{Nutrient, NutrientTotals};
pub use population::PopulationBreakdown;
pub use recipe::RecipeRecord;
