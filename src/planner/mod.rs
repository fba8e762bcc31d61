pub mod calculations;
pub mod config;
pub mod constants;
pub mod dish;
pub mod filter;
pub mod fit;
pub mod targets;

pub use calculations::{coverage, ensure_recipe_nutrition, fill_missing_nutrition, recipe_nutrition};
pub use config::{
    CandidateOrder, CategoryFilter, CourseConfig, DietType, MenuConfig, PortionRule,
    RegenerationPolicy, SelectionPolicy,
};
pub use constants::*;
pub use dish::{draw_count, draw_distinct, draw_one, scaled_portion, DishGenerator};
pub use filter::{available, diet_allows};
pub use fit::{arrange_candidates, build_menu, FitOutcome, NutritionSource};
pub use targets::{required_nutrition, GroupRequirement, MealBasis, RequirementsTable};
