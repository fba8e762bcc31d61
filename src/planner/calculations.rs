use tracing::{debug, warn};

use crate::error::MenuWarning;
use crate::models::{Nutrient, NutrientTotals, RecipeRecord};
use crate::state::Catalog;

/// Nutrition of a recipe from its ingredient grams.
///
/// Each ingredient contributes `nutrition_per_100g * grams / 100`. Names that
/// do not resolve contribute nothing and yield one warning each.
pub fn recipe_nutrition(recipe: &RecipeRecord, catalog: &Catalog) -> (NutrientTotals, Vec<MenuWarning>) {
    let mut totals = NutrientTotals::zero();
    let mut warnings = Vec::new();

    for (name, grams) in &recipe.ingredients {
        match catalog.resolve(name) {
            Some(record) => totals += record.nutrition_per_100g.for_grams(*grams),
            None => {
                let warning = MenuWarning::UnresolvedIngredient {
                    recipe: recipe.name.clone(),
                    ingredient: name.clone(),
                    suggestion: catalog.suggest(name).map(str::to_string),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    (totals, warnings)
}

/// Compute and store nutrition if the recipe has none yet.
pub fn ensure_recipe_nutrition(recipe: &mut RecipeRecord, catalog: &Catalog) -> Vec<MenuWarning> {
    if !recipe.needs_nutrition() {
        return Vec::new();
    }
    let (totals, warnings) = recipe_nutrition(recipe, catalog);
    debug!(
        recipe = %recipe.name,
        grams = recipe.total_grams(),
        calories = totals.calories,
        "computed recipe nutrition"
    );
    recipe.set_nutrition(totals);
    warnings
}

/// Fill in nutrition for every recipe lacking it. Returns (filled count, warnings).
pub fn fill_missing_nutrition(recipes: &mut [RecipeRecord], catalog: &Catalog) -> (usize, Vec<MenuWarning>) {
    let mut filled = 0;
    let mut warnings = Vec::new();
    for recipe in recipes.iter_mut() {
        if recipe.needs_nutrition() {
            warnings.extend(ensure_recipe_nutrition(recipe, catalog));
            filled += 1;
        }
    }
    (filled, warnings)
}

/// Percentage of `target` reached by `achieved`, per nutrient.
///
/// A zero target counts as fully met.
pub fn coverage(achieved: &NutrientTotals, target: &NutrientTotals) -> Vec<(Nutrient, f64)> {
    Nutrient::ALL
        .into_iter()
        .map(|n| {
            let t = target.get(n);
            let pct = if t > 0.0 { achieved.get(n) / t * 100.0 } else { 100.0 };
            (n, pct)
        })
        .collect()
}
