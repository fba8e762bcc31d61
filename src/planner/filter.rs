use crate::models::{DietClass, IngredientRecord};
use crate::planner::config::{CategoryFilter, DietType};
use crate::state::{Catalog, UsedIngredientSet};

/// Whether an ingredient is allowed under a diet.
///
/// Records without a diet class are only eligible under `DietType::Any`.
pub fn diet_allows(diet: DietType, diet_class: Option<DietClass>) -> bool {
    match diet {
        DietType::Any => true,
        DietType::Vegan => diet_class == Some(DietClass::Vegan),
        DietType::OvoLacto => matches!(
            diet_class,
            Some(DietClass::Vegan) | Some(DietClass::OvoLacto)
        ),
    }
}

/// Eligible records in catalog order: diet, then category, then not yet used.
///
/// An empty result means no dish can be produced for the course.
pub fn available<'a>(
    catalog: &'a Catalog,
    diet: DietType,
    category: &CategoryFilter,
    used: &UsedIngredientSet,
) -> Vec<&'a IngredientRecord> {
    catalog
        .iter()
        .filter(|r| diet_allows(diet, r.diet_class))
        .filter(|r| category.admits(r.category.as_deref()))
        .filter(|r| !used.contains(r))
        .collect()
}
