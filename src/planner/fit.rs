use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::MenuWarning;
use crate::models::{Dish, NutrientTotals, RecipeRecord};
use crate::planner::config::CandidateOrder;

/// Something the fit checker can weigh against a ceiling.
pub trait NutritionSource {
    fn label(&self) -> &str;

    /// Complete totals, or `None` when any tracked nutrient is unknown.
    fn nutrition_totals(&self) -> Option<NutrientTotals>;
}

impl NutritionSource for RecipeRecord {
    fn label(&self) -> &str {
        &self.name
    }

    fn nutrition_totals(&self) -> Option<NutrientTotals> {
        RecipeRecord::nutrition_totals(self)
    }
}

impl NutritionSource for Dish {
    fn label(&self) -> &str {
        &self.name
    }

    /// Placeholder dishes carry no nutrition data.
    fn nutrition_totals(&self) -> Option<NutrientTotals> {
        (!self.is_placeholder()).then(|| self.nutrition())
    }
}

/// Result of a greedy fit.
#[derive(Debug)]
pub struct FitOutcome<'a, T> {
    pub selected: Vec<&'a T>,
    pub achieved: NutrientTotals,
    pub warnings: Vec<MenuWarning>,
    /// Every nutrient reached the ceiling. `false` is an infeasible menu.
    pub satisfied: bool,
}

impl<T> FitOutcome<'_, T> {
    pub fn is_infeasible(&self) -> bool {
        !self.satisfied
    }
}

/// Candidates in the requested iteration order.
pub fn arrange_candidates<'a, T, R: Rng + ?Sized>(
    candidates: &'a [T],
    order: CandidateOrder,
    rng: &mut R,
) -> Vec<&'a T> {
    let mut arranged: Vec<&T> = candidates.iter().collect();
    if order == CandidateOrder::Shuffled {
        arranged.shuffle(rng);
    }
    arranged
}

/// Greedy first-fit under four simultaneous ceilings.
///
/// Candidates are visited once, in the order given. A candidate is accepted
/// only if no nutrient would exceed the ceiling. Stops as soon as every
/// nutrient has reached the ceiling. Candidates with incomplete nutrition are
/// skipped with a warning.
pub fn build_menu<'a, T, I>(ceiling: &NutrientTotals, candidates: I) -> FitOutcome<'a, T>
where
    T: NutritionSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut selected = Vec::new();
    let mut achieved = NutrientTotals::zero();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if achieved.meets(ceiling) {
            break;
        }

        let Some(nutrition) = candidate.nutrition_totals() else {
            let warning = MenuWarning::MissingNutrition {
                candidate: candidate.label().to_string(),
            };
            warn!("{}", warning);
            warnings.push(warning);
            continue;
        };

        if achieved.fits_under(&nutrition, ceiling) {
            debug!(candidate = candidate.label(), "accepted");
            achieved += nutrition;
            selected.push(candidate);
        } else {
            debug!(
                candidate = candidate.label(),
                over = ?achieved.overshoots(&nutrition, ceiling),
                "rejected"
            );
        }
    }

    FitOutcome {
        selected,
        satisfied: achieved.meets(ceiling),
        achieved,
        warnings,
    }
}
