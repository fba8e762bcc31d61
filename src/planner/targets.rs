use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MenuError, Result};
use crate::models::{NutrientTotals, PopulationBreakdown};
use crate::planner::constants::{DEFAULT_MEAL_PERIOD, LUNCH_SHARE};

/// Per-person requirements for one group, flat or split by meal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRequirement {
    Flat(BTreeMap<String, f64>),
    ByMeal(BTreeMap<String, BTreeMap<String, f64>>),
}

/// Which slice of a group's requirements counts toward the meal.
#[derive(Debug, Clone, PartialEq)]
pub enum MealBasis {
    /// Per-meal values for this period. Flat entries are taken as already per-meal.
    Period(String),
    /// Full-day values times a fraction. Per-meal entries are summed to a day first.
    DailyFraction(f64),
}

impl MealBasis {
    /// Full day scaled to the lunch share.
    pub fn lunch_share() -> Self {
        MealBasis::DailyFraction(LUNCH_SHARE)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            MealBasis::DailyFraction(f) if !(*f > 0.0 && *f <= 1.0) => Err(MenuError::InvalidInput(
                format!("daily fraction {} must be in (0, 1]", f),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for MealBasis {
    fn default() -> Self {
        MealBasis::Period(DEFAULT_MEAL_PERIOD.to_string())
    }
}

impl GroupRequirement {
    /// Per-person totals under `basis`, or `None` when the period is absent.
    pub fn per_person(&self, basis: &MealBasis) -> Option<NutrientTotals> {
        match (self, basis) {
            (GroupRequirement::Flat(values), MealBasis::Period(_)) => {
                Some(NutrientTotals::from_partial_map(values))
            }
            (GroupRequirement::Flat(values), MealBasis::DailyFraction(f)) => {
                Some(NutrientTotals::from_partial_map(values) * *f)
            }
            (GroupRequirement::ByMeal(periods), MealBasis::Period(period)) => periods
                .get(period)
                .map(NutrientTotals::from_partial_map),
            (GroupRequirement::ByMeal(periods), MealBasis::DailyFraction(f)) => Some(
                periods
                    .values()
                    .map(NutrientTotals::from_partial_map)
                    .sum::<NutrientTotals>()
                    * *f,
            ),
        }
    }
}

/// Group key to per-person requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementsTable {
    groups: BTreeMap<String, GroupRequirement>,
}

impl RequirementsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: &str, requirement: GroupRequirement) {
        self.groups.insert(group.to_string(), requirement);
    }

    pub fn get(&self, group: &str) -> Option<&GroupRequirement> {
        self.groups.get(group)
    }

    /// Group keys in sorted order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Aggregate ceiling: each known group's requirements times its headcount.
///
/// Groups missing from the table, or lacking the requested period, are skipped.
pub fn required_nutrition(
    breakdown: &PopulationBreakdown,
    table: &RequirementsTable,
    basis: &MealBasis,
) -> NutrientTotals {
    let mut total = NutrientTotals::zero();
    for (group, count) in breakdown.iter() {
        if count == 0 {
            continue;
        }
        let Some(per_person) = table.get(group).and_then(|r| r.per_person(basis)) else {
            debug!(group, "no requirements for group, skipping");
            continue;
        };
        total += per_person * count as f64;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;

    fn sample_table() -> RequirementsTable {
        serde_json::from_str(
            r#"{
                "adult": {
                    "breakfast": {"calories": 500, "protein": 15, "fat": 15, "carbohydrate": 70},
                    "lunch": {"calories": 800, "protein": 25, "fat": 25, "carbohydrate": 110}
                },
                "child": {"calories": 1500, "protein": 40, "fat": 45, "carbohydrate": 200}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parses_both_shapes() {
        let table = sample_table();
        assert!(matches!(table.get("adult"), Some(GroupRequirement::ByMeal(_))));
        assert!(matches!(table.get("child"), Some(GroupRequirement::Flat(_))));
    }

    #[test]
    fn test_accumulates_by_headcount() {
        let table = sample_table();
        let population = PopulationBreakdown::new().with("adult", 2).with("child", 1);

        let total = required_nutrition(&population, &table, &MealBasis::default());
        assert_float_absolute_eq!(total.calories, 2.0 * 800.0 + 1500.0, 1e-9);
        assert_float_absolute_eq!(total.protein, 2.0 * 25.0 + 40.0, 1e-9);
    }

    #[test]
    fn test_unknown_groups_ignored() {
        let table = sample_table();
        let population = PopulationBreakdown::new().with("adult", 1).with("martian", 12);

        let total = required_nutrition(&population, &table, &MealBasis::default());
        assert_float_absolute_eq!(total.calories, 800.0, 1e-9);
    }

    #[test]
    fn test_missing_period_ignored() {
        let table = sample_table();
        let population = PopulationBreakdown::new().with("adult", 1).with("child", 1);

        let total = required_nutrition(&population, &table, &MealBasis::Period("dinner".to_string()));
        assert_float_absolute_eq!(total.calories, 1500.0, 1e-9);
    }

    #[test]
    fn test_daily_fraction() {
        let table = sample_table();
        let population = PopulationBreakdown::new().with("adult", 1).with("child", 1);

        let total = required_nutrition(&population, &table, &MealBasis::lunch_share());
        assert_float_absolute_eq!(total.calories, (1300.0 + 1500.0) * 0.4, 1e-9);
        assert_float_absolute_eq!(total.carbohydrate, (180.0 + 200.0) * 0.4, 1e-9);
    }

    #[test]
    fn test_fraction_validation() {
        assert!(MealBasis::DailyFraction(0.0).validate().is_err());
        assert!(MealBasis::DailyFraction(1.5).validate().is_err());
        assert!(MealBasis::lunch_share().validate().is_ok());
    }
}
