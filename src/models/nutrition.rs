use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// The four nutrients tracked against a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbohydrate,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbohydrate,
    ];

    /// Canonical key used in catalog and requirements files.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Carbohydrate => "carbohydrate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Calories, protein, fat and carbohydrate.
///
/// Used both as a ceiling and as a running accumulator. Missing fields
/// deserialize to 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbohydrate: f64,
}

impl NutrientTotals {
    pub fn new(calories: f64, protein: f64, fat: f64, carbohydrate: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbohydrate,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbohydrate => self.carbohydrate,
        }
    }

    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
        match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::Protein => &mut self.protein,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Carbohydrate => &mut self.carbohydrate,
        }
    }

    /// Multiply every nutrient by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbohydrate: self.carbohydrate * factor,
        }
    }

    /// Nutrition of `grams` of something described per 100g.
    pub fn for_grams(&self, grams: f64) -> Self {
        Self {
            calories: self.calories * grams / 100.0,
            protein: self.protein * grams / 100.0,
            fat: self.fat * grams / 100.0,
            carbohydrate: self.carbohydrate * grams / 100.0,
        }
    }

    /// True when no value is negative.
    pub fn is_non_negative(&self) -> bool {
        Nutrient::ALL.iter().all(|&n| self.get(n) >= 0.0)
    }

    /// Whether adding `addition` keeps every nutrient at or below `ceiling`.
    pub fn fits_under(&self, addition: &NutrientTotals, ceiling: &NutrientTotals) -> bool {
        Nutrient::ALL
            .iter()
            .all(|&n| self.get(n) + addition.get(n) <= ceiling.get(n))
    }

    /// Nutrients for which adding `addition` would exceed `ceiling`.
    pub fn overshoots(&self, addition: &NutrientTotals, ceiling: &NutrientTotals) -> Vec<Nutrient> {
        Nutrient::ALL
            .into_iter()
            .filter(|&n| self.get(n) + addition.get(n) > ceiling.get(n))
            .collect()
    }

    /// Whether every nutrient is at or above `floor`.
    pub fn meets(&self, floor: &NutrientTotals) -> bool {
        Nutrient::ALL.iter().all(|&n| self.get(n) >= floor.get(n))
    }

    /// Build from a keyed map, requiring all four keys.
    pub fn from_complete_map(map: &BTreeMap<String, f64>) -> Option<Self> {
        let mut totals = Self::zero();
        for nutrient in Nutrient::ALL {
            *totals.get_mut(nutrient) = *map.get(nutrient.key())?;
        }
        Some(totals)
    }

    /// Build from a keyed map, treating missing keys as 0.0.
    pub fn from_partial_map(map: &BTreeMap<String, f64>) -> Self {
        let mut totals = Self::zero();
        for nutrient in Nutrient::ALL {
            *totals.get_mut(nutrient) = map.get(nutrient.key()).copied().unwrap_or(0.0);
        }
        totals
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        Nutrient::ALL
            .into_iter()
            .map(|n| (n.key().to_string(), self.get(n)))
            .collect()
    }
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, other: NutrientTotals) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            carbohydrate: self.carbohydrate + other.carbohydrate,
        }
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, other: NutrientTotals) {
        *self = *self + other;
    }
}

impl Mul<f64> for NutrientTotals {
    type Output = NutrientTotals;

    fn mul(self, factor: f64) -> NutrientTotals {
        self.scale(factor)
    }
}

impl std::iter::Sum for NutrientTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientTotals::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceiling() -> NutrientTotals {
        NutrientTotals::new(100.0, 10.0, 10.0, 10.0)
    }

    #[test]
    fn test_add_and_scale() {
        let a = NutrientTotals::new(1.0, 2.0, 3.0, 4.0);
        let b = NutrientTotals::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(a + b, NutrientTotals::new(11.0, 22.0, 33.0, 44.0));
        assert_eq!(a * 2.0, NutrientTotals::new(2.0, 4.0, 6.0, 8.0));

        let total: NutrientTotals = vec![a, b].into_iter().sum();
        assert_eq!(total, a + b);
    }

    #[test]
    fn test_fits_under_is_inclusive() {
        let achieved = NutrientTotals::new(50.0, 5.0, 5.0, 5.0);
        let exact = NutrientTotals::new(50.0, 5.0, 5.0, 5.0);
        assert!(achieved.fits_under(&exact, &ceiling()));

        let over_fat = NutrientTotals::new(10.0, 1.0, 6.0, 1.0);
        assert!(!achieved.fits_under(&over_fat, &ceiling()));
        assert_eq!(achieved.overshoots(&over_fat, &ceiling()), vec![Nutrient::Fat]);
    }

    #[test]
    fn test_meets() {
        assert!(ceiling().meets(&ceiling()));
        let short = NutrientTotals::new(100.0, 10.0, 10.0, 9.9);
        assert!(!short.meets(&ceiling()));
    }

    #[test]
    fn test_complete_map_requires_all_keys() {
        let mut map = NutrientTotals::new(1.0, 2.0, 3.0, 4.0).to_map();
        assert_eq!(
            NutrientTotals::from_complete_map(&map),
            Some(NutrientTotals::new(1.0, 2.0, 3.0, 4.0))
        );

        map.remove("fat");
        assert_eq!(NutrientTotals::from_complete_map(&map), None);
        assert_eq!(
            NutrientTotals::from_partial_map(&map),
            NutrientTotals::new(1.0, 2.0, 0.0, 4.0)
        );
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let totals: NutrientTotals = serde_json::from_str(r#"{"calories": 130}"#).unwrap();
        assert_eq!(totals, NutrientTotals::new(130.0, 0.0, 0.0, 0.0));
    }
}
