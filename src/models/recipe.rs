use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::NutrientTotals;

/// Which key carried the recipe name in the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameKey {
    #[default]
    Name,
    Recipe,
}

/// A named recipe: ingredient name (or alias) to grams, in file order.
///
/// Fields this crate does not use are kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecipe", into = "RawRecipe")]
pub struct RecipeRecord {
    pub name: String,
    pub ingredients: Vec<(String, f64)>,
    /// Precomputed totals. May be partial when supplied externally.
    pub nutrition: Option<BTreeMap<String, f64>>,
    name_key: NameKey,
    extra: Map<String, Value>,
}

/// On-disk shape. Accepts `recipe` or `name` for the title.
#[derive(Serialize, Deserialize)]
struct RawRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    ingredients: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutrition: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawRecipe> for RecipeRecord {
    type Error = String;

    fn try_from(mut raw: RawRecipe) -> Result<Self, Self::Error> {
        let (name, name_key) = match (raw.recipe, raw.name) {
            (Some(recipe), Some(other)) => {
                raw.extra.insert("name".to_string(), Value::String(other));
                (recipe, NameKey::Recipe)
            }
            (Some(recipe), None) => (recipe, NameKey::Recipe),
            (None, Some(name)) => (name, NameKey::Name),
            (None, None) => return Err("recipe has no name".to_string()),
        };

        let ingredients = raw
            .ingredients
            .into_iter()
            .map(|(ingredient, grams)| match grams.as_f64() {
                Some(g) => Ok((ingredient, g)),
                None => Err(format!(
                    "recipe '{}': grams for '{}' is not a number",
                    name, ingredient
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            ingredients,
            nutrition: raw.nutrition,
            name_key,
            extra: raw.extra,
        })
    }
}

impl From<RecipeRecord> for RawRecipe {
    fn from(record: RecipeRecord) -> Self {
        let (recipe, name) = match record.name_key {
            NameKey::Recipe => (Some(record.name), None),
            NameKey::Name => (None, Some(record.name)),
        };
        Self {
            recipe,
            name,
            ingredients: record
                .ingredients
                .into_iter()
                .map(|(ingredient, grams)| (ingredient, grams_value(grams)))
                .collect(),
            nutrition: record.nutrition,
            extra: record.extra,
        }
    }
}

/// Whole gram amounts are written back as integers.
fn grams_value(grams: f64) -> Value {
    if grams.fract() == 0.0 && grams.abs() < i64::MAX as f64 {
        Value::from(grams as i64)
    } else {
        Value::from(grams)
    }
}

impl RecipeRecord {
    pub fn new(name: &str, ingredients: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            ingredients: ingredients
                .iter()
                .map(|(n, g)| (n.to_string(), *g))
                .collect(),
            nutrition: None,
            name_key: NameKey::default(),
            extra: Map::new(),
        }
    }

    pub fn name_key(&self) -> NameKey {
        self.name_key
    }

    /// Fields carried through from the source file untouched.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// True when nutrition is absent or empty and should be computed.
    pub fn needs_nutrition(&self) -> bool {
        self.nutrition.as_ref().is_none_or(|n| n.is_empty())
    }

    /// Totals, or `None` when any tracked nutrient is missing.
    pub fn nutrition_totals(&self) -> Option<NutrientTotals> {
        self.nutrition
            .as_ref()
            .and_then(NutrientTotals::from_complete_map)
    }

    pub fn set_nutrition(&mut self, totals: NutrientTotals) {
        self.nutrition = Some(totals.to_map());
    }

    pub fn total_grams(&self) -> f64 {
        self.ingredients.iter().map(|(_, g)| g).sum()
    }
}
