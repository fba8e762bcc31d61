use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::NutrientTotals;

/// Diet tag carried by an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietClass {
    Vegan,
    #[serde(alias = "ovo_lacto", alias = "vegetarian")]
    OvoLacto,
    #[serde(alias = "non_vegetarian", alias = "meat")]
    NonVegetarian,
}

impl fmt::Display for DietClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DietClass::Vegan => "vegan",
            DietClass::OvoLacto => "ovo-lacto",
            DietClass::NonVegetarian => "non-vegetarian",
        };
        f.write_str(name)
    }
}

/// An ingredient with per-100g nutrition and filtering tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    #[serde(rename = "ingredient", alias = "name")]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_aliases")]
    pub aliases: Vec<String>,

    #[serde(default, alias = "diet_type", skip_serializing_if = "Option::is_none")]
    pub diet_class: Option<DietClass>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub nutrition_per_100g: NutrientTotals,
}

impl IngredientRecord {
    pub fn new(name: &str, nutrition_per_100g: NutrientTotals) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            diet_class: None,
            category: None,
            nutrition_per_100g,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_diet(mut self, diet_class: DietClass) -> Self {
        self.diet_class = Some(diet_class);
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Canonical key for lookups (trimmed, lowercase name).
    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }

    /// Non-empty name and non-negative nutrition.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.nutrition_per_100g.is_non_negative()
    }

    /// Nutrition for a portion of `grams`.
    pub fn nutrition_for(&self, grams: u32) -> NutrientTotals {
        self.nutrition_per_100g.for_grams(grams as f64)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        let n = &self.nutrition_per_100g;
        format!(
            "{} [{}]: {} kcal, P:{} F:{} C:{} per 100g",
            self.name,
            self.category.as_deref().unwrap_or("-"),
            n.calories,
            n.protein,
            n.fat,
            n.carbohydrate
        )
    }
}

impl PartialEq for IngredientRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for IngredientRecord {}

impl std::hash::Hash for IngredientRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Lowercase, trimmed form of a name or alias.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Aliases arrive either as a comma-separated string or as a list.
fn deserialize_aliases<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AliasField {
        Joined(String),
        List(Vec<String>),
    }

    let aliases = match Option::<AliasField>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(AliasField::Joined(joined)) => clean_aliases(joined.split(',')),
        Some(AliasField::List(list)) => clean_aliases(list.iter().map(String::as_str)),
    };
    Ok(aliases)
}

fn clean_aliases<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> IngredientRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_aliases_from_comma_string() {
        let record = parse(r#"{"ingredient": "Rice", "aliases": " white rice, ,steamed rice "}"#);
        assert_eq!(record.aliases, vec!["white rice", "steamed rice"]);
    }

    #[test]
    fn test_aliases_from_list() {
        let record = parse(r#"{"ingredient": "Rice", "aliases": [" white rice", "", "  "]}"#);
        assert_eq!(record.aliases, vec!["white rice"]);
    }

    #[test]
    fn test_aliases_missing_or_null() {
        assert!(parse(r#"{"ingredient": "Rice"}"#).aliases.is_empty());
        assert!(parse(r#"{"ingredient": "Rice", "aliases": null}"#).aliases.is_empty());
    }

    #[test]
    fn test_diet_and_nutrition_defaults() {
        let record = parse(
            r#"{"ingredient": "Tofu", "diet_class": "vegan", "category": "soy",
                "nutrition_per_100g": {"calories": 76, "protein": 8}}"#,
        );
        assert_eq!(record.diet_class, Some(DietClass::Vegan));
        assert_eq!(record.nutrition_per_100g, NutrientTotals::new(76.0, 8.0, 0.0, 0.0));

        let egg = parse(r#"{"ingredient": "Egg", "diet_type": "ovo-lacto"}"#);
        assert_eq!(egg.diet_class, Some(DietClass::OvoLacto));
        assert_eq!(egg.nutrition_per_100g, NutrientTotals::zero());
    }

    #[test]
    fn test_is_valid() {
        let rice = IngredientRecord::new("Rice", NutrientTotals::new(130.0, 2.4, 0.3, 28.2));
        assert!(rice.is_valid());

        let blank = IngredientRecord::new("   ", NutrientTotals::zero());
        assert!(!blank.is_valid());

        let negative = IngredientRecord::new("Bad", NutrientTotals::new(-1.0, 0.0, 0.0, 0.0));
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_equality_case_insensitive() {
        let a = IngredientRecord::new("Chicken", NutrientTotals::zero());
        let b = IngredientRecord::new(" CHICKEN ", NutrientTotals::zero());
        assert_eq!(a, b);
    }
}
