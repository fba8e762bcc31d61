use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::models::{IngredientRecord, NutrientTotals};

/// A course of the daily menu. Ordering is the fixed build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Course {
    Staple,
    Main,
    Side,
    Soup,
}

impl Course {
    pub const ORDER: [Course; 4] = [Course::Staple, Course::Main, Course::Side, Course::Soup];

    pub fn label(self) -> &'static str {
        match self {
            Course::Staple => "Staple",
            Course::Main => "Main",
            Course::Side => "Side",
            Course::Soup => "Soup",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Course {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staple" => Ok(Course::Staple),
            "main" => Ok(Course::Main),
            "side" => Ok(Course::Side),
            "soup" => Ok(Course::Soup),
            other => Err(MenuError::InvalidInput(format!("Unknown course: {}", other))),
        }
    }
}

/// One generated dish: ingredients paired index-wise with gram portions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DishRepr")]
pub struct Dish {
    pub name: String,
    pub ingredients: Vec<IngredientRecord>,
    pub portions: Vec<u32>,
}

#[derive(Deserialize)]
struct DishRepr {
    name: String,
    #[serde(default)]
    ingredients: Vec<IngredientRecord>,
    #[serde(default)]
    portions: Vec<u32>,
}

impl TryFrom<DishRepr> for Dish {
    type Error = String;

    fn try_from(repr: DishRepr) -> Result<Self, Self::Error> {
        if repr.ingredients.len() != repr.portions.len() {
            return Err(format!(
                "dish '{}' has {} ingredients but {} portions",
                repr.name,
                repr.ingredients.len(),
                repr.portions.len()
            ));
        }
        Ok(Dish {
            name: repr.name,
            ingredients: repr.ingredients,
            portions: repr.portions,
        })
    }
}

impl Dish {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ingredients: Vec::new(),
            portions: Vec::new(),
        }
    }

    /// Dish produced when a course has nothing eligible.
    pub fn placeholder(course: Course) -> Self {
        Self::new(format!("{} - no ingredient available", course))
    }

    pub fn push(&mut self, ingredient: IngredientRecord, grams: u32) {
        self.ingredients.push(ingredient);
        self.portions.push(grams);
    }

    pub fn is_placeholder(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// (ingredient, grams) pairs in selection order.
    pub fn items(&self) -> impl Iterator<Item = (&IngredientRecord, u32)> {
        self.ingredients.iter().zip(self.portions.iter().copied())
    }

    pub fn ingredient_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.ingredients.iter().map(IngredientRecord::key)
    }

    /// Sum of each ingredient's per-100g nutrition scaled to its portion.
    pub fn nutrition(&self) -> NutrientTotals {
        self.items()
            .map(|(ingredient, grams)| ingredient.nutrition_for(grams))
            .sum()
    }

    pub fn total_grams(&self) -> u32 {
        self.portions.iter().sum()
    }
}

/// Course to dish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    dishes: BTreeMap<Course, Dish>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, course: Course) -> Option<&Dish> {
        self.dishes.get(&course)
    }

    /// Replace a course, returning the dish it displaced.
    pub fn set(&mut self, course: Course, dish: Dish) -> Option<Dish> {
        self.dishes.insert(course, dish)
    }

    pub fn clear(&mut self) {
        self.dishes.clear();
    }

    /// Dishes in course order.
    pub fn iter(&self) -> impl Iterator<Item = (Course, &Dish)> {
        self.dishes.iter().map(|(c, d)| (*c, d))
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn nutrition(&self) -> NutrientTotals {
        self.dishes.values().map(Dish::nutrition).sum()
    }

    /// Every ingredient key across all courses, with repeats.
    pub fn ingredient_keys(&self) -> Vec<String> {
        self.dishes.values().flat_map(Dish::ingredient_keys).collect()
    }
}

/// Menu handed to presentation or export, with its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub menu: Menu,
    pub achieved: NutrientTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<NutrientTotals>,
}
