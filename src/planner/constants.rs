/// Headcount that base portions are written for.
pub const REFERENCE_POPULATION: u32 = 10;

/// Share of full-day requirements attributed to lunch.
pub const LUNCH_SHARE: f64 = 0.4;

/// Meal period looked up in per-meal requirements by default.
pub const DEFAULT_MEAL_PERIOD: &str = "lunch";

// ─────────────────────────────────────────────────────────────────────────────
// Base portions (grams at the reference population)
// ─────────────────────────────────────────────────────────────────────────────

pub const STAPLE_BASE_GRAMS: u32 = 150;

/// The single protein item of a composite main dish.
pub const PROTEIN_BASE_GRAMS: u32 = 200;

/// Each companion ingredient of a composite main dish.
pub const COMPANION_BASE_GRAMS: u32 = 50;

pub const SIDE_BASE_GRAMS: u32 = 100;

pub const SOUP_BASE_GRAMS: u32 = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Draw counts
// ─────────────────────────────────────────────────────────────────────────────

pub const COMPANION_COUNT_RANGE: (usize, usize) = (1, 3);

pub const SIDE_COUNT_RANGE: (usize, usize) = (1, 2);

pub const SOUP_COUNT_RANGE: (usize, usize) = (2, 3);

/// Gram range for unscaled random portions.
pub const RANDOM_PORTION_RANGE: (u32, u32) = (50, 200);

// ─────────────────────────────────────────────────────────────────────────────
// Default categories
// ─────────────────────────────────────────────────────────────────────────────

pub const STAPLE_CATEGORY: &str = "staple";

pub const DEFAULT_PROTEIN_CATEGORY: &str = "meat";

pub const VEGETABLE_CATEGORY: &str = "vegetable";
