use rand::Rng;
use tracing::debug;

use crate::models::{Course, Dish, IngredientRecord};
use crate::planner::config::{CategoryFilter, DietType, PortionRule, SelectionPolicy};
use crate::planner::filter::available;
use crate::state::{Catalog, UsedIngredientSet};

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Grams for `base_grams` written for `reference` people, scaled to `population`.
///
/// Rounds half to even. A non-empty population never gets a zero portion.
pub fn scaled_portion(base_grams: u32, population: u32, reference: u32) -> u32 {
    if population == 0 || base_grams == 0 || reference == 0 {
        return 0;
    }
    let exact = base_grams as f64 * population as f64 / reference as f64;
    (exact.round_ties_even() as u32).max(1)
}

/// Index of one uniformly drawn item, or `None` for an empty pool.
pub fn draw_one<R: Rng + ?Sized>(pool_len: usize, rng: &mut R) -> Option<usize> {
    (pool_len > 0).then(|| rng.gen_range(0..pool_len))
}

/// `min(pool_len, uniform(low..=high))`.
pub fn draw_count<R: Rng + ?Sized>(pool_len: usize, low: usize, high: usize, rng: &mut R) -> usize {
    let requested = if low >= high {
        low
    } else {
        rng.gen_range(low..=high)
    };
    requested.min(pool_len)
}

/// `min(pool_len, count)` distinct indices, drawn without replacement.
pub fn draw_distinct<R: Rng + ?Sized>(pool_len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    rand::seq::index::sample(rng, pool_len, count.min(pool_len)).into_vec()
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Builds dishes from a catalog for a fixed diet and headcount.
///
/// Every ingredient placed in a dish is marked in the used set.
#[derive(Debug, Clone, Copy)]
pub struct DishGenerator<'a> {
    pub catalog: &'a Catalog,
    pub diet: DietType,
    pub population: u32,
    pub reference_population: u32,
}

impl<'a> DishGenerator<'a> {
    pub fn new(catalog: &'a Catalog, diet: DietType, population: u32, reference_population: u32) -> Self {
        Self {
            catalog,
            diet,
            population,
            reference_population,
        }
    }

    fn portion(&self, base_grams: u32) -> u32 {
        scaled_portion(base_grams, self.population, self.reference_population)
    }

    fn pool(&self, category: &CategoryFilter, used: &UsedIngredientSet) -> Vec<&'a IngredientRecord> {
        available(self.catalog, self.diet, category, used)
    }

    /// Dispatch on a course's policy. `main_category` fills an unset composite category.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        course: Course,
        policy: &SelectionPolicy,
        main_category: &str,
        used: &mut UsedIngredientSet,
        rng: &mut R,
    ) -> Dish {
        match policy {
            SelectionPolicy::SinglePick {
                category,
                base_grams,
            } => self.single_pick(course, category, *base_grams, used, rng),
            SelectionPolicy::MultiPick {
                category,
                min_count,
                max_count,
                portion,
            } => self.multi_pick(course, category, (*min_count, *max_count), *portion, used, rng),
            SelectionPolicy::Composite {
                protein_category,
                protein_grams,
                companion_grams,
                min_companions,
                max_companions,
            } => self.composite(
                course,
                protein_category.as_deref().unwrap_or(main_category),
                (*protein_grams, *companion_grams),
                (*min_companions, *max_companions),
                used,
                rng,
            ),
        }
    }

    /// Exactly one record with a population-scaled portion.
    pub fn single_pick<R: Rng + ?Sized>(
        &self,
        course: Course,
        category: &CategoryFilter,
        base_grams: u32,
        used: &mut UsedIngredientSet,
        rng: &mut R,
    ) -> Dish {
        let pool = self.pool(category, used);
        let Some(i) = draw_one(pool.len(), rng) else {
            return Dish::placeholder(course);
        };

        let record = pool[i];
        let grams = self.portion(base_grams);
        debug!(course = %course, ingredient = %record.name, grams, "single pick");

        used.insert(record);
        let mut dish = Dish::new(format!("{} - {}", course, record.name));
        dish.push(record.clone(), grams);
        dish
    }

    /// A uniform random subset of `count` range size, without replacement.
    pub fn multi_pick<R: Rng + ?Sized>(
        &self,
        course: Course,
        category: &CategoryFilter,
        count: (usize, usize),
        portion: PortionRule,
        used: &mut UsedIngredientSet,
        rng: &mut R,
    ) -> Dish {
        let pool = self.pool(category, used);
        let k = draw_count(pool.len(), count.0, count.1, rng);
        if k == 0 {
            return Dish::placeholder(course);
        }

        let drawn: Vec<&IngredientRecord> = draw_distinct(pool.len(), k, rng)
            .into_iter()
            .map(|i| pool[i])
            .collect();

        let names: Vec<&str> = drawn.iter().map(|r| r.name.as_str()).collect();
        let mut dish = Dish::new(format!("{} - {}", course, names.join(", ")));
        for record in drawn {
            let grams = match portion {
                PortionRule::Scaled { base_grams } => self.portion(base_grams),
                PortionRule::Random {
                    min_grams,
                    max_grams,
                } => rng.gen_range(min_grams..=max_grams),
            };
            debug!(course = %course, ingredient = %record.name, grams, "multi pick");
            used.insert(record);
            dish.push(record.clone(), grams);
        }
        dish
    }

    /// One protein from `protein_category` plus companions from every other category.
    ///
    /// Both pools are taken before anything is marked used. `grams` is
    /// (protein, companion) base grams.
    pub fn composite<R: Rng + ?Sized>(
        &self,
        course: Course,
        protein_category: &str,
        grams: (u32, u32),
        companions: (usize, usize),
        used: &mut UsedIngredientSet,
        rng: &mut R,
    ) -> Dish {
        let protein_pool = self.pool(&CategoryFilter::only(protein_category), used);
        let companion_pool = self.pool(&CategoryFilter::excluding(protein_category), used);

        let Some(p) = draw_one(protein_pool.len(), rng) else {
            debug!(course = %course, category = protein_category, "no protein available");
            return Dish::placeholder(course);
        };
        let protein = protein_pool[p];

        let k = draw_count(companion_pool.len(), companions.0, companions.1, rng);
        let sides: Vec<&IngredientRecord> = draw_distinct(companion_pool.len(), k, rng)
            .into_iter()
            .map(|i| companion_pool[i])
            .collect();

        let name = if sides.is_empty() {
            format!("{} - {}", course, protein.name)
        } else {
            let names: Vec<&str> = sides.iter().map(|r| r.name.as_str()).collect();
            format!("{} - {} with {}", course, protein.name, names.join(", "))
        };

        let mut dish = Dish::new(name);
        used.insert(protein);
        dish.push(protein.clone(), self.portion(grams.0));
        for side in sides {
            used.insert(side);
            dish.push(side.clone(), self.portion(grams.1));
        }
        debug!(course = %course, dish = %dish.name, "composite pick");
        dish
    }
}
