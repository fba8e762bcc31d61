use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{MenuError, MenuWarning, Result};
use crate::models::{
    normalize_key, Course, Dish, IngredientRecord, Menu, MenuSnapshot, NutrientTotals,
    PopulationBreakdown,
};
use crate::planner::{
    build_menu, DietType, DishGenerator, FitOutcome, MenuConfig, RegenerationPolicy,
    SelectionPolicy,
};
use crate::state::Catalog;

/// Ingredient identities already allocated to a dish in the current menu.
#[derive(Debug, Clone, Default)]
pub struct UsedIngredientSet {
    keys: HashSet<String>,
}

impl UsedIngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark consumed. Returns false if it already was.
    pub fn insert(&mut self, record: &IngredientRecord) -> bool {
        self.keys.insert(record.key())
    }

    pub fn contains(&self, record: &IngredientRecord) -> bool {
        self.contains_name(&record.name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.keys.contains(&normalize_key(name))
    }

    /// Make a dish's ingredients eligible again.
    pub fn release(&mut self, dish: &Dish) {
        for key in dish.ingredient_keys() {
            self.keys.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// State of one interactive menu-building session.
///
/// Owns the consumed set, the menu and the random source; borrows the catalog.
pub struct MenuBuildSession<'a, R: Rng> {
    catalog: &'a Catalog,
    config: MenuConfig,
    population: PopulationBreakdown,
    used: UsedIngredientSet,
    menu: Menu,
    warnings: Vec<MenuWarning>,
    rng: R,
}

impl<'a, R: Rng> MenuBuildSession<'a, R> {
    pub fn new(
        catalog: &'a Catalog,
        config: MenuConfig,
        population: PopulationBreakdown,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            population,
            used: UsedIngredientSet::new(),
            menu: Menu::new(),
            warnings: Vec::new(),
            rng,
        })
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn used(&self) -> &UsedIngredientSet {
        &self.used
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn population(&self) -> &PopulationBreakdown {
        &self.population
    }

    /// Warnings since the last full regeneration.
    pub fn warnings(&self) -> &[MenuWarning] {
        &self.warnings
    }

    pub fn set_diet(&mut self, diet: DietType) {
        self.config.diet = diet;
    }

    /// Category used by composite courses that do not name their own.
    pub fn set_main_protein_category(&mut self, category: &str) {
        self.config.main_protein_category = category.to_string();
    }

    pub fn set_regeneration_policy(&mut self, policy: RegenerationPolicy) {
        self.config.regeneration = policy;
    }

    /// Clear the consumed set and warnings, then build every configured course in order.
    pub fn regenerate_all(&mut self) -> Result<&Menu> {
        self.used.clear();
        self.menu.clear();
        self.warnings.clear();

        for course in self.config.courses_in_order() {
            self.generate_course(course)?;
        }
        Ok(&self.menu)
    }

    /// Replace one course's dish, leaving the others untouched.
    ///
    /// Under `KeepConsumed` the replaced dish's ingredients stay unavailable
    /// until `regenerate_all`.
    pub fn regenerate(&mut self, course: Course) -> Result<&Dish> {
        if self.config.course(course).is_none() {
            return Err(MenuError::CourseNotConfigured(course));
        }

        if self.config.regeneration == RegenerationPolicy::ReleaseReplaced {
            if let Some(previous) = self.menu.get(course) {
                debug!(course = %course, dish = %previous.name, "releasing replaced ingredients");
                self.used.release(previous);
            }
        }

        self.generate_course(course)
    }

    /// Replace a course's policy, then regenerate it.
    pub fn regenerate_with(&mut self, course: Course, policy: SelectionPolicy) -> Result<&Dish> {
        policy.validate()?;
        match self.config.courses.iter_mut().find(|c| c.course == course) {
            Some(existing) => existing.policy = policy,
            None => self
                .config
                .courses
                .push(crate::planner::CourseConfig { course, policy }),
        }
        self.regenerate(course)
    }

    fn generate_course(&mut self, course: Course) -> Result<&Dish> {
        let generator = DishGenerator::new(
            self.catalog,
            self.config.diet,
            self.population.total(),
            self.config.reference_population,
        );
        let policy = &self
            .config
            .course(course)
            .ok_or(MenuError::CourseNotConfigured(course))?
            .policy;

        let dish = generator.generate(
            course,
            policy,
            &self.config.main_protein_category,
            &mut self.used,
            &mut self.rng,
        );

        if dish.is_placeholder() {
            let warning = MenuWarning::EmptyPool { course };
            warn!("{}", warning);
            self.warnings.push(warning);
        }

        self.menu.set(course, dish);
        self.menu
            .get(course)
            .ok_or(MenuError::CourseNotConfigured(course))
    }

    /// Nutrition of the whole current menu.
    pub fn achieved(&self) -> NutrientTotals {
        self.menu.nutrition()
    }

    /// Greedy fit of the generated dishes, in course order, against `ceiling`.
    pub fn fit_against(&self, ceiling: &NutrientTotals) -> FitOutcome<'_, Dish> {
        build_menu(ceiling, self.menu.iter().map(|(_, dish)| dish))
    }

    /// Generated courses the fit against `ceiling` leaves out, in course order.
    ///
    /// Placeholder dishes are not reported; they already carry an empty-pool warning.
    pub fn rejected_courses(&self, ceiling: &NutrientTotals) -> Vec<Course> {
        let outcome = self.fit_against(ceiling);
        self.menu
            .iter()
            .filter(|(_, dish)| !dish.is_placeholder())
            .filter(|(_, dish)| !outcome.selected.iter().any(|s| std::ptr::eq(*s, *dish)))
            .map(|(course, _)| course)
            .collect()
    }

    pub fn snapshot(&self, ceiling: Option<NutrientTotals>) -> MenuSnapshot {
        MenuSnapshot {
            menu: self.menu.clone(),
            achieved: self.achieved(),
            ceiling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DietClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(name: &str, category: &str, diet: DietClass) -> IngredientRecord {
        IngredientRecord::new(name, NutrientTotals::new(100.0, 5.0, 2.0, 15.0))
            .with_category(category)
            .with_diet(diet)
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            record("rice", "staple", DietClass::Vegan),
            record("noodles", "staple", DietClass::Vegan),
            record("bread", "staple", DietClass::Vegan),
            record("potato", "staple", DietClass::Vegan),
            record("corn", "staple", DietClass::Vegan),
            record("oats", "staple", DietClass::Vegan),
            record("chicken", "meat", DietClass::NonVegetarian),
            record("pork", "meat", DietClass::NonVegetarian),
            record("carrot", "vegetable", DietClass::Vegan),
            record("cabbage", "vegetable", DietClass::Vegan),
            record("spinach", "vegetable", DietClass::Vegan),
            record("broccoli", "vegetable", DietClass::Vegan),
            record("tofu", "soy", DietClass::Vegan),
            record("egg", "egg", DietClass::OvoLacto),
            record("seaweed", "seaweed", DietClass::Vegan),
        ])
        .unwrap()
    }

    fn session(catalog: &Catalog, seed: u64) -> MenuBuildSession<'_, StdRng> {
        MenuBuildSession::new(
            catalog,
            MenuConfig::default(),
            PopulationBreakdown::new().with("adult", 10),
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn assert_no_duplicates(menu: &Menu) {
        let keys = menu.ingredient_keys();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "duplicate ingredient in {:?}", keys);
    }

    #[test]
    fn test_regenerate_all_has_no_duplicates() {
        let catalog = sample_catalog();
        for seed in 0..50 {
            let mut session = session(&catalog, seed);
            let menu = session.regenerate_all().unwrap();
            assert_eq!(menu.len(), 4);
            assert_no_duplicates(menu);
            assert_eq!(session.used().len(), session.menu().ingredient_keys().len());
        }
    }

    #[test]
    fn test_regenerate_all_resets_consumed_set() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 1);
        session.regenerate_all().unwrap();
        session.regenerate(Course::Side).unwrap();
        session.regenerate_all().unwrap();
        assert_eq!(session.used().len(), session.menu().ingredient_keys().len());
    }

    #[test]
    fn test_single_regeneration_keeps_replaced_consumed() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 2);
        session.regenerate_all().unwrap();

        let before = session.menu().clone();
        let old_staple = before.get(Course::Staple).unwrap().clone();

        let new_staple = session.regenerate(Course::Staple).unwrap().clone();
        assert_ne!(new_staple.ingredients, old_staple.ingredients);
        assert!(session.used().contains(&old_staple.ingredients[0]));
        assert!(session.used().contains(&new_staple.ingredients[0]));

        for course in [Course::Main, Course::Side, Course::Soup] {
            assert_eq!(session.menu().get(course), before.get(course));
        }
        assert_no_duplicates(session.menu());
    }

    #[test]
    fn test_exhausted_pool_yields_placeholder_and_warning() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 3);
        session.regenerate_all().unwrap();

        // Six staples in total, so repeated regeneration must run dry.
        let mut placeholder = false;
        for _ in 0..6 {
            if session.regenerate(Course::Staple).unwrap().is_placeholder() {
                placeholder = true;
                break;
            }
        }
        assert!(placeholder);
        assert!(session
            .warnings()
            .contains(&MenuWarning::EmptyPool { course: Course::Staple }));
        assert_eq!(session.warnings().len(), 1);
    }

    #[test]
    fn test_release_replaced_frees_old_ingredients() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 4);
        session.set_regeneration_policy(RegenerationPolicy::ReleaseReplaced);
        session.regenerate_all().unwrap();

        for _ in 0..10 {
            let dish = session.regenerate(Course::Staple).unwrap();
            assert!(!dish.is_placeholder());
        }
        assert_eq!(session.used().len(), session.menu().ingredient_keys().len());
        assert_no_duplicates(session.menu());
    }

    #[test]
    fn test_regenerate_with_new_category() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 5);

        let dish = session
            .regenerate_with(
                Course::Main,
                SelectionPolicy::Composite {
                    protein_category: Some("soy".to_string()),
                    protein_grams: 200,
                    companion_grams: 50,
                    min_companions: 1,
                    max_companions: 1,
                },
            )
            .unwrap();
        assert_eq!(dish.ingredients[0].name, "tofu");
        assert_eq!(dish.ingredients.len(), 2);
    }

    #[test]
    fn test_zero_draw_side_rejected_before_drawing() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 9);
        session.regenerate_all().unwrap();
        let side = session.menu().get(Course::Side).cloned();

        let result = session.regenerate_with(
            Course::Side,
            SelectionPolicy::MultiPick {
                category: crate::planner::CategoryFilter::Any,
                min_count: 0,
                max_count: 0,
                portion: crate::planner::PortionRule::Scaled { base_grams: 100 },
            },
        );
        assert!(matches!(result, Err(MenuError::InvalidInput(_))));
        assert_eq!(session.menu().get(Course::Side).cloned(), side);
        assert!(!session
            .warnings()
            .contains(&MenuWarning::EmptyPool { course: Course::Side }));
    }

    #[test]
    fn test_unconfigured_course_is_error() {
        let catalog = sample_catalog();
        let mut config = MenuConfig::default();
        config.courses.retain(|c| c.course != Course::Soup);
        let mut session = MenuBuildSession::new(
            &catalog,
            config,
            PopulationBreakdown::new().with("adult", 10),
            StdRng::seed_from_u64(6),
        )
        .unwrap();

        assert_eq!(session.regenerate_all().unwrap().len(), 3);
        assert!(matches!(
            session.regenerate(Course::Soup),
            Err(MenuError::CourseNotConfigured(Course::Soup))
        ));
    }

    #[test]
    fn test_vegan_session_only_uses_vegan_ingredients() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 7);
        session.set_diet(DietType::Vegan);
        session.set_main_protein_category("soy");
        session.regenerate_all().unwrap();

        for (_, dish) in session.menu().iter() {
            assert!(dish
                .ingredients
                .iter()
                .all(|r| r.diet_class == Some(DietClass::Vegan)));
        }
    }

    #[test]
    fn test_fit_against_uses_generation_order() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 8);
        session.regenerate_all().unwrap();

        let generous = session.achieved() * 2.0;
        let outcome = session.fit_against(&generous);
        assert_eq!(outcome.selected.len(), 4);
        assert_eq!(outcome.selected[0].name, session.menu().get(Course::Staple).unwrap().name);
        assert!(!outcome.satisfied);

        let snapshot = session.snapshot(Some(generous));
        assert_eq!(snapshot.achieved, session.achieved());
    }

    #[test]
    fn test_courses_over_ceiling_are_rejected() {
        let catalog = sample_catalog();
        let mut session = session(&catalog, 10);
        session.regenerate_all().unwrap();
        assert!(session.rejected_courses(&(session.achieved() * 2.0)).is_empty());

        // Every record shares one per-100g profile, so the staple alone meets this.
        let staple_only = session.menu().get(Course::Staple).unwrap().nutrition();
        assert_eq!(
            session.rejected_courses(&staple_only),
            vec![Course::Main, Course::Side, Course::Soup]
        );

        let outcome = session.fit_against(&staple_only);
        assert!(outcome.satisfied);
        assert!(outcome.achieved.meets(&staple_only));
    }
}
