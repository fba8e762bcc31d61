use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::Course;
use crate::planner::constants::*;

/// Dietary mode the menu is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    /// No restriction.
    #[default]
    #[serde(alias = "普通")]
    Any,
    Vegan,
    #[serde(alias = "ovo_lacto", alias = "vegetarian")]
    OvoLacto,
}

impl DietType {
    pub const ALL: [DietType; 3] = [DietType::Any, DietType::Vegan, DietType::OvoLacto];

    pub fn label(self) -> &'static str {
        match self {
            DietType::Any => "any",
            DietType::Vegan => "vegan",
            DietType::OvoLacto => "ovo-lacto",
        }
    }
}

impl std::fmt::Display for DietType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category restriction applied by the availability filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    Any,
    Only(String),
    Exclude(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn only(category: &str) -> Self {
        CategoryFilter::Only(category.to_string())
    }

    pub fn excluding(category: &str) -> Self {
        CategoryFilter::Exclude(BTreeSet::from([category.to_string()]))
    }

    pub fn admits(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
            CategoryFilter::Exclude(excluded) => category.is_none_or(|c| !excluded.contains(c)),
        }
    }
}

/// How a drawn ingredient's grams are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortionRule {
    /// `base_grams` scaled by population over the reference population.
    Scaled { base_grams: u32 },
    /// Independent uniform integer in `[min_grams, max_grams]`.
    Random { min_grams: u32, max_grams: u32 },
}

impl PortionRule {
    /// Unscaled random grams over the default range.
    pub fn demo_random() -> Self {
        PortionRule::Random {
            min_grams: RANDOM_PORTION_RANGE.0,
            max_grams: RANDOM_PORTION_RANGE.1,
        }
    }
}

/// Selection policy for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Exactly one record from the filtered pool.
    SinglePick {
        #[serde(default)]
        category: CategoryFilter,
        base_grams: u32,
    },
    /// A uniform random subset of `min_count..=max_count` records.
    MultiPick {
        #[serde(default)]
        category: CategoryFilter,
        min_count: usize,
        max_count: usize,
        portion: PortionRule,
    },
    /// One protein of a category plus companions from outside that category.
    Composite {
        /// Falls back to the session's main protein category when unset.
        #[serde(default)]
        protein_category: Option<String>,
        protein_grams: u32,
        companion_grams: u32,
        min_companions: usize,
        max_companions: usize,
    },
}

impl SelectionPolicy {
    pub fn validate(&self) -> Result<()> {
        let (low, high) = match self {
            SelectionPolicy::SinglePick { .. } => return Ok(()),
            SelectionPolicy::MultiPick {
                min_count,
                max_count,
                portion,
                ..
            } => {
                if *min_count == 0 {
                    return Err(MenuError::InvalidInput(
                        "multi-pick must draw at least one ingredient".to_string(),
                    ));
                }
                if let PortionRule::Random {
                    min_grams,
                    max_grams,
                } = portion
                {
                    if min_grams > max_grams {
                        return Err(MenuError::InvalidInput(format!(
                            "portion range {}..={} is empty",
                            min_grams, max_grams
                        )));
                    }
                }
                (*min_count, *max_count)
            }
            SelectionPolicy::Composite {
                min_companions,
                max_companions,
                ..
            } => (*min_companions, *max_companions),
        };

        if low > high {
            return Err(MenuError::InvalidInput(format!(
                "draw count range {}..={} is empty",
                low, high
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseConfig {
    pub course: Course,
    #[serde(flatten)]
    pub policy: SelectionPolicy,
}

/// What a single-course regeneration does with the replaced dish's ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationPolicy {
    /// Replaced ingredients stay consumed until a full regeneration.
    #[default]
    KeepConsumed,
    /// Replaced ingredients become eligible again.
    ReleaseReplaced,
}

/// Iteration order of candidates for the fit checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    #[default]
    Catalog,
    Shuffled,
}

/// Full menu-building configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub diet: DietType,
    pub main_protein_category: String,
    pub reference_population: u32,
    pub regeneration: RegenerationPolicy,
    pub candidate_order: CandidateOrder,
    pub courses: Vec<CourseConfig>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            diet: DietType::Any,
            main_protein_category: DEFAULT_PROTEIN_CATEGORY.to_string(),
            reference_population: REFERENCE_POPULATION,
            regeneration: RegenerationPolicy::KeepConsumed,
            candidate_order: CandidateOrder::Catalog,
            courses: default_courses(),
        }
    }
}

impl MenuConfig {
    pub fn course(&self, course: Course) -> Option<&CourseConfig> {
        self.courses.iter().find(|c| c.course == course)
    }

    /// Configured courses in build order.
    pub fn courses_in_order(&self) -> Vec<Course> {
        Course::ORDER
            .into_iter()
            .filter(|c| self.course(*c).is_some())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_population == 0 {
            return Err(MenuError::InvalidInput(
                "reference population must be positive".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for course in &self.courses {
            if !seen.insert(course.course) {
                return Err(MenuError::InvalidInput(format!(
                    "course {} configured more than once",
                    course.course
                )));
            }
            course.policy.validate()?;
        }
        Ok(())
    }
}

/// Staple, composite main, vegetable side, free soup.
pub fn default_courses() -> Vec<CourseConfig> {
    vec![
        CourseConfig {
            course: Course::Staple,
            policy: SelectionPolicy::SinglePick {
                category: CategoryFilter::only(STAPLE_CATEGORY),
                base_grams: STAPLE_BASE_GRAMS,
            },
        },
        CourseConfig {
            course: Course::Main,
            policy: SelectionPolicy::Composite {
                protein_category: None,
                protein_grams: PROTEIN_BASE_GRAMS,
                companion_grams: COMPANION_BASE_GRAMS,
                min_companions: COMPANION_COUNT_RANGE.0,
                max_companions: COMPANION_COUNT_RANGE.1,
            },
        },
        CourseConfig {
            course: Course::Side,
            policy: SelectionPolicy::MultiPick {
                category: CategoryFilter::only(VEGETABLE_CATEGORY),
                min_count: SIDE_COUNT_RANGE.0,
                max_count: SIDE_COUNT_RANGE.1,
                portion: PortionRule::Scaled {
                    base_grams: SIDE_BASE_GRAMS,
                },
            },
        },
        CourseConfig {
            course: Course::Soup,
            policy: SelectionPolicy::MultiPick {
                category: CategoryFilter::excluding(STAPLE_CATEGORY),
                min_count: SOUP_COUNT_RANGE.0,
                max_count: SOUP_COUNT_RANGE.1,
                portion: PortionRule::Scaled {
                    base_grams: SOUP_BASE_GRAMS,
                },
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MenuConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.courses_in_order(), Course::ORDER.to_vec());
    }

    #[test]
    fn test_demo_random_portion_is_valid() {
        let policy = SelectionPolicy::MultiPick {
            category: CategoryFilter::Any,
            min_count: SOUP_COUNT_RANGE.0,
            max_count: SOUP_COUNT_RANGE.1,
            portion: PortionRule::demo_random(),
        };
        assert!(policy.validate().is_ok());
        assert_eq!(
            PortionRule::demo_random(),
            PortionRule::Random {
                min_grams: 50,
                max_grams: 200
            }
        );
    }

    #[test]
    fn test_category_filter_admits() {
        assert!(CategoryFilter::Any.admits(None));
        assert!(CategoryFilter::only("staple").admits(Some("staple")));
        assert!(!CategoryFilter::only("staple").admits(None));
        assert!(!CategoryFilter::excluding("meat").admits(Some("meat")));
        assert!(CategoryFilter::excluding("meat").admits(Some("vegetable")));
        assert!(CategoryFilter::excluding("meat").admits(None));
    }

    #[test]
    fn test_empty_range_rejected() {
        let policy = SelectionPolicy::MultiPick {
            category: CategoryFilter::Any,
            min_count: 3,
            max_count: 1,
            portion: PortionRule::Scaled { base_grams: 50 },
        };
        assert!(matches!(policy.validate(), Err(MenuError::InvalidInput(_))));

        let mut config = MenuConfig::default();
        config.courses.push(config.courses[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_draw_multi_pick_rejected() {
        let policy = SelectionPolicy::MultiPick {
            category: CategoryFilter::Any,
            min_count: 0,
            max_count: 0,
            portion: PortionRule::Scaled { base_grams: 50 },
        };
        assert!(matches!(policy.validate(), Err(MenuError::InvalidInput(_))));
    }

    #[test]
    fn test_partial_config_json() {
        let config: MenuConfig = serde_json::from_str(
            r#"{
                "diet": "ovo-lacto",
                "regeneration": "release_replaced",
                "courses": [
                    {"course": "staple", "policy": "single_pick",
                     "category": {"only": "grain"}, "base_grams": 120},
                    {"course": "soup", "policy": "multi_pick", "min_count": 1, "max_count": 2,
                     "portion": {"kind": "random", "min_grams": 30, "max_grams": 60}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.diet, DietType::OvoLacto);
        assert_eq!(config.regeneration, RegenerationPolicy::ReleaseReplaced);
        assert_eq!(config.reference_population, REFERENCE_POPULATION);
        assert_eq!(config.courses_in_order(), vec![Course::Staple, Course::Soup]);
        assert!(config.validate().is_ok());
    }
}
