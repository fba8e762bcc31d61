use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::planner::{CandidateOrder, DietType, MealBasis, RegenerationPolicy};

/// DailyMenu: compose a staple, main, side and soup menu that fits a group's nutrition needs.
#[derive(Parser, Debug)]
#[command(name = "daily_menu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the ingredient catalog JSON file.
    #[arg(short, long, global = true, default_value = "ingredients.json")]
    pub file: String,

    /// Path to the per-group nutrition requirements JSON file.
    #[arg(short, long, global = true, default_value = "requirements.json")]
    pub requirements: String,

    /// Optional menu configuration JSON file.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Meal period to read from per-meal requirements.
    #[arg(long, global = true, default_value = "lunch")]
    pub meal: String,

    /// Use full-day requirements scaled by this fraction instead of a meal period.
    #[arg(long, global = true, conflicts_with = "meal")]
    pub daily_fraction: Option<f64>,

    /// Log every selection decision to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn meal_basis(&self) -> MealBasis {
        match self.daily_fraction {
            Some(fraction) => MealBasis::DailyFraction(fraction),
            None => MealBasis::Period(self.meal.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a full menu, then regenerate courses interactively.
    Plan(PlanArgs),

    /// Greedily select recipes under the group's nutrition ceiling.
    Fit {
        /// Path to the recipe catalog JSON file.
        #[arg(long, default_value = "recipes.json")]
        recipes: String,

        /// Population JSON file ({"group": count}). Prompted per group if omitted.
        #[arg(short, long)]
        population: Option<String>,

        /// Candidate iteration order. Overrides the configuration file.
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Seed for the shuffled order.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compute nutrition for recipes that lack it.
    Nutrition {
        /// Path to the recipe catalog JSON file.
        #[arg(long, default_value = "recipes.json")]
        recipes: String,

        /// Where to write the completed recipes.
        #[arg(short, long, default_value = "recipes_with_nutrition.json")]
        output: String,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan(PlanArgs::default())
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct PlanArgs {
    /// Population JSON file ({"group": count}). Prompted per group if omitted.
    #[arg(short, long)]
    pub population: Option<String>,

    /// Diet type. Overrides the configuration file.
    #[arg(long, value_enum)]
    pub diet: Option<DietArg>,

    /// Main course protein category. Overrides the configuration file.
    #[arg(long)]
    pub protein: Option<String>,

    /// Seed for reproducible menus.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Release a replaced dish's ingredients on single-course regeneration.
    #[arg(long)]
    pub release_replaced: bool,

    /// Write the final menu as JSON.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the final menu as CSV.
    #[arg(long)]
    pub csv: Option<String>,

    /// Build once and exit without the regenerate loop. Needs `--population`.
    #[arg(long, requires = "population")]
    pub no_interactive: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietArg {
    Any,
    Vegan,
    OvoLacto,
}

impl From<DietArg> for DietType {
    fn from(arg: DietArg) -> Self {
        match arg {
            DietArg::Any => DietType::Any,
            DietArg::Vegan => DietType::Vegan,
            DietArg::OvoLacto => DietType::OvoLacto,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Catalog,
    Shuffled,
}

impl From<OrderArg> for CandidateOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Catalog => CandidateOrder::Catalog,
            OrderArg::Shuffled => CandidateOrder::Shuffled,
        }
    }
}

/// Regeneration policy implied by the `--release-replaced` flag, if set.
pub fn regeneration_override(release_replaced: bool) -> Option<RegenerationPolicy> {
    release_replaced.then_some(RegenerationPolicy::ReleaseReplaced)
}
