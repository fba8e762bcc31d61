use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{MenuError, Result};
use crate::models::{Course, PopulationBreakdown};
use crate::planner::DietType;

/// Minimum similarity for a typed category to be offered as a match.
const CATEGORY_MATCH_THRESHOLD: f64 = 0.7;

/// What the user wants to do with the current menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    RegenerateCourse(Course),
    RegenerateAll,
    ChangeProtein,
    Save,
    Quit,
}

/// Prompt for a headcount per requirements group.
pub fn prompt_population(groups: &[&str]) -> Result<PopulationBreakdown> {
    let mut population = PopulationBreakdown::new();

    for group in groups {
        let input: String = Input::new()
            .with_prompt(format!("How many people in group '{}'?", group))
            .default("0".to_string())
            .interact_text()?;

        let count: u32 = input
            .trim()
            .parse()
            .map_err(|_| MenuError::InvalidInput(format!("Invalid count: {}", input)))?;

        if count > 0 {
            population.set(group, count);
        }
    }

    Ok(population)
}

pub fn prompt_diet_type(current: DietType) -> Result<DietType> {
    let options: Vec<&str> = DietType::ALL.iter().map(|d| d.label()).collect();
    let default = DietType::ALL
        .iter()
        .position(|d| *d == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Diet type")
        .items(&options)
        .default(default)
        .interact()?;

    Ok(DietType::ALL[selection])
}

/// Known categories ranked by similarity to `input`, best first.
pub fn closest_categories<'a>(input: &str, categories: &[&'a str]) -> Vec<(&'a str, f64)> {
    let input = input.trim().to_lowercase();
    let mut candidates: Vec<(&str, f64)> = categories
        .iter()
        .map(|c| (*c, jaro_winkler(&c.to_lowercase(), &input)))
        .filter(|(_, score)| *score > CATEGORY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Prompt for the main course protein category with fuzzy matching.
///
/// Returns `None` if the user gives up without choosing.
pub fn prompt_protein_category(categories: &[&str], current: &str) -> Result<Option<String>> {
    println!("Known categories: {}", categories.join(", "));

    loop {
        let input: String = Input::new()
            .with_prompt("Main protein category (or press Enter to keep current)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        if let Some(exact) = categories.iter().find(|c| c.eq_ignore_ascii_case(input)) {
            return Ok(Some(exact.to_string()));
        }

        let candidates = closest_categories(input, categories);

        match candidates.as_slice() {
            [] => println!("No category matching '{}'", input),
            [(only, _)] => {
                let confirm = Confirm::new()
                    .with_prompt(format!("Did you mean '{}'?", only))
                    .default(true)
                    .interact()?;
                if confirm {
                    return Ok(Some(only.to_string()));
                }
            }
            many => {
                let mut options: Vec<String> =
                    many.iter().take(5).map(|(c, _)| c.to_string()).collect();
                options.push(format!("Keep '{}'", current));

                let selection = Select::new()
                    .with_prompt("Which did you mean?")
                    .items(&options)
                    .default(0)
                    .interact()?;

                if selection + 1 < options.len() {
                    return Ok(Some(options[selection].clone()));
                }
                return Ok(None);
            }
        }
    }
}

/// Ask what to do next with the menu.
pub fn prompt_session_action(courses: &[Course]) -> Result<SessionAction> {
    let options = [
        "Regenerate one course",
        "Regenerate all",
        "Change main protein category",
        "Save menu",
        "Quit",
    ];

    let selection = Select::new()
        .with_prompt("What next?")
        .items(&options[..])
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => SessionAction::RegenerateCourse(prompt_course(courses)?),
        1 => SessionAction::RegenerateAll,
        2 => SessionAction::ChangeProtein,
        3 => SessionAction::Save,
        _ => SessionAction::Quit,
    })
}

pub fn prompt_course(courses: &[Course]) -> Result<Course> {
    if courses.is_empty() {
        return Err(MenuError::InvalidInput("No courses configured".to_string()));
    }

    let labels: Vec<&str> = courses.iter().map(|c| c.label()).collect();
    let selection = Select::new()
        .with_prompt("Which course?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(courses[selection])
}

pub fn prompt_path(prompt: &str, default: &str) -> Result<String> {
    Ok(Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
