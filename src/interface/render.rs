use crate::error::MenuWarning;
use crate::models::{Course, Menu, Nutrient, NutrientTotals};
use crate::planner::{coverage, FitOutcome, NutritionSource};

/// Display the generated menu, one block per course.
pub fn display_menu(menu: &Menu, achieved: &NutrientTotals, target: Option<&NutrientTotals>) {
    if menu.is_empty() {
        println!("No menu generated.");
        return;
    }

    println!();
    println!("=== Daily Menu ===");
    println!();

    for (course, dish) in menu.iter() {
        if dish.is_placeholder() {
            println!("[{}] {}", course, dish.name);
            continue;
        }
        println!("[{}] {} ({} g)", course, dish.name, dish.total_grams());

        let width = dish
            .ingredients
            .iter()
            .map(|i| i.name.len())
            .max()
            .unwrap_or(10);

        for (ingredient, grams) in dish.items() {
            let n = ingredient.nutrition_for(grams);
            println!(
                "    {:<width$} {:>4} g | {:>6.1} kcal  P {:>5.1}  F {:>5.1}  C {:>5.1}",
                ingredient.name,
                grams,
                n.calories,
                n.protein,
                n.fat,
                n.carbohydrate,
                width = width
            );
        }
    }

    println!();
    display_totals(achieved, target);
}

/// Achieved totals, with per-nutrient coverage when a target is known.
pub fn display_totals(achieved: &NutrientTotals, target: Option<&NutrientTotals>) {
    println!("--- Nutrition ---");

    match target {
        Some(target) => {
            for (nutrient, percent) in coverage(achieved, target) {
                println!(
                    "{:<13} {:>8.1} / {:>8.1} {:<4} ({:>5.1}%)",
                    nutrient.key(),
                    achieved.get(nutrient),
                    target.get(nutrient),
                    nutrient.unit(),
                    percent
                );
            }
        }
        None => {
            for nutrient in Nutrient::ALL {
                println!(
                    "{:<13} {:>8.1} {}",
                    nutrient.key(),
                    achieved.get(nutrient),
                    nutrient.unit()
                );
            }
        }
    }

    println!();
}

/// Display the candidates accepted by the fit checker.
pub fn display_fit_outcome<T: NutritionSource>(outcome: &FitOutcome<'_, T>, ceiling: &NutrientTotals) {
    println!();
    println!("=== Selected ({} items) ===", outcome.selected.len());
    println!();

    for (i, candidate) in outcome.selected.iter().enumerate() {
        let calories = candidate
            .nutrition_totals()
            .map(|n| n.calories)
            .unwrap_or(0.0);
        println!("{:>3}. {} - {:.0} kcal", i + 1, candidate.label(), calories);
    }

    println!();
    display_totals(&outcome.achieved, Some(ceiling));

    if outcome.is_infeasible() {
        println!("Requirement not met: the candidates cannot reach every nutrient without exceeding another.");
        println!();
    }
}

/// Courses the fit left out because they would push a nutrient over the ceiling.
pub fn display_rejected_courses(courses: &[Course]) {
    if courses.is_empty() {
        return;
    }

    let labels: Vec<&str> = courses.iter().map(|c| c.label()).collect();
    println!("Over the ceiling: {}", labels.join(", "));
    println!();
}

pub fn display_warnings(warnings: &[MenuWarning]) {
    if warnings.is_empty() {
        return;
    }

    println!("--- Warnings ({}) ---", warnings.len());
    for warning in warnings {
        println!("  {}", warning);
    }
    println!();
}
