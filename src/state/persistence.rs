use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{MenuError, Result};
use crate::models::{IngredientRecord, Menu, MenuSnapshot, PopulationBreakdown, RecipeRecord};
use crate::planner::{MenuConfig, RequirementsTable};
use crate::state::Catalog;

/// Read and parse a catalog file, reporting any failure as a catalog load error.
fn read_catalog_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| MenuError::catalog_load(&display, e))?;
    serde_json::from_str(&content).map_err(|e| MenuError::catalog_load(&display, e))
}

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: serde::Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load and index the ingredient catalog.
///
/// Fails on a missing, unreadable, malformed or empty file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let records: Vec<IngredientRecord> = read_catalog_file(path)?;
    let catalog = Catalog::new(records).map_err(|e| match e {
        MenuError::CatalogLoad { reason, .. } => {
            MenuError::catalog_load(path.display().to_string(), reason)
        }
        other => other,
    })?;
    info!(path = %path.display(), count = catalog.len(), "loaded ingredient catalog");
    for record in catalog.iter() {
        debug!("{}", record.debug_string());
    }
    Ok(catalog)
}

/// Load recipes. An empty list is a load failure.
pub fn load_recipes<P: AsRef<Path>>(path: P) -> Result<Vec<RecipeRecord>> {
    let path = path.as_ref();
    let recipes: Vec<RecipeRecord> = read_catalog_file(path)?;
    if recipes.is_empty() {
        return Err(MenuError::catalog_load(
            path.display().to_string(),
            "no recipe records",
        ));
    }
    info!(path = %path.display(), count = recipes.len(), "loaded recipes");
    Ok(recipes)
}

pub fn save_recipes<P: AsRef<Path>>(path: P, recipes: &[RecipeRecord]) -> Result<()> {
    write_json(path, recipes)
}

pub fn load_requirements<P: AsRef<Path>>(path: P) -> Result<RequirementsTable> {
    read_json(path)
}

pub fn load_population<P: AsRef<Path>>(path: P) -> Result<PopulationBreakdown> {
    read_json(path)
}

/// Load a menu configuration and validate it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MenuConfig> {
    let config: MenuConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

pub fn save_menu<P: AsRef<Path>>(path: P, snapshot: &MenuSnapshot) -> Result<()> {
    write_json(path, snapshot)
}

pub fn load_menu<P: AsRef<Path>>(path: P) -> Result<MenuSnapshot> {
    read_json(path)
}

/// One row per course and ingredient, in menu order.
pub fn write_menu_csv<P: AsRef<Path>>(path: P, menu: &Menu) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "course",
        "dish",
        "ingredient",
        "grams",
        "calories",
        "protein",
        "fat",
        "carbohydrate",
    ])?;

    for (course, dish) in menu.iter() {
        for (ingredient, grams) in dish.items() {
            let n = ingredient.nutrition_for(grams);
            wtr.write_record([
                course.label().to_string(),
                dish.name.clone(),
                ingredient.name.clone(),
                grams.to_string(),
                format!("{:.1}", n.calories),
                format!("{:.1}", n.protein),
                format!("{:.1}", n.fat),
                format!("{:.1}", n.carbohydrate),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Dish, NutrientTotals};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_catalog() {
        let file = temp_file(
            r#"[
                {"ingredient": " Rice ", "aliases": "white rice, steamed rice", "category": "staple",
                 "diet_class": "vegan",
                 "nutrition_per_100g": {"calories": 130, "protein": 2.4, "fat": 0.3, "carbohydrate": 28.2}},
                {"ingredient": "Chicken", "aliases": ["chicken breast"], "category": "meat"}
            ]"#,
        );

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve("steamed rice").unwrap().name, "Rice");
        assert_eq!(
            catalog.resolve("chicken breast").unwrap().nutrition_per_100g,
            NutrientTotals::zero()
        );
    }

    #[test]
    fn test_missing_catalog_is_load_failure() {
        let err = load_catalog("/nonexistent/ingredients.json").unwrap_err();
        assert!(matches!(err, MenuError::CatalogLoad { .. }));
    }

    #[test]
    fn test_malformed_and_empty_catalog_are_load_failures() {
        let malformed = temp_file("{not json");
        assert!(matches!(
            load_catalog(malformed.path()),
            Err(MenuError::CatalogLoad { .. })
        ));

        let empty = temp_file("[]");
        match load_catalog(empty.path()) {
            Err(MenuError::CatalogLoad { path, .. }) => {
                assert_eq!(path, empty.path().display().to_string())
            }
            other => panic!("expected catalog load failure, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_recipes_roundtrip_with_nutrition() {
        let file = temp_file(r#"[{"name": "Rice bowl", "ingredients": {"rice": 200}}]"#);
        let mut recipes = load_recipes(file.path()).unwrap();
        recipes[0].set_nutrition(NutrientTotals::new(260.0, 4.8, 0.6, 56.4));

        let out = NamedTempFile::new().unwrap();
        save_recipes(out.path(), &recipes).unwrap();
        let reloaded = load_recipes(out.path()).unwrap();
        assert_eq!(reloaded[0].nutrition_totals(), recipes[0].nutrition_totals());
    }

    #[test]
    fn test_rewritten_recipes_keep_source_fields() {
        let file = temp_file(
            r#"[{"recipe": "Fried rice", "category": "main", "servings": 4,
                 "ingredients": {"rice": 200, "egg": 50, "carrot": 30}}]"#,
        );
        let mut recipes = load_recipes(file.path()).unwrap();
        recipes[0].set_nutrition(NutrientTotals::new(400.0, 12.0, 8.0, 60.0));

        let out = NamedTempFile::new().unwrap();
        save_recipes(out.path(), &recipes).unwrap();
        let text = fs::read_to_string(out.path()).unwrap();
        assert!(text.contains("\"servings\": 4"));
        assert!(text.contains("\"category\": \"main\""));
        assert!(text.contains("\"recipe\": \"Fried rice\""));
        assert!(!text.contains("\"name\""));

        let rice = text.find("\"rice\"").unwrap();
        let egg = text.find("\"egg\"").unwrap();
        let carrot = text.find("\"carrot\"").unwrap();
        assert!(rice < egg && egg < carrot);

        let reloaded = load_recipes(out.path()).unwrap();
        assert_eq!(reloaded, recipes);
    }

    #[test]
    fn test_menu_snapshot_roundtrip_and_csv() {
        let mut dish = Dish::new("Main - chicken with carrot".to_string());
        dish.push(
            IngredientRecord::new("chicken", NutrientTotals::new(165.0, 31.0, 3.6, 0.0)),
            200,
        );
        dish.push(
            IngredientRecord::new("carrot", NutrientTotals::new(41.0, 0.9, 0.2, 9.6)),
            50,
        );
        let mut menu = Menu::new();
        menu.set(Course::Main, dish);
        let snapshot = MenuSnapshot {
            achieved: menu.nutrition(),
            menu,
            ceiling: None,
        };

        let json = NamedTempFile::new().unwrap();
        save_menu(json.path(), &snapshot).unwrap();
        assert_eq!(load_menu(json.path()).unwrap(), snapshot);

        let csv_file = NamedTempFile::new().unwrap();
        write_menu_csv(csv_file.path(), &snapshot.menu).unwrap();
        let content = fs::read_to_string(csv_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Main,Main - chicken with carrot,chicken,200,330.0"));
        assert!(lines[2].contains(",carrot,50,"));
    }

    #[test]
    fn test_population_and_config() {
        let population = temp_file(r#"{"adult": 3, "child": 2}"#);
        assert_eq!(load_population(population.path()).unwrap().total(), 5);

        let config = temp_file(r#"{"reference_population": 0}"#);
        assert!(matches!(
            load_config(config.path()),
            Err(MenuError::InvalidInput(_))
        ));
    }
}
