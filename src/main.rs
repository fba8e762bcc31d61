use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

use daily_menu_rs::cli::{regeneration_override, Cli, Command, PlanArgs};
use daily_menu_rs::error::{MenuError, Result};
use daily_menu_rs::interface::{
    display_fit_outcome, display_menu, display_rejected_courses, display_warnings, prompt_diet_type, prompt_path,
    prompt_population, prompt_protein_category, prompt_session_action, prompt_yes_no,
    SessionAction,
};
use daily_menu_rs::logging::init_logging;
use daily_menu_rs::models::{Course, NutrientTotals, PopulationBreakdown};
use daily_menu_rs::planner::{
    arrange_candidates, build_menu, fill_missing_nutrition, required_nutrition, CandidateOrder,
    MenuConfig, RequirementsTable,
};
use daily_menu_rs::state::{
    load_catalog, load_config, load_population, load_recipes, load_requirements, save_menu,
    save_recipes, write_menu_csv, Catalog, MenuBuildSession,
};

fn main() {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&mut cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &mut Cli) -> Result<()> {
    let command = cli.command.take().unwrap_or_default();

    match command {
        Command::Plan(args) => cmd_plan(cli, args),
        Command::Fit {
            recipes,
            population,
            order,
            seed,
        } => cmd_fit(cli, &recipes, population.as_deref(), order.map(Into::into), seed),
        Command::Nutrition { recipes, output } => cmd_nutrition(&cli.file, &recipes, &output),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn menu_config(cli: &Cli) -> Result<MenuConfig> {
    match &cli.config {
        Some(path) => load_config(path),
        None => Ok(MenuConfig::default()),
    }
}

/// Requirements table, or `None` when the file is absent.
fn requirements(cli: &Cli) -> Result<Option<RequirementsTable>> {
    let path = Path::new(&cli.requirements);
    if !path.exists() {
        eprintln!("Requirements file not found: {}", cli.requirements);
        return Ok(None);
    }
    load_requirements(path).map(Some)
}

/// Population from a file, or prompted once per requirements group.
fn resolve_population(file: Option<&str>, table: Option<&RequirementsTable>) -> Result<PopulationBreakdown> {
    if let Some(file) = file {
        return load_population(file);
    }

    let groups: Vec<&str> = table.map(|t| t.groups().collect()).unwrap_or_default();
    if groups.is_empty() {
        return Err(MenuError::InvalidInput(
            "no requirement groups to prompt for; pass --population".to_string(),
        ));
    }
    prompt_population(&groups)
}

fn compute_ceiling(
    cli: &Cli,
    table: Option<&RequirementsTable>,
    population: &PopulationBreakdown,
) -> Result<Option<NutrientTotals>> {
    let basis = cli.meal_basis();
    basis.validate()?;
    Ok(table.map(|t| required_nutrition(population, t, &basis)))
}

/// Build a menu, then let the user regenerate courses until they quit.
fn cmd_plan(cli: &Cli, args: PlanArgs) -> Result<()> {
    let path = Path::new(&cli.file);

    if !path.exists() {
        eprintln!("Ingredient catalog not found: {}", cli.file);
        eprintln!("Please ensure ingredients.json exists in the current directory.");
        return Ok(());
    }

    let catalog = load_catalog(path)?;
    println!("Loaded {} ingredients", catalog.len());

    let mut config = menu_config(cli)?;
    match args.diet {
        Some(diet) => config.diet = diet.into(),
        None if !args.no_interactive => config.diet = prompt_diet_type(config.diet)?,
        None => {}
    }
    if let Some(protein) = &args.protein {
        config.main_protein_category = protein.clone();
    }
    if let Some(policy) = regeneration_override(args.release_replaced) {
        config.regeneration = policy;
    }

    let table = requirements(cli)?;
    let population = resolve_population(args.population.as_deref(), table.as_ref())?;
    let target = compute_ceiling(cli, table.as_ref(), &population)?;

    println!(
        "Planning for {} people, diet {}, main protein '{}'",
        population.total(),
        config.diet,
        config.main_protein_category
    );

    let mut session = MenuBuildSession::new(&catalog, config, population, make_rng(args.seed))?;
    session.regenerate_all()?;
    show_menu(&session, target.as_ref());
    display_warnings(session.warnings());

    if args.no_interactive {
        return export(&session, &args, target);
    }

    plan_loop(&mut session, &catalog, &args, target)
}

/// Show the menu, then its fit against the ceiling when one is known.
fn show_menu(session: &MenuBuildSession<'_, StdRng>, target: Option<&NutrientTotals>) {
    display_menu(session.menu(), &session.achieved(), target);

    if let Some(ceiling) = target {
        let outcome = session.fit_against(ceiling);
        display_fit_outcome(&outcome, ceiling);
        display_rejected_courses(&session.rejected_courses(ceiling));
    }
}

fn plan_loop(
    session: &mut MenuBuildSession<'_, StdRng>,
    catalog: &Catalog,
    args: &PlanArgs,
    target: Option<NutrientTotals>,
) -> Result<()> {
    loop {
        let courses = session.config().courses_in_order();
        let shown = session.warnings().len();

        match prompt_session_action(&courses)? {
            SessionAction::RegenerateCourse(course) => {
                session.regenerate(course)?;
            }
            SessionAction::RegenerateAll => {
                session.regenerate_all()?;
            }
            SessionAction::ChangeProtein => {
                let categories = catalog.categories();
                let current = session.config().main_protein_category.clone();
                let Some(category) = prompt_protein_category(&categories, &current)? else {
                    continue;
                };
                session.set_main_protein_category(&category);
                if session.config().course(Course::Main).is_some() {
                    session.regenerate(Course::Main)?;
                }
            }
            SessionAction::Save => {
                save_interactive(session, args, target)?;
                continue;
            }
            SessionAction::Quit => {
                if prompt_yes_no("Save the menu before quitting?", false)? {
                    save_interactive(session, args, target)?;
                }
                break;
            }
        }

        show_menu(session, target.as_ref());
        let new_warnings = session.warnings().get(shown..).unwrap_or(session.warnings());
        display_warnings(new_warnings);
    }

    Ok(())
}

fn save_interactive(
    session: &MenuBuildSession<'_, StdRng>,
    args: &PlanArgs,
    target: Option<NutrientTotals>,
) -> Result<()> {
    let default = args.output.as_deref().unwrap_or("menu.json");
    let out = prompt_path("Save menu to", default)?;
    save_menu(&out, &session.snapshot(target))?;
    println!("Menu saved to {}", out);
    if let Some(csv) = &args.csv {
        write_menu_csv(csv, session.menu())?;
        println!("Menu CSV written to {}", csv);
    }
    Ok(())
}

fn export(
    session: &MenuBuildSession<'_, StdRng>,
    args: &PlanArgs,
    target: Option<NutrientTotals>,
) -> Result<()> {
    if let Some(out) = &args.output {
        save_menu(out, &session.snapshot(target))?;
        println!("Menu saved to {}", out);
    }
    if let Some(csv) = &args.csv {
        write_menu_csv(csv, session.menu())?;
        println!("Menu CSV written to {}", csv);
    }
    Ok(())
}

/// Greedy recipe selection under the group ceiling.
fn cmd_fit(
    cli: &Cli,
    recipes_path: &str,
    population_file: Option<&str>,
    order: Option<CandidateOrder>,
    seed: Option<u64>,
) -> Result<()> {
    let mut recipes = load_recipes(recipes_path)?;
    println!("Loaded {} recipes", recipes.len());

    let mut warnings = Vec::new();
    if Path::new(&cli.file).exists() {
        let catalog = load_catalog(&cli.file)?;
        let (filled, fill_warnings) = fill_missing_nutrition(&mut recipes, &catalog);
        info!(filled, "computed missing recipe nutrition");
        warnings.extend(fill_warnings);
    }

    let Some(table) = requirements(cli)? else {
        return Ok(());
    };
    let population = resolve_population(population_file, Some(&table))?;
    let Some(ceiling) = compute_ceiling(cli, Some(&table), &population)? else {
        return Ok(());
    };

    let order = match order {
        Some(order) => order,
        None => menu_config(cli)?.candidate_order,
    };
    let mut rng = make_rng(seed);
    let arranged = arrange_candidates(&recipes, order, &mut rng);
    let outcome = build_menu(&ceiling, arranged);

    display_fit_outcome(&outcome, &ceiling);
    warnings.extend(outcome.warnings.iter().cloned());
    display_warnings(&warnings);

    Ok(())
}

/// Compute nutrition for recipes lacking it and write all recipes out.
fn cmd_nutrition(catalog_path: &str, recipes_path: &str, output: &str) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let mut recipes = load_recipes(recipes_path)?;

    let (filled, warnings) = fill_missing_nutrition(&mut recipes, &catalog);
    save_recipes(output, &recipes)?;

    println!(
        "Computed nutrition for {} of {} recipes. Written to {}",
        filled,
        recipes.len(),
        output
    );
    display_warnings(&warnings);

    Ok(())
}
