use clap::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use menu_planner_rs::catalog::{
    Dataset, load_dataset, load_on_hand, load_plan, save_plan, write_plan_csv, write_shopping_csv,
};
use menu_planner_rs::cli::{Cli, Command};
use menu_planner_rs::config::{EngineConfig, load_config};
use menu_planner_rs::error::Result;
use menu_planner_rs::interface::{
    collect_profile, confirm_on_hand_names, display_classes, display_model_stats,
    display_nutrient_summary, display_outcome, display_shopping_list, display_week_plan,
    known_age_brackets, parse_on_hand_pair, prompt_activity, prompt_age_bracket, prompt_sex,
};
use menu_planner_rs::logging::init_logging;
use menu_planner_rs::models::{ActivityLevel, Sex, UserProfile};
use menu_planner_rs::planner::{
    MicroLpSolver, PlanRequest, prepare_model, solve_prepared, summarize_plan,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan {
            age,
            sex,
            activity,
            menstruating,
            on_hand,
            have,
            json,
            csv,
            dump_lp,
        } => {
            let options = PlanOptions {
                age,
                sex,
                activity,
                menstruating,
                on_hand,
                have,
                json,
                csv,
                dump_lp,
            };
            cmd_plan(&cli.data, &config, options)
        }
        Command::Shopping { plan, csv } => cmd_shopping(&cli.data, &config, &plan, csv.as_deref()),
        Command::Classes => cmd_classes(&cli.data),
    }
}

struct PlanOptions {
    age: Option<String>,
    sex: Option<Sex>,
    activity: Option<ActivityLevel>,
    menstruating: bool,
    on_hand: Option<String>,
    have: Vec<String>,
    json: Option<String>,
    csv: Option<String>,
    dump_lp: Option<String>,
}

fn load_data(file_path: &str) -> Result<Option<Dataset>> {
    let path = Path::new(file_path);
    if !path.exists() {
        eprintln!("Dataset file not found: {}", file_path);
        eprintln!("Pass --data with a JSON file holding recipes, ingredients and targets.");
        return Ok(None);
    }
    Ok(Some(load_dataset(path)?))
}

/// Build the profile from flags, prompting for whatever is missing.
fn resolve_profile(dataset: &Dataset, options: &PlanOptions) -> Result<UserProfile> {
    if options.age.is_none() && options.sex.is_none() && options.activity.is_none() {
        return collect_profile(&dataset.targets);
    }

    let age_bracket = match &options.age {
        Some(age) => age.clone(),
        None => prompt_age_bracket(&known_age_brackets(&dataset.targets))?,
    };
    let sex = match options.sex {
        Some(sex) => sex,
        None => prompt_sex()?,
    };
    let activity = match options.activity {
        Some(activity) => activity,
        None => prompt_activity()?,
    };

    Ok(UserProfile {
        age_bracket,
        sex,
        activity,
        menstruating: options.menstruating,
    })
}

/// Plan a week for one profile.
fn cmd_plan(file_path: &str, config: &EngineConfig, options: PlanOptions) -> Result<()> {
    let Some(dataset) = load_data(file_path)? else {
        return Ok(());
    };
    let catalog = dataset.catalog();
    let per_role: Vec<String> = catalog
        .role_counts()
        .iter()
        .map(|(role, n)| format!("{} {}", n, role))
        .collect();
    println!(
        "Loaded {} recipes ({}), {} targets",
        catalog.len(),
        per_role.join(", "),
        dataset.targets.len()
    );

    let profile = resolve_profile(&dataset, &options)?;

    let mut on_hand: BTreeMap<String, f64> = match &options.on_hand {
        Some(path) => load_on_hand(path)?,
        None => BTreeMap::new(),
    };
    for pair in &options.have {
        let (name, grams) = parse_on_hand_pair(pair)?;
        *on_hand.entry(name).or_insert(0.0) += grams;
    }
    if !on_hand.is_empty() {
        let mut known = catalog.raw_ingredient_names();
        known.extend(catalog.ingredients().iter().flat_map(|i| i.names()));
        known.sort_unstable();
        known.dedup();
        on_hand = confirm_on_hand_names(on_hand, &known)?;
    }

    let recipes = catalog.to_recipes();
    let request = PlanRequest {
        profile: &profile,
        recipes: &recipes,
        ingredients: catalog.ingredients(),
        targets: &dataset.targets,
        on_hand: &on_hand,
        config,
    };

    if let Some(lp_path) = &options.dump_lp {
        let prepared = prepare_model(&request)?;
        display_model_stats(&prepared.menu.stats);
        fs::write(lp_path, prepared.menu.model.to_lp_string())?;
        println!("Model written to {}", lp_path);
        return Ok(());
    }

    println!("Planning for {}...", profile.key());
    let prepared = prepare_model(&request)?;
    display_model_stats(&prepared.menu.stats);

    let outcome = solve_prepared(&request, &prepared, &MicroLpSolver::new())?;

    display_week_plan(&outcome.plan, &catalog);
    display_nutrient_summary(&outcome.plan, &catalog, &prepared.bounds);
    display_outcome(&outcome);

    if let Some(path) = &options.json {
        save_plan(path, &outcome.plan)?;
        println!("Plan saved to {}", path);
    }
    if let Some(path) = &options.csv {
        write_plan_csv(path, &outcome.plan, &catalog)?;
        println!("Plan written to {}", path);
    }

    Ok(())
}

/// Aggregate a saved plan into a shopping list.
fn cmd_shopping(file_path: &str, config: &EngineConfig, plan_path: &str, csv: Option<&str>) -> Result<()> {
    let Some(dataset) = load_data(file_path)? else {
        return Ok(());
    };
    let catalog = dataset.catalog();
    let plan = load_plan(plan_path)?;

    let list = summarize_plan(&plan, &catalog, &catalog.resolver(), config.packaging_unit)?;
    display_shopping_list(&list);

    if let Some(path) = csv {
        write_shopping_csv(path, &list)?;
        println!("Shopping list written to {}", path);
    }
    Ok(())
}

/// List ingredient equivalence classes.
fn cmd_classes(file_path: &str) -> Result<()> {
    let Some(dataset) = load_data(file_path)? else {
        return Ok(());
    };
    let resolver = dataset.catalog().resolver();
    display_classes(&resolver.classes());
    Ok(())
}
