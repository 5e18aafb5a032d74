//! Utility to set planner settings from the command line
//!
//! Usage: set_settings [--weight N] [--goal KCAL] [--interval HOURS] [--units metric|imperial]

use std::path::PathBuf;

use macroplan::tools::settings;

fn get_database_path() -> PathBuf {
    std::env::var("MACROPLAN_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(root) = path.parent().and_then(|p| p.parent()) {
                    path = root.to_path_buf();
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("macroplan.db");
            path
        })
}

#[derive(Default)]
struct Args {
    weight: Option<f64>,
    goal: Option<f64>,
    interval: Option<f64>,
    units: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        let number = || {
            value
                .parse::<f64>()
                .map_err(|_| format!("Invalid number for {}: {}", flag, value))
        };
        match flag.as_str() {
            "--weight" => args.weight = Some(number()?),
            "--goal" => args.goal = Some(number()?),
            "--interval" => args.interval = Some(number()?),
            "--units" => args.units = Some(value.clone()),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = macroplan::db::Database::open_migrated(&db_path)?;

    let updated = settings::update_settings(
        &database,
        args.weight,
        args.goal,
        args.interval,
        args.units.as_deref(),
    )?;

    println!("Settings saved:");
    println!("  Weight: {} {}", updated.weight, updated.weight_unit);
    println!("  Base goal: {} kcal", updated.base_goal_calories);
    println!("  Meal interval: {} h", updated.meal_interval);
    println!("  Units: {}", updated.unit_system.as_str());

    Ok(())
}
