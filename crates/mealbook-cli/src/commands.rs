use std::ffi::OsString;
use std::io::{self, Write};

use anyhow::{Context, anyhow};
use clap::Parser;
use mealbook_core::catalog::{dietary_tag_counts, visible_meals};
use mealbook_core::filter::active_constraints;
use mealbook_core::{Catalog, Config, MealDto};
use tracing::{debug, info};

use crate::cli::{self, Command, FilterArgs, GlobalCli};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = GlobalCli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting mealbook CLI"
    );

    let cfg = Config::load(cli.config.as_deref())?;
    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| cfg.catalog.clone())
        .ok_or_else(|| anyhow!("no catalog given; pass --catalog or set `catalog` in mealbook.toml"))?;

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("failed to open catalog at {}", catalog_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(&catalog, &cli.command, &mut out)?;
    out.flush().context("failed to flush output")?;

    info!("done");
    Ok(())
}

pub fn dispatch<W: Write>(catalog: &Catalog, command: &Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::List(args) => list(catalog, args, out),
        Command::Tags(args) => tags(catalog, args, out),
    }
}

fn list<W: Write>(catalog: &Catalog, args: &FilterArgs, out: &mut W) -> anyhow::Result<()> {
    let filters = args.to_filter_state()?;
    let meals = visible_meals(&catalog.meals, &filters, args.archived);
    debug!(
        visible = meals.len(),
        constraints = active_constraints(&filters).len(),
        "listing meals"
    );

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &meals).context("failed to encode meals")?;
        writeln!(out)?;
        return Ok(());
    }

    for meal in &meals {
        writeln!(out, "{}", format_meal_line(catalog, meal))?;
    }
    Ok(())
}

fn tags<W: Write>(catalog: &Catalog, args: &FilterArgs, out: &mut W) -> anyhow::Result<()> {
    let filters = args.to_filter_state()?;
    let meals = visible_meals(&catalog.meals, &filters, args.archived);
    let counts = dietary_tag_counts(&meals, &catalog.dietary_tags);

    if args.json {
        let rows: Vec<serde_json::Value> = counts
            .iter()
            .map(|(tag, count)| serde_json::json!({ "id": tag.id, "label": tag.label, "count": count }))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &rows).context("failed to encode tags")?;
        writeln!(out)?;
        return Ok(());
    }

    for (tag, count) in counts {
        writeln!(out, "{:>4}  {} ({count})", tag.id, tag.label)?;
    }
    Ok(())
}

fn format_meal_line(catalog: &Catalog, meal: &MealDto) -> String {
    let category = meal.category.map(|c| c.label()).unwrap_or("—");
    let tags: Vec<&str> = meal
        .dietary_tags
        .iter()
        .filter_map(|id| catalog.tag_label(*id))
        .collect();
    format!(
        "{}\t{}\t${}.{:02}\t{}",
        meal.name,
        category,
        meal.price_cents / 100,
        meal.price_cents % 100,
        tags.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
      "dietary_tags": [{"id": 1, "label": "Vegetarian"}, {"id": 2, "label": "Vegan"}],
      "meals": [
        {"id": "5d0c7f39-1c59-4b57-8d49-6a1c0c3c9b01", "name": "Granola", "category": "Best for Breakfast",
         "price_cents": 550, "created_at": "2026-01-02T07:00:00Z", "dietary_tags": [1, 2]},
        {"id": "5d0c7f39-1c59-4b57-8d49-6a1c0c3c9b02", "name": "Club Sandwich", "category": "Best for Lunch",
         "price_cents": 1225, "created_at": "2026-01-03T12:00:00Z", "dietary_tags": []}
      ]
    }"#;

    fn render(command: Command) -> String {
        let catalog = Catalog::from_json_str(CATALOG).expect("catalog");
        let mut buf = Vec::new();
        dispatch(&catalog, &command, &mut buf).expect("dispatch");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn list_prints_newest_first_with_tag_labels() {
        let text = render(Command::List(FilterArgs::default()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Club Sandwich\tBest for Lunch\t$12.25\t");
        assert_eq!(lines[1], "Granola\tBest for Breakfast\t$5.50\tVegetarian, Vegan");
    }

    #[test]
    fn tags_count_visible_meals_only() {
        let args = FilterArgs {
            search: Some("club".to_string()),
            ..FilterArgs::default()
        };
        let text = render(Command::Tags(args));
        assert_eq!(text, "   1  Vegetarian (0)\n   2  Vegan (0)\n");
    }

    #[test]
    fn list_json_emits_meal_array() {
        let args = FilterArgs {
            tags: vec![2],
            json: true,
            ..FilterArgs::default()
        };
        let text = render(Command::List(args));
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|meal| meal["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Granola"]);
    }
}
