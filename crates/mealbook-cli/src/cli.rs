use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use mealbook_core::filter;
use mealbook_core::{CategoryChoice, FilterState, SortDirection, SortKey};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mealbook",
    version,
    about = "Browse and filter a meal catalog"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "catalog", global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List meals matching the given filters.
    List(FilterArgs),
    /// Show dietary tags with the number of matching meals.
    Tags(FilterArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Category label or key, or "all".
    #[arg(short = 'c', long = "category")]
    pub category: Option<String>,

    /// name, created_at or price.
    #[arg(long = "sort")]
    pub sort: Option<String>,

    /// asc or desc.
    #[arg(long = "direction")]
    pub direction: Option<String>,

    #[arg(short = 't', long = "tag", action = ArgAction::Append)]
    pub tags: Vec<u32>,

    #[arg(long = "archived")]
    pub archived: bool,

    #[arg(long = "json")]
    pub json: bool,
}

impl FilterArgs {
    /// Builds the committed filter by replaying the flags as UI actions.
    pub fn to_filter_state(&self) -> anyhow::Result<FilterState> {
        let mut state = FilterState::default();

        if let Some(search) = self.search.as_deref() {
            state = filter::with_search(&state, search);
        }

        if let Some(raw) = self.category.as_deref() {
            let choice = CategoryChoice::parse(raw)
                .ok_or_else(|| anyhow!("unknown category: {raw}"))?;
            state = filter::select_category(&state, choice);
        }

        match (self.sort.as_deref(), self.direction.as_deref()) {
            (Some(key), Some(direction)) => {
                state = filter::change_sort(
                    &state,
                    SortKey::from(key),
                    SortDirection::from(direction),
                );
            }
            (Some(key), None) => {
                state = filter::pick_sort_key(&state, SortKey::from(key));
            }
            (None, Some(direction)) => {
                let (key, _) = filter::effective_sort(&state);
                state = filter::change_sort(&state, key, SortDirection::from(direction));
            }
            (None, None) => {}
        }

        for tag in &self.tags {
            if !filter::is_tag_selected(&state, *tag) {
                state = filter::toggle_dietary_tag(&state, *tag);
            }
        }

        debug!(?state, "filter built from arguments");
        Ok(state)
    }
}

/// Crates whose events follow `-v`/`-q`; everything else stays at `warn`.
const OWN_TARGETS: &[&str] = &["mealbook", "mealbook_core"];

pub fn verbosity_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) => "warn",
        (0, 3..) => "trace",
        (0, 2) => "debug",
        (0, 1) => "info",
        (0, 0) => "warn",
    }
}

pub fn default_directives(verbose: u8, quiet: u8) -> String {
    let level = verbosity_level(verbose, quiet);
    let base = if level == "error" { "error" } else { "warn" };
    OWN_TARGETS
        .iter()
        .fold(base.to_string(), |mut acc, target| {
            acc.push_str(&format!(",{target}={level}"));
            acc
        })
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let directives = default_directives(verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .map_err(|e| anyhow!("invalid log filter {directives:?}: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(verbose > 0)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already installed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use mealbook_core::MealCategory;

    use super::*;

    fn parse(args: &[&str]) -> GlobalCli {
        GlobalCli::try_parse_from(args).expect("args parse")
    }

    fn filter_args(cli: GlobalCli) -> FilterArgs {
        match cli.command {
            Command::List(args) | Command::Tags(args) => args,
        }
    }

    #[test]
    fn no_flags_build_the_empty_filter() {
        let args = filter_args(parse(&["mealbook", "list"]));
        assert_eq!(
            args.to_filter_state().expect("filter"),
            FilterState::default()
        );
    }

    #[test]
    fn flags_replay_as_filter_actions() {
        let args = filter_args(parse(&[
            "mealbook",
            "list",
            "--search",
            "  Pancakes ",
            "--category",
            "breakfast",
            "--sort",
            "price",
            "-t",
            "3",
            "-t",
            "1",
            "-t",
            "3",
        ]));
        let state = args.to_filter_state().expect("filter");
        assert_eq!(state.search.as_deref(), Some("Pancakes"));
        assert_eq!(state.category, Some(MealCategory::BestForBreakfast));
        assert_eq!(state.sort_by, Some(SortKey::Price));
        assert_eq!(state.sort_direction, Some(SortDirection::Desc));
        assert_eq!(state.dietary_tags, Some(vec![3, 1]));
    }

    #[test]
    fn direction_alone_keeps_default_key() {
        let args = filter_args(parse(&["mealbook", "list", "--direction", "asc"]));
        let state = args.to_filter_state().expect("filter");
        assert_eq!(state.sort_by, Some(SortKey::CreatedAt));
        assert_eq!(state.sort_direction, Some(SortDirection::Asc));
    }

    #[test]
    fn all_category_means_no_category() {
        let args = filter_args(parse(&["mealbook", "tags", "--category", "all"]));
        assert_eq!(args.to_filter_state().expect("filter").category, None);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let args = filter_args(parse(&["mealbook", "list", "--category", "brunch"]));
        let err = args.to_filter_state().expect_err("unknown category");
        assert!(err.to_string().contains("brunch"));
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(verbosity_level(0, 0), "warn");
        assert_eq!(verbosity_level(1, 0), "info");
        assert_eq!(verbosity_level(5, 0), "trace");
        assert_eq!(verbosity_level(3, 1), "warn");
        assert_eq!(verbosity_level(3, 2), "error");
    }

    #[test]
    fn verbosity_only_raises_mealbook_targets() {
        assert_eq!(
            default_directives(2, 0),
            "warn,mealbook=debug,mealbook_core=debug"
        );
        assert_eq!(
            default_directives(0, 2),
            "error,mealbook=error,mealbook_core=error"
        );
    }
}
