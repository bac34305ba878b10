use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use interaction::DeclusterConfig;
use layers::jitter::jitter_items;
use layers::spiral::spiral_offsets;
use scene::item::MapItem;
use scene::query::available_categories;
use serde::Serialize;
use tools::{ReplayOptions, Scenario, ToolError, replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay and inspect map marker declustering")]
struct Args {
    /// JSON config overriding the built-in defaults
    #[arg(long, global = true, env = "DECLUTTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a recorded scenario through the controller and print events and the final frame
    Replay {
        scenario: PathBuf,

        /// Spread items sharing a coordinate before handing them over
        #[arg(long)]
        jitter: bool,
    },

    /// Print golden-angle spiral offsets in degrees
    Spiral {
        #[arg(long)]
        count: usize,

        /// Anchor latitude
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lat: f64,

        /// Spiral step in meters
        #[arg(long, default_value_t = 35.0)]
        step: f64,
    },

    /// Print items with stacked coordinates spread apart
    Jitter { items: PathBuf },

    /// List the distinct categories present in an item file
    Categories { items: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), ToolError> {
    let config = match &args.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            DeclusterConfig::load(path)?
        }
        None => DeclusterConfig::default(),
    };

    match args.command {
        Command::Replay { scenario, jitter } => {
            let scenario = Scenario::load(&scenario)?;
            let report = replay(&scenario, config, ReplayOptions { jitter });
            info!(
                "replayed {} steps, {} events",
                scenario.events.len(),
                report.events.len()
            );
            print_json(&report)
        }
        Command::Spiral { count, lat, step } => {
            print_json(&spiral_offsets(count, lat, step, &config.spiral))
        }
        Command::Jitter { items } => {
            let items = read_items(&items)?;
            print_json(&jitter_items(&items, &config.jitter))
        }
        Command::Categories { items } => {
            let items = read_items(&items)?;
            print_json(&available_categories(&items))
        }
    }
}

fn read_items(path: &Path) -> Result<Vec<MapItem>, ToolError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ToolError::Io(format!("read {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ToolError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out).map_err(|e| ToolError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, read_items};
    use clap::Parser;
    use scene::query::available_categories;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn parses_replay_with_global_config() {
        let args = Args::try_parse_from([
            "declutter", "replay", "s.json", "--jitter", "--config", "c.json",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
        assert!(matches!(
            args.command,
            Command::Replay { jitter: true, .. }
        ));
    }

    #[test]
    fn parses_spiral_with_negative_latitude() {
        let args = Args::try_parse_from([
            "declutter", "spiral", "--count", "5", "--lat", "-33.4", "--step", "64",
        ])
        .unwrap();
        match args.command {
            Command::Spiral { count, lat, step } => {
                assert_eq!((count, lat, step), (5, -33.4, 64.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn spiral_requires_count() {
        assert!(Args::try_parse_from(["declutter", "spiral"]).is_err());
    }

    #[test]
    fn reads_item_arrays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{ "id": "a", "latitude": 1.5, "longitude": 2.5, "category": "cooking" }}]"#
        )
        .unwrap();
        let items = read_items(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "cooking");
    }

    #[test]
    fn config_path_falls_back_to_environment() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("DECLUTTER_CONFIG", "from-env.json") };
        let from_env = Args::try_parse_from(["declutter", "spiral", "--count", "3"]).unwrap();
        let explicit = Args::try_parse_from([
            "declutter", "spiral", "--count", "3", "--config", "flag.json",
        ])
        .unwrap();
        unsafe { std::env::remove_var("DECLUTTER_CONFIG") };

        assert_eq!(from_env.config, Some(PathBuf::from("from-env.json")));
        assert_eq!(explicit.config, Some(PathBuf::from("flag.json")));
    }

    #[test]
    fn categories_command_lists_distinct_sorted_names() {
        let args = Args::try_parse_from(["declutter", "categories", "items.json"]).unwrap();
        assert!(matches!(args.command, Command::Categories { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "id": "a", "latitude": 1.0, "longitude": 2.0, "category": "plumbing" }},
                {{ "id": "b", "latitude": 1.0, "longitude": 2.0, "category": "cleaning" }},
                {{ "id": "c", "latitude": 1.0, "longitude": 2.0, "category": "plumbing" }},
                {{ "id": "d", "latitude": 1.0, "longitude": 2.0 }}
            ]"#
        )
        .unwrap();
        let items = read_items(file.path()).unwrap();
        assert_eq!(available_categories(&items), vec!["cleaning", "plumbing"]);
    }
}
