//! `roadmap-view` command-line front end

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use roadmap_graph::{RankDirection, RoadmapSnapshot};
use roadmap_view::{layout_snapshot, ViewConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("roadmap-view")
        .version(roadmap_view::VERSION)
        .about("Lay out learning roadmaps as layered graphs")
        .subcommand_required(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, overrides RUST_LOG (e.g. debug, roadmap_graph=trace)"),
        )
        .subcommand(
            Command::new("layout")
                .about("Print the positioned graph of a snapshot as JSON")
                .arg(
                    Arg::new("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Roadmap snapshot JSON file"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("View configuration TOML file"),
                )
                .arg(
                    Arg::new("direction")
                        .long("direction")
                        .value_parser(["tb", "lr"])
                        .help("Rank direction, overrides the configuration"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a snapshot and report its shape")
                .arg(
                    Arg::new("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Roadmap snapshot JSON file"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("View configuration TOML file"),
                ),
        )
}

fn init_tracing(level: Option<&String>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_snapshot(path: &Path) -> anyhow::Result<RoadmapSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    RoadmapSnapshot::from_json(&json)
        .with_context(|| format!("invalid snapshot {}", path.display()))
}

fn read_config(args: &ArgMatches) -> anyhow::Result<ViewConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => ViewConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(ViewConfig::default()),
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn run_layout(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = read_config(args)?;
    if let Some(direction) = args.get_one::<String>("direction") {
        config.layout.direction = direction.parse::<RankDirection>()?;
    }

    let snapshot = read_snapshot(required_path(args, "snapshot")?)?;
    let layout = layout_snapshot(&snapshot, &config).context("layout failed")?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn run_validate(args: &ArgMatches) -> anyhow::Result<()> {
    let config = read_config(args)?;
    let snapshot = read_snapshot(required_path(args, "snapshot")?)?;
    let layout = layout_snapshot(&snapshot, &config).context("roadmap is not valid")?;

    println!("Roadmap: {}", snapshot.topic);
    println!("  Difficulty: {}", snapshot.difficulty);
    println!("  Language: {}", snapshot.language);
    println!("  Nodes: {}", layout.node_count());
    println!("  Edges: {}", layout.edges.len());
    println!("  Ranks: {}", layout.rank_count);
    println!(
        "  Bounds: {:.0} x {:.0}",
        layout.bounds.width, layout.bounds.height
    );
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_one::<String>("log-level"));

    let result = match matches.subcommand() {
        Some(("layout", args)) => run_layout(args),
        Some(("validate", args)) => run_validate(args),
        _ => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn direction_is_restricted() {
        let parsed = cli().try_get_matches_from(["roadmap-view", "layout", "r.json", "--direction", "bt"]);
        assert!(parsed.is_err());

        let parsed = cli()
            .try_get_matches_from(["roadmap-view", "layout", "r.json", "--direction", "lr"])
            .unwrap();
        let (_, args) = parsed.subcommand().unwrap();
        assert_eq!(args.get_one::<String>("direction").unwrap(), "lr");
    }
}
