//! Terrain route finder
//!
//! Loads a terrain map from a text file, runs A* or A*ε between two cells and prints the map with
//! the route marked, followed by its cost and the calories it spends.
//!
//! Map files hold one line per row: `.` grass, `~` water, `*` rock, `#` impassable.
//! Cells are given as `row,col`, counted from the top left corner.
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{eyre, WrapErr};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use terrain_route::overlay::render;
use terrain_route::{
    find_route, Algorithm, Epsilon, FrontierPolicy, GridCell, GridMap, Heuristic, NoOverlay,
    Overlay, ResourceModel, Route, SearchOptions,
};

#[derive(clap::ValueEnum, Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Engine {
    /// Classic A*
    #[default]
    Astar,
    /// A*ε: bounded-suboptimal, prefers routes that spend fewer calories
    SubEpsilon,
}

#[derive(clap::ValueEnum, Debug, Copy, Clone, Default, PartialEq, Eq)]
enum Format {
    #[default]
    Text,
    Yaml,
}

/// Find a route across a terrain map, trading path cost for calories within a relaxation bound.
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the map file
    #[arg(short, long)]
    map: PathBuf,

    /// Start cell as row,col
    #[arg(long)]
    from: GridCell,

    /// Goal cell as row,col
    #[arg(long)]
    to: GridCell,

    #[arg(long, value_enum, default_value_t)]
    heuristic: Heuristic,

    #[arg(short, long, value_enum, default_value_t)]
    algorithm: Engine,

    /// Relaxation factor for sub-epsilon
    #[arg(short, long, default_value_t = Epsilon::ZERO)]
    epsilon: Epsilon,

    /// What to do when a cheaper path reaches a cell that is already queued
    #[arg(long, value_enum, default_value_t)]
    policy: FrontierPolicy,

    /// Calories spent entering a water cell
    #[arg(long, default_value_t = ResourceModel::default().water)]
    water_cost: u32,

    /// Run sub-epsilon once per listed epsilon (comma separated) and report each route
    #[arg(long, value_delimiter = ',', conflicts_with = "epsilon")]
    sweep: Vec<Epsilon>,

    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Log every expansion (frontier and interior) to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize, Debug)]
struct Report<'a> {
    map: &'a Path,
    start: GridCell,
    goal: GridCell,
    heuristic: Heuristic,
    algorithm: Engine,
    #[serde(skip_serializing_if = "Option::is_none")]
    epsilon: Option<Epsilon>,
    options: SearchOptions,
    route: &'a Route,
}

#[derive(Serialize, Debug)]
struct SweepEntry {
    epsilon: Epsilon,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    init_tracing(args.trace);

    let map = GridMap::load(&args.map)
        .wrap_err_with(|| format!("failed to load map {}", args.map.display()))?;
    tracing::info!(rows = map.rows(), cols = map.cols(), "map loaded");

    let options = SearchOptions {
        policy: args.policy,
        resources: ResourceModel {
            water: args.water_cost,
            ..ResourceModel::default()
        },
    };

    if !args.sweep.is_empty() {
        return sweep(&args, &map, &options);
    }

    let algorithm = match args.algorithm {
        Engine::Astar => Algorithm::AStar,
        Engine::SubEpsilon => Algorithm::SubEpsilon(args.epsilon),
    };

    let now = std::time::Instant::now();
    let mut overlay = Overlay::for_map(&map);
    let route = find_route(
        &map,
        args.from,
        args.to,
        args.heuristic,
        algorithm,
        &options,
        &mut overlay,
    )
    .wrap_err("the route could not be found")?;
    tracing::info!(micros = now.elapsed().as_micros() as u64, "search finished");

    match args.format {
        Format::Text => {
            print!("{}", render(&map, &overlay));
            println!();
            println!("path: {}", join(&route.path));
            println!("cost: {}", route.cost);
            println!("calories: {}", route.resources);
            println!("expanded: {}", route.expansions);
        }
        Format::Yaml => {
            let report = Report {
                map: &args.map,
                start: args.from,
                goal: args.to,
                heuristic: args.heuristic,
                algorithm: args.algorithm,
                epsilon: (args.algorithm == Engine::SubEpsilon).then_some(args.epsilon),
                options,
                route: &route,
            };
            print!("{}", serde_yaml::to_string(&report)?);
        }
    }

    Ok(())
}

/// sweep runs sub-epsilon for every requested epsilon in parallel; the map is only read
fn sweep(args: &Args, map: &GridMap, options: &SearchOptions) -> eyre::Result<()> {
    let entries: Vec<SweepEntry> = args
        .sweep
        .par_iter()
        .map(|&epsilon| {
            let result = find_route(
                map,
                args.from,
                args.to,
                args.heuristic,
                Algorithm::SubEpsilon(epsilon),
                options,
                &mut NoOverlay,
            );
            match result {
                Ok(route) => SweepEntry {
                    epsilon,
                    route: Some(route),
                    error: None,
                },
                Err(e) => SweepEntry {
                    epsilon,
                    route: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    match args.format {
        Format::Text => {
            for entry in &entries {
                match (&entry.route, &entry.error) {
                    (Some(route), _) => println!(
                        "epsilon {}: cost {} calories {} steps {}",
                        entry.epsilon,
                        route.cost,
                        route.resources,
                        route.path.len() - 1
                    ),
                    (None, Some(error)) => println!("epsilon {}: {error}", entry.epsilon),
                    (None, None) => {}
                }
            }
        }
        Format::Yaml => print!("{}", serde_yaml::to_string(&entries)?),
    }

    if entries.iter().all(|e| e.route.is_none()) {
        return Err(eyre!("no epsilon produced a route"));
    }
    Ok(())
}

fn join(cells: &[GridCell]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing(trace: bool) {
    let env_filter = if trace {
        EnvFilter::new("warn,terrain_route=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
