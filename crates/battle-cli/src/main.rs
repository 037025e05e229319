//! battlesim - battlefield geometry inspector.
//!
//! Single binary that provides:
//! - `battlesim layout` - run one formation layout pass over a scenario
//! - `battlesim trace` - one-off line trace for map debugging

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use battle_formation::{FormationDefs, FormationPool, SquadId};
use battle_grid::{AreaMask, BattleSide, TraceParams};
use battle_math::Vec2;

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "battlesim")]
#[command(about = "Battlefield geometry inspector", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one deterministic layout pass and print every squad's slots
    Layout {
        /// Scenario file
        #[arg(long)]
        scenario: PathBuf,

        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Trace a single line across the scenario's grid
    Trace {
        /// Scenario file
        #[arg(long)]
        scenario: PathBuf,

        /// Start point as "x,y"
        #[arg(long)]
        from: String,

        /// End point as "x,y"
        #[arg(long)]
        to: String,

        /// Side issuing the query: attacker or defender
        #[arg(long, default_value = "attacker")]
        side: String,

        /// Treat water as crossable
        #[arg(long)]
        water: bool,

        /// Start from fortifications
        #[arg(long)]
        inside_wall: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Layout { scenario, json } => run_layout(&scenario, json),
        Commands::Trace {
            scenario,
            from,
            to,
            side,
            water,
            inside_wall,
        } => run_trace(&scenario, &from, &to, &side, water, inside_wall),
    }
}

#[derive(Serialize)]
struct SquadLayout {
    name: String,
    rows: u32,
    cols: u32,
    positions: Vec<Vec2>,
}

fn run_layout(path: &Path, json: bool) -> Result<()> {
    let scenario = load_scenario(path)?;
    let grid = scenario.build_grid();
    let defs = FormationDefs::compile(scenario.defs)?;

    tracing::info!(
        areas = grid.areas().len(),
        defs = defs.len(),
        squads = scenario.squads.len(),
        "scenario loaded"
    );

    let mut pool = FormationPool::new();
    let mut report = Vec::with_capacity(scenario.squads.len());

    for (index, squad) in scenario.squads.iter().enumerate() {
        let Some(def) = defs.get(&squad.def) else {
            bail!(
                "squad '{}': unknown formation def '{}'",
                squad.name,
                squad.def
            );
        };

        let handle = pool.acquire(def, squad.side, SquadId(index as u64));
        let formation = pool.get_mut(handle);
        formation.set_inside_wall(squad.inside_wall);
        formation.set_count(squad.count);
        formation.reposition(squad.anchor, squad.facing, &grid);

        tracing::debug!(
            squad = %squad.name,
            rows = formation.rows(),
            cols = formation.cols(),
            "laid out"
        );

        report.push(SquadLayout {
            name: squad.name.clone(),
            rows: formation.rows(),
            cols: formation.cols(),
            positions: formation.slots().to_vec(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for squad in &report {
            println!("{} ({} x {})", squad.name, squad.rows, squad.cols);
            for (slot, p) in squad.positions.iter().enumerate() {
                println!("  {slot:>3}: ({:.2}, {:.2})", p.x, p.y);
            }
        }
    }

    Ok(())
}

fn run_trace(
    path: &Path,
    from: &str,
    to: &str,
    side: &str,
    water: bool,
    inside_wall: bool,
) -> Result<()> {
    let scenario = load_scenario(path)?;
    let grid = scenario.build_grid();

    let from = parse_point(from)?;
    let to = parse_point(to)?;
    let side = parse_side(side)?;

    let mut params = TraceParams::new(AreaMask::all(), side);
    params.water_passable = water;
    params.inside_wall = inside_wall;

    match grid.trace(from, to, &params) {
        None => println!(
            "origin ({:.2}, {:.2}) is not on any tracked area",
            from.x, from.y
        ),
        Some(hit) => {
            println!("reached ({:.2}, {:.2})", hit.point.x, hit.point.y);
            match hit.blocked_by {
                Some(id) => println!("blocked by area #{}", id.raw()),
                None => println!("path clear"),
            }
        }
    }

    Ok(())
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_point(text: &str) -> Result<Vec2> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("expected \"x,y\", got \"{text}\""))?;
    Ok(Vec2::new(
        x.trim().parse().context("x coordinate")?,
        y.trim().parse().context("y coordinate")?,
    ))
}

fn parse_side(text: &str) -> Result<BattleSide> {
    match text {
        "attacker" => Ok(BattleSide::Attacker),
        "defender" => Ok(BattleSide::Defender),
        other => bail!("unknown side '{other}' (expected attacker or defender)"),
    }
}
