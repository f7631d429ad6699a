//! Feeder Frenzy - Headless Runner
//!
//! Plays a run with no player input at a fixed 16 ms frame and prints a
//! summary. Useful for tuning config files and checking pacing.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use feeder_frenzy::core::error::Result;
use feeder_frenzy::core::types::Bounds;
use feeder_frenzy::core::SimulationConfig;
use feeder_frenzy::entity::species::Species;
use feeder_frenzy::simulation::difficulty::Difficulty;
use feeder_frenzy::simulation::session::{GameSettings, Session};
use feeder_frenzy::simulation::tick::{run_simulation_tick, GameOutcome, SimulationEvent, TickInput};

const FRAME_MS: f64 = 16.0;

/// Headless Feeder Frenzy runner
#[derive(Parser, Debug)]
#[command(name = "feeder-frenzy")]
#[command(about = "Run a headless feeder simulation and print a summary")]
struct Args {
    /// Seeds placed at the feeder
    #[arg(long, default_value_t = 100)]
    seeds: u32,

    /// Difficulty: easy, normal, hard or nightmare
    #[arg(long, default_value = "normal")]
    difficulty: String,

    /// Player species
    #[arg(long, default_value = "hawk")]
    species: String,

    /// Maximum ticks before stopping
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Screen width
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Screen height
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding simulation tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    outcome: String,
    ticks: u64,
    sim_seconds: f64,
    score: u32,
    level: u32,
    seeds_remaining: usize,
    agents_alive: usize,
    population: BTreeMap<String, usize>,
    agents_eaten: u32,
    rats_eaten: u32,
    crows_summoned: u32,
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feeder_frenzy=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let settings = GameSettings {
        seed_count: args.seeds,
        difficulty: Difficulty::from_name_or_default(&args.difficulty),
        player_species: args.species.parse::<Species>()?,
        rng_seed: Some(seed),
    };

    let bounds = Bounds::new(args.width, args.height);
    let mut session = Session::new(settings, config, bounds)?;
    session.start();

    let input = TickInput::idle(FRAME_MS, bounds);
    let mut outcome = GameOutcome::InProgress;
    let mut ticks = 0;
    let (mut agents_eaten, mut rats_eaten, mut crows_summoned) = (0, 0, 0);

    while ticks < args.ticks && session.running {
        ticks += 1;
        for event in run_simulation_tick(&mut session, &input) {
            match event {
                SimulationEvent::AgentEaten { .. } => agents_eaten += 1,
                SimulationEvent::RatEaten { .. } => rats_eaten += 1,
                SimulationEvent::CrowSummoned { .. } => crows_summoned += 1,
                SimulationEvent::GameOver { outcome: o } => outcome = o,
                _ => {}
            }
        }
    }

    let mut population = BTreeMap::new();
    for agent in session.agents.iter().filter(|a| a.alive) {
        *population.entry(agent.species.to_string()).or_insert(0) += 1;
    }

    let summary = RunSummary {
        outcome: match outcome {
            GameOutcome::PlayerCaught { .. } => "player_caught".to_string(),
            GameOutcome::SeedsDepleted { .. } => "seeds_depleted".to_string(),
            GameOutcome::InProgress => "timeout".to_string(),
        },
        ticks,
        sim_seconds: session.now_secs(),
        score: session.score,
        level: session.level,
        seeds_remaining: session.seeds.remaining(),
        agents_alive: population.values().sum(),
        population,
        agents_eaten,
        rats_eaten,
        crows_summoned,
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Feeder Frenzy Run");
            println!("=================");
            println!("Outcome: {}", summary.outcome);
            println!("Ticks: {} ({:.1}s simulated)", summary.ticks, summary.sim_seconds);
            println!("Score: {} (level {})", summary.score, summary.level);
            println!("Seeds remaining: {}", summary.seeds_remaining);
            println!("Eaten: {} agents, {} rats", summary.agents_eaten, summary.rats_eaten);
            println!("Crows summoned: {}", summary.crows_summoned);
            for (species, count) in &summary.population {
                println!("  {:<10} {}", species, count);
            }
            println!("Seed: {}", summary.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            tracing::warn!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
