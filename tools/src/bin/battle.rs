use anyhow::Context;
use broadside_simulator::scenario::Status;
use broadside_simulator::snapshot::Snapshot;
use broadside_simulator::{scenario, simulation, Config};
use clap::Parser as _;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
struct Arguments {
    #[clap(short, long, value_parser, default_value = "10")]
    seeds: u32,

    #[clap(short, long, value_parser, default_value = "18000")]
    max_ticks: u32,

    /// JSON file overriding ship and AI constants.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Print the final snapshot of seed 0 as JSON.
    #[clap(long)]
    snapshot: bool,

    scenario_name: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("battle=info"))
        .init();

    let args = Arguments::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };
    if scenario::load_safe(&args.scenario_name).is_none() {
        anyhow::bail!(
            "unknown scenario {:?}, expected one of {:?}",
            args.scenario_name,
            scenario::list()
        );
    }

    log::info!(
        "Running {} seeds of {:?}",
        args.seeds,
        args.scenario_name
    );
    let outcomes = (0..args.seeds)
        .into_par_iter()
        .map(|seed| run_simulation(&args.scenario_name, seed, &config, args.max_ticks))
        .collect::<anyhow::Result<Vec<Outcome>>>()?;

    let mut results: Results = Default::default();
    for outcome in outcomes.iter() {
        log::info!(
            "seed {}: {:?} after {:.1}s, {} shots, {} hits",
            outcome.seed,
            outcome.status,
            outcome.time,
            outcome.shots,
            outcome.hits
        );
        match outcome.status {
            Status::Victory { team: 0 } => results.player_wins.push(outcome.seed),
            Status::Victory { .. } => results.enemy_wins.push(outcome.seed),
            Status::Draw => results.draws.push(outcome.seed),
            Status::Running => results.unfinished.push(outcome.seed),
        }
    }
    log::info!("Results: {:?}", results);

    if args.snapshot {
        if let Some(snapshot) = outcomes.into_iter().find(|o| o.seed == 0).map(|o| o.snapshot) {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

#[derive(Default, Debug)]
struct Results {
    player_wins: Vec<u32>,
    enemy_wins: Vec<u32>,
    draws: Vec<u32>,
    unfinished: Vec<u32>,
}

struct Outcome {
    seed: u32,
    status: Status,
    time: f64,
    shots: usize,
    hits: usize,
    snapshot: Snapshot,
}

fn run_simulation(
    scenario_name: &str,
    seed: u32,
    config: &Config,
    max_ticks: u32,
) -> anyhow::Result<Outcome> {
    let mut sim = simulation::Simulation::with_config(scenario_name, seed, config.clone())?;
    let (mut shots, mut hits) = (0, 0);
    while sim.status() == Status::Running && sim.tick() < max_ticks {
        sim.step();
        shots += sim.events().shots.len();
        hits += sim.events().hits.len();
    }
    Ok(Outcome {
        seed,
        status: sim.status(),
        time: sim.time(),
        shots,
        hits,
        snapshot: sim.snapshot(),
    })
}
