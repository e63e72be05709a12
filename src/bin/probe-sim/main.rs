// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Session Runner
//
// Usage:
//   cargo run --release --bin probe-sim                                  # defaults: N=1024 K=1 I=0 X=100
//   cargo run --release --bin probe-sim -- -n 256 -k 1,4,16,64 --variant both
//   cargo run --release --bin probe-sim -- --seed 42 --out results --file-name sweep

use clap::{Parser, ValueEnum};
use probe_engine::{ProbeSimulation, Session, SimulationConfig, Variant};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Basic,
    Advanced,
    Both,
}

impl VariantArg {
    fn variants(self) -> &'static [Variant] {
        match self {
            VariantArg::Basic => &[Variant::Basic],
            VariantArg::Advanced => &[Variant::Advanced],
            VariantArg::Both => &[Variant::Basic, Variant::Advanced],
        }
    }
}

/// Tree-splitting contention simulator
///
/// Runs one simulation per (variant, ready count) pair, tabulates the
/// averaged success / collision / idle percentages and saves the session.
#[derive(Parser, Debug)]
#[command(name = "probe-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Total number of stations (N)
    #[arg(short = 'n', long, default_value = "1024")]
    stations: u32,

    /// Ready stations per trial (K); a comma separated list runs a sweep
    #[arg(short = 'k', long, value_delimiter = ',', default_value = "1")]
    ready: Vec<u32>,

    /// Starting probe level of the basic walk (I)
    #[arg(short = 'i', long, default_value = "0")]
    level: u32,

    /// Trials per simulation (X)
    #[arg(short = 'x', long, default_value = "100")]
    scenarios: u32,

    /// Walk variant to run
    #[arg(long, value_enum, default_value = "basic")]
    variant: VariantArg,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the session file is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Session file name, without extension
    #[arg(long, default_value = probe_engine::session::DEFAULT_FILE_NAME)]
    file_name: String,

    /// Print the table without writing the session file
    #[arg(long)]
    no_save: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,probe_engine=info,probe_sim=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, stations = args.stations, runs = args.ready.len(), "Starting session");

    let mut session = Session::new(&args.out);
    session.set_file_name(&args.file_name);

    for &variant in args.variant.variants() {
        for &ready in &args.ready {
            let config = SimulationConfig::new(args.stations, ready, args.level, args.scenarios, variant);
            if let Err(e) = config.validate() {
                error!(%e, ready, "Rejected configuration");
                eprintln!("Invalid configuration: {}", e);
                std::process::exit(2);
            }

            let mut sim = ProbeSimulation::with_seed(config, seed);
            match sim.run() {
                Ok(report) => {
                    print!("{}", report.status);
                    session.record(report);
                }
                Err(e) => {
                    error!(%e, "Simulation failed");
                    eprintln!("Simulation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    println!();
    print!("{}", session.render_table());
    println!();

    if args.no_save {
        return;
    }
    match session.save() {
        Ok(path) => println!("Results saved to: {}", path.display()),
        Err(e) => {
            eprintln!("Failed to save session: {}", e);
            std::process::exit(1);
        }
    }
}
