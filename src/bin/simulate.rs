//! Encounter balance simulator CLI.
//!
//! Run Monte Carlo simulations of the boss encounter with a scripted player.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 200 runs to stage 3
//!   cargo run --bin simulate -- -n 50 -g 5       # 50 runs to stage 5
//!   cargo run --bin simulate -- --seed 42        # Reproducible run

use showdown::core::EncounterConfig;
use showdown::simulator::{run_simulation, SimConfig};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SHOWDOWN ENCOUNTER SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!(
        "  Stages:         {} -> {}",
        config.starting_stage, config.target_stage
    );
    println!("  Max Time:       {:.0}s", config.max_time_ms as f64 / 1000.0);
    if config.frame_jitter_ms > 0 {
        println!(
            "  Frame:          {}ms ±{}ms",
            config.frame_ms, config.frame_jitter_ms
        );
    } else {
        println!("  Frame:          {}ms", config.frame_ms);
    }
    println!("  Hitstop:        {}ms", config.tuning.hitstop_ms);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = SimConfig::default();
    let mut tuning_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-g" | "--stage" => {
                if i + 1 < args.len() {
                    config.target_stage = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--start" => {
                if i + 1 < args.len() {
                    config.starting_stage = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--max-time" => {
                if i + 1 < args.len() {
                    let secs: u64 = args[i + 1].parse().unwrap_or(600);
                    config.max_time_ms = secs * 1000;
                    i += 1;
                }
            }
            "--frame" => {
                if i + 1 < args.len() {
                    config.frame_ms = args[i + 1].parse().unwrap_or(16);
                    i += 1;
                }
            }
            "--jitter" => {
                if i + 1 < args.len() {
                    config.frame_jitter_ms = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--tuning" => {
                if i + 1 < args.len() {
                    tuning_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::stage_balance_test(1);
            }
            "--gauntlet" => {
                config = SimConfig::gauntlet(10);
            }
            "--jittery" => {
                config = SimConfig::jittery_frames();
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(path) = tuning_path {
        let json = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read tuning file {}: {}", path, e))?;
        config.tuning = EncounterConfig::from_json(&json)?;
    }

    if config.target_stage < config.starting_stage {
        config.target_stage = config.starting_stage;
    }

    Ok(config)
}

fn print_help() {
    println!("Showdown Encounter Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>       Number of simulation runs (default: 200)");
    println!("    -g, --stage <G>      Stage to clear for a run to count (default: 3)");
    println!("    --start <S>          Stage the first encounter starts at (default: 1)");
    println!("    -s, --seed <S>       Random seed for reproducibility");
    println!("    -t, --max-time <T>   Simulated seconds per run (default: 600)");
    println!("    --frame <MS>         Nominal frame length (default: 16)");
    println!("    --jitter <MS>        Random frame length spread (default: 0)");
    println!("    --tuning <FILE>      Load encounter tuning from a JSON file");
    println!("    -v, --verbose        Per-run output");
    println!("    --json               Save JSON report");
    println!("    --quick              Quick test (50 runs, stage 1 only)");
    println!("    --gauntlet           Long test (25 runs to stage 10)");
    println!("    --jittery            Uneven frames (20ms ±12ms)");
    println!("    -h, --help           Show this help");
    println!();
    println!("Set RUST_LOG=showdown=debug to trace state transitions.");
}
