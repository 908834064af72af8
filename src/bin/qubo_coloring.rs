// QUBO graph coloring driver
// Generate instances, solve a single instance, or run a hyperparameter sweep

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use qubo_coloring::{load_sweep_config, run_sweep, GraphInstanceStore, SeriesRecord, SweepConfig};
use qubo_core::{QuboError, QuboSimulation, SimulatedAnnealingSolver, TelemetryHandle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[clap(name = "qubo-coloring")]
#[clap(about = "Graph coloring as QUBO", long_about = None)]
struct Cli {
    /// Sweep config TOML (falls back to $QUBO_SWEEP_CONFIG, then defaults)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Append per-phase telemetry as JSONL to this file
    #[clap(long, global = true)]
    telemetry: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the instance store
    Generate {
        /// Regenerate even if the store already has instances
        #[clap(short, long)]
        force: bool,
    },

    /// Solve one stored instance
    Solve {
        #[clap(short, long, default_value_t = 10)]
        n: usize,

        #[clap(short, long, default_value_t = 5)]
        c: usize,

        #[clap(short, long, default_value_t = 1)]
        instance: usize,

        #[clap(long, default_value_t = 8)]
        bond_dim: usize,

        #[clap(long, default_value_t = 1e9)]
        tfr: f64,

        /// Report no chromatic number when the solution is infeasible
        #[clap(long)]
        strict: bool,

        /// Solver seed (defaults to the config seed)
        #[clap(long)]
        seed: Option<u64>,
    },

    /// Run the configured sweep
    Sweep {
        /// Run combinations in parallel
        #[clap(short, long)]
        parallel: bool,

        /// Results file (overrides config)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_store(config: &SweepConfig, force: bool) -> Result<GraphInstanceStore> {
    let mut store = GraphInstanceStore::open(&config.graph_dir, config.edge_probability, config.seed)
        .with_context(|| format!("opening instance store at {:?}", config.graph_dir))?;
    if force || !store.is_populated() {
        println!(
            "{} {}",
            "►".cyan(),
            format!("Generating graph instances under {}", config.graph_dir.display()).bold()
        );
        let written = store.generate_and_store(
            config.generation_n_range(),
            config.generation_c_range(),
            config.instances_per_bound,
        )?;
        println!("  {} {}", "Written:".dimmed(), written.to_string().green().bold());
    }
    Ok(store)
}

fn print_series(title: &str, series: &SeriesRecord) {
    println!("\n{} {}", "►".cyan(), title.cyan().bold());
    for i in 0..series.len() {
        let n = series
            .n_values
            .get(i)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  n={:<4} colors={:<4} cost={}",
            n, series.chromatic_numbers[i], series.costs[i]
        );
    }
}

fn run(command: Commands, config: SweepConfig, telemetry: Option<&Arc<TelemetryHandle>>) -> Result<()> {
    match command {
        Commands::Generate { force } => {
            open_store(&config, force)?;
        }

        Commands::Solve {
            n,
            c,
            instance,
            bond_dim,
            tfr,
            strict,
            seed,
        } => {
            let store = open_store(&config, false)?;
            let graph_instance = match store.load(n, c, instance) {
                Ok(graph_instance) => graph_instance,
                Err(e @ QuboError::InstanceNotFound { .. }) => {
                    eprintln!("{} {}", "✗".red(), e.to_string().red());
                    return Err(e).context("nothing to solve");
                }
                Err(e) => return Err(e.into()),
            };
            let graph = graph_instance.to_graph()?;

            let solver = SimulatedAnnealingSolver::new(seed.unwrap_or(config.seed));
            let mut simulation =
                QuboSimulation::new(solver).with_convergence(config.convergence.clone());
            if let Some(t) = telemetry {
                simulation = simulation.with_telemetry(Arc::clone(t));
            }

            let outcome = simulation.run_simulation(&graph, c, bond_dim, tfr)?;
            let chromatic = if strict && !outcome.feasible {
                "undefined".yellow().to_string()
            } else {
                outcome.chromatic_number.to_string().green().bold().to_string()
            };
            println!(
                "n={}, c={} → Cost: {}, Chromatic Number: {}",
                n, c, outcome.cost, chromatic
            );
            match &outcome.first_violation {
                Some(v) => println!("  {} {}", "Infeasible:".red(), v),
                None => println!("  {} {}", "Feasible:".dimmed(), "yes".green()),
            }
            println!(
                "  {} {:.4}s",
                "Time to solution:".dimmed(),
                outcome.time_to_solution
            );
        }

        Commands::Sweep { parallel, output } => {
            let mut config = config;
            config.parallel |= parallel;
            if let Some(output) = output {
                config.output_path = output;
            }
            let store = open_store(&config, false)?;

            let report = run_sweep(&config, &store, SimulatedAnnealingSolver::new, telemetry.cloned())?;

            println!("{}", "═══════════════════════════════════════════════════════════".blue());
            println!("{}", "                        SWEEP SUMMARY                      ".blue().bold());
            println!("{}", "═══════════════════════════════════════════════════════════".blue());
            for (bond, series) in &report.results.max_bond_dimension {
                print_series(&format!("max_bond_dimension = {}", bond), series);
            }
            for (ratio, series) in &report.results.transverse_field_ratio {
                print_series(&format!("transverse_field_ratio = {}", ratio), series);
            }
            println!(
                "\n{} new, {} resumed, {} skipped → {}",
                report.completed.to_string().green().bold(),
                report.resumed.to_string().cyan().bold(),
                report.skipped.len().to_string().yellow().bold(),
                config.output_path.display()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_sweep_config(cli.config.as_deref()).context("loading sweep config")?;
    let telemetry = match &cli.telemetry {
        Some(path) => Some(Arc::new(
            TelemetryHandle::with_jsonl(path)
                .with_context(|| format!("opening telemetry file {:?}", path))?,
        )),
        None => None,
    };

    let result = run(cli.command, config, telemetry.as_ref());

    // Summarize telemetry whether or not the command succeeded
    if let Some(t) = &telemetry {
        log::info!("[TELEMETRY] run {}: {} metrics recorded", t.run_id(), t.len());
        for stats in t.phase_stats() {
            log::info!("[TELEMETRY] {:?}", stats);
        }
    }

    result
}
