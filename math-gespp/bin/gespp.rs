//! GESPP command-line solver
//!
//! Loads a linear system description, solves it with Gaussian elimination
//! using scaled partial pivoting, and writes the solution vector.
//!
//! Usage:
//!   cargo run --release --bin gespp -- --input data/system_3x3.txt
//!   cargo run --release --bin gespp -- --input system.txt --output solution.txt --epsilon 1e-9
//!   cargo run --release --bin gespp -- --help

use anyhow::Context;
use clap::Parser;
use gespp::{RunConfig, SolutionDisplay, export_solution, load_system};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "gespp")]
#[command(about = "Solve a dense linear system with Gaussian elimination and scaled partial pivoting", long_about = None)]
struct Args {
    /// Path to the system description (n, then n rows of n coefficients, then n values)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the solution vector (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the zero threshold
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Override the number of digits written after the decimal point
    #[arg(short, long)]
    precision: Option<usize>,

    /// Do not print the system before solving
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(epsilon) = args.epsilon {
        config.solver.zero_threshold = epsilon;
    }
    if let Some(precision) = args.precision {
        config.output.precision = precision;
    }
    if args.verbose && config.solver.print_interval == 0 {
        config.solver.print_interval = 1;
    }

    let gespp_config = config.to_gespp_config()?;

    let system = load_system(&args.input)
        .with_context(|| format!("Failed to load system from {}", args.input.display()))?;

    if config.output.print_system && !args.quiet {
        println!("Linear system ({} x {}), [A | b]:", system.n(), system.n());
        println!("{}", system);
    }

    let start = Instant::now();
    let x = system
        .solve(&gespp_config)
        .context("Failed to solve linear system")?;
    log::info!(
        "Solved {}x{} system in {:.3} ms",
        system.n(),
        system.n(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let residual = system.residual_norm(&x)?;

    match &args.output {
        Some(path) => {
            export_solution(&x, path, config.output.precision)
                .with_context(|| format!("Failed to write solution to {}", path.display()))?;
            println!("Solution written to: {}", path.display());
        }
        None => print!("{}", SolutionDisplay::new(&x, config.output.precision)),
    }

    println!("Residual ||Ax - b||: {:.3e}", residual);

    Ok(())
}
