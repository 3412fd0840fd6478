use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use haulplan_engine::{Engine, EngineConfig, ProblemModel, ShipmentReport};
use tracing::debug;

mod demo;
mod render;

#[derive(Parser)]
#[command(name = "haulplan")]
#[command(about = "Minimum-cost shipment planning from supply origins to demand destinations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log solver progress at debug level
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the optimal plan
    Solve {
        /// JSON file with origins, destinations and costs
        file: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve the bundled citrus growers scenario
    Demo {
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Check a problem file for errors without solving it
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(Args)]
struct SolveOptions {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Show utilisation and idle route analysis
    #[arg(short, long)]
    analysis: bool,
    /// Simplex pivot budget per phase
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
    /// Quantities below this are reported as zero
    #[arg(long, default_value_t = 1e-6)]
    epsilon: f64,
    /// Minimum shadow price magnitude for a constraint to be reported as binding
    #[arg(long, default_value_t = 1e-4)]
    binding_threshold: f64,
}

impl SolveOptions {
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_primal_epsilon(self.epsilon)
            .with_binding_threshold(self.binding_threshold)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve { file, options } => {
            let model = load_model(&file)?;
            let report = solve(&model, &options);
            finish(&report, &options)
        }
        Commands::Demo { options } => {
            let model = demo::citrus_growers().context("building demo scenario")?;
            let report = solve(&model, &options);
            finish(&report, &options)
        }
        Commands::Check { file } => {
            let model = load_model(&file)?;
            println!("✓ {} is valid", file.display());
            println!("  {} origins ({:.1} t capacity)", model.origins().len(), model.total_capacity());
            println!(
                "  {} destinations ({:.1} t required)",
                model.destinations().len(),
                model.total_requirement()
            );
            println!("  {} routes", model.num_routes());
            Ok(())
        }
    }
}

fn load_model(file: &Path) -> anyhow::Result<ProblemModel> {
    let source = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let model: ProblemModel =
        serde_json::from_str(&source).with_context(|| format!("invalid problem in {}", file.display()))?;
    debug!(
        origins = model.origins().len(),
        destinations = model.destinations().len(),
        "loaded problem"
    );
    Ok(model)
}

fn solve(model: &ProblemModel, options: &SolveOptions) -> ShipmentReport {
    Engine::new(options.config()).run(model)
}

fn finish(report: &ShipmentReport, options: &SolveOptions) -> anyhow::Result<()> {
    if options.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        render::print_report(report, options.analysis);
    }

    if !report.is_optimal() {
        std::process::exit(1);
    }
    Ok(())
}
