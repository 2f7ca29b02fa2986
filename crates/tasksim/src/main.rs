use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};

use tasksim::{config, workload, ClusterSimulation};

#[derive(Parser, Debug)]
#[clap(
    name = "tasksim",
    version,
    about = "Simulates task execution on a multi-host system",
    long_about = None
)]
struct Args {
    /// Path to XML file containing experiment definitions
    experiments_xml: PathBuf,

    /// Experiment name to run
    #[clap(long, short)]
    experiment: String,

    /// Show detailed statistics
    #[clap(long, short)]
    verbose: bool,
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    // Help and version print to stdout and exit 0; every failure exits 1.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().expect("failed to write argument error");
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    info!("Loading experiments from: {}", args.experiments_xml.display());
    let experiments = config::load_experiments(&args.experiments_xml)?;

    info!("Loading experiment: {}", args.experiment);
    let experiment = config::select_experiment(&experiments, &args.experiment)?;

    info!("Experiment configuration:");
    info!("  Tasks CSV: {}", experiment.tasks_path.display());
    let hosts_info = experiment
        .hosts
        .iter()
        .map(|h| format!("{} ({} cores, {} RAM)", h.name, h.cpu_cores, h.ram))
        .collect::<Vec<_>>()
        .join("; ");
    info!("  Hosts: {}", hosts_info);

    info!("Parsing tasks from CSV: {}", experiment.tasks_path.display());
    let records = workload::load_tasks(&experiment.tasks_path)?;
    info!("Parsed {} tasks", records.len());

    info!("Validating task dependencies...");
    workload::validate_dependencies(&records)?;
    info!("Dependencies validated successfully");

    info!("Initializing simulator...");
    let mut simulation = ClusterSimulation::new(&experiment, &records)?;

    info!("Starting simulation...");
    simulation.run(args.verbose);

    info!("Simulation completed successfully!");
    Ok(())
}
