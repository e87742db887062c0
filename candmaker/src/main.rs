use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

mod io;
mod workflow;

#[cfg(test)]
mod testdata;

use workflow::config::DriverConfig;
use workflow::runner::Runner;
use workflow::table::load_candidate_table;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Make classifier-ready candidate image files from candidate csv tables"
)]
struct Args {
    /// Be verbose
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// csv file with candidate parameters
    #[arg(short, long)]
    cand_param_file: PathBuf,
    /// Load driver options from a YAML file instead of the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frequency size after rebinning
    #[arg(long, default_value_t = 256)]
    frequency_size: usize,
    /// Time length after rebinning
    #[arg(long, default_value_t = 256)]
    time_size: usize,
    /// GPU device id (use -1 for CPU)
    #[arg(long, default_value_t = -1)]
    gpu_id: i32,
    /// Number of workers processing candidates in parallel
    #[arg(long, default_value_t = 2)]
    nproc: usize,
    /// Optimise DM (experimental)
    #[arg(long, default_value_t = false)]
    optimize_dm: bool,
    /// Output directory for candidate files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.config {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig {
            frequency_size: args.frequency_size,
            time_size: args.time_size,
            gpu_id: args.gpu_id,
            nproc: args.nproc,
            optimize_dm: args.optimize_dm,
            output_dir: args.output_dir.clone(),
        },
    };
    if config.gpu_id >= 0 {
        info!("using the GPU {}", config.gpu_id);
    }

    let descriptors = load_candidate_table(&args.cand_param_file)?;
    info!(
        "loaded {} candidates from {}",
        descriptors.len(),
        args.cand_param_file.display()
    );
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let runner = Runner::new(config.to_prep_config());
    let summary = runner.run(descriptors)?;
    info!(
        "batch finished: {} completed, {} failed, {} gpu fallbacks",
        summary.completed, summary.failed, summary.gpu_fallbacks
    );
    Ok(())
}
