mod args;
mod dashboard;

use clap::Parser;
use log::{debug, info, warn, LevelFilter};

use crate::args::Args;
use crate::dashboard::config_reader::DashboardConfig;
use crate::dashboard::{run_dashboard, run_once, Dashboard, DashboardResult};

fn read_config(args: &Args) -> DashboardResult<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::read(path)?,
        None => DashboardConfig::default(),
    };
    // Paths given on the command line are relative to the working directory.
    if let Some(input) = &args.input {
        config.source.file_path = input.clone();
    }
    if let Some(input_type) = &args.input_type {
        config.source.provider = Some(input_type.clone());
    }
    if let Some(name) = &args.excel_worksheet_name {
        config.source.worksheet_name = Some(name.clone());
    }
    if let Some(out) = &args.out {
        config.output_path = out.clone();
    }
    if let Some(interval) = args.interval {
        config.refresh_seconds = interval;
    }
    Ok(config)
}

fn run(args: &Args) -> DashboardResult<()> {
    let config = read_config(args)?;
    let dashboard = Dashboard::new(config)?;
    if args.once {
        run_once(
            &dashboard,
            args.summary.as_deref(),
            args.reference.as_deref(),
        )
    } else {
        if args.summary.is_some() || args.reference.is_some() {
            warn!("--summary and --reference are only used with --once");
        }
        run_dashboard(dashboard)
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    info!("args: {:?}", args);

    if let Err(e) = run(&args) {
        debug!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e.describe());
        std::process::exit(1);
    }
}
