use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use routinr::cli::render;
use routinr::cli::{Cli, Commands};
use routinr::clock::{Clock, SystemClock};
use routinr::config::Config;
use routinr::domain::{ScheduleSummary, Tier};
use routinr::scheduler::{self, Engine};
use routinr::store::TaskCatalog;

fn setup_logging(config: &Config) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("routinr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("routinr.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let rust_log = std::env::var("RUST_LOG").ok();
    env_logger::Builder::new()
        .parse_filters(&config.log_filters(rust_log.as_deref()))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_catalog(cli: &Cli, config: &Config) -> Result<TaskCatalog> {
    let path = cli.catalog.as_ref().unwrap_or(&config.storage.catalog_path);
    TaskCatalog::load(path).context(format!("Failed to load catalog from {}", path.display()))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let catalog = load_catalog(cli, config)?;
    let clock = SystemClock;

    match &cli.command {
        Commands::Schedule {
            routine,
            minutes,
            engine,
            json,
        } => handle_schedule_command(&catalog, routine, *minutes, *engine, *json, config, &clock),
        Commands::Estimate { routine, tier } => handle_estimate_command(&catalog, routine, *tier, &clock),
        Commands::Routines => handle_routines_command(&catalog, &clock),
    }
}

fn handle_schedule_command(
    catalog: &TaskCatalog,
    name: &str,
    minutes: u64,
    engine: Option<Engine>,
    json: bool,
    config: &Config,
    clock: &dyn Clock,
) -> Result<()> {
    let routine = catalog.routine(name)?;
    let tasks = routine.resolve(catalog);
    let available = routine.available_after_buffer(minutes.saturating_mul(60));
    let engine = engine.unwrap_or(config.engine);

    info!(
        "Scheduling '{}' with {} engine: {} tasks, {}s available",
        name,
        engine,
        tasks.len(),
        available
    );

    let strategy = engine.strategy(config.scheduler_config());
    let schedule = strategy
        .schedule(&tasks, available, clock)
        .context(format!("Failed to schedule '{}'", name))?;
    let summary = ScheduleSummary::new(&schedule, available);

    if json {
        println!("{}", render::schedule_json(name, engine, &schedule, &summary)?);
    } else {
        print!("{}", render::render_schedule(name, &schedule, &summary));
    }
    Ok(())
}

fn handle_estimate_command(catalog: &TaskCatalog, name: &str, tier: Option<Tier>, clock: &dyn Clock) -> Result<()> {
    let routine = catalog.routine(name)?;
    let tasks = routine.resolve(catalog);

    let tiers: Vec<Tier> = match tier {
        Some(t) => vec![t],
        None => Tier::ALL.to_vec(),
    };
    let estimates: Vec<(Tier, u64)> = tiers
        .into_iter()
        .map(|t| (t, routine.buffer_secs.saturating_add(scheduler::estimate_duration(&tasks, t, clock))))
        .collect();

    print!("{}", render::render_estimates(name, &estimates));
    Ok(())
}

fn handle_routines_command(catalog: &TaskCatalog, clock: &dyn Clock) -> Result<()> {
    if catalog.routines().is_empty() {
        println!("{}", "No routines defined".yellow());
        return Ok(());
    }
    println!("{}", "Routines:".green().bold());
    for routine in catalog.routines() {
        let tasks = routine.resolve(catalog);
        let minimum = routine.buffer_secs.saturating_add(scheduler::estimate_duration(&tasks, Tier::Essential, clock));
        println!(
            "  {:<16} {} tasks, essentials need {}",
            routine.name,
            tasks.len(),
            render::format_duration(minimum)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
