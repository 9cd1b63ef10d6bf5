//! civiclookup - Find the members of Congress who represent an address
//!
//! `lookup` geocodes an address, refreshes the cached roster if it is stale,
//! and prints the matching senators and representatives. `update` replaces
//! the cache unconditionally.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use civiclookup::cli::{Cli, Command, LookupArgs, UpdateArgs};
use civiclookup::config::Config;
use civiclookup::data::Role;
use civiclookup::output;
use civiclookup::refresh::DatasetRefresher;
use civiclookup::resolver::DistrictResolver;

/// Logs go to stderr so stdout stays clean for piping
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn lookup(config: &Config, args: &LookupArgs) -> Result<(), Box<dyn Error>> {
    let output_filter = args.fields.filter()?;
    let http = config.http_client()?;
    // Checked before any request goes out
    let geocoder = config.civic_client(http.clone())?;

    let refresher = DatasetRefresher::new(config.congress_client(http), config.cache())
        .with_staleness_window(config.staleness_window);
    let resolver = DistrictResolver::new(geocoder, refresher);

    let resolution = resolver.resolve(&args.address(), &output_filter).await?;
    let rendered = output::render(&resolution, args.format)?;

    match &args.output {
        Some(path) => {
            write_output(path, &rendered)?;
            println!("Output written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

async fn update(config: &Config, args: &UpdateArgs) -> Result<(), Box<dyn Error>> {
    let jurisdiction = args.jurisdiction()?;
    let filter = args.fields.filter()?;
    let http = config.http_client()?;

    let refresher = DatasetRefresher::new(config.congress_client(http), config.cache());
    let roster = refresher.refresh(jurisdiction, &filter).await?;

    println!(
        "Cached {} senators and {} representatives for '{}' at {}",
        roster.count(Role::Senator),
        roster.count(Role::Representative),
        jurisdiction,
        refresher.cache().roster_path(jurisdiction).display()
    );
    if let Some(described) = filter.describe() {
        println!("Field filter: {}", described);
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::from_cli(&cli)?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), "loaded configuration");

    match &cli.command {
        Command::Lookup(args) => lookup(&config, args).await,
        Command::Update(args) => update(&config, args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so clap's env fallbacks see values from .env
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: failed to load .env: {}", err);
        }
    }
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
