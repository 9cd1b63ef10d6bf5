//! Command-line interface parsing for civiclookup
//!
//! Two subcommands: `lookup` resolves addresses to their legislators, and
//! `update` force-refreshes the cached roster. Field filters are accepted by
//! both; for `update` they shape what is cached, for `lookup` what is printed.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::{FieldFilter, FieldFilterError, Jurisdiction, UnsupportedJurisdiction};
use crate::output::OutputFormat;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    InvalidFields(#[from] FieldFilterError),

    #[error(transparent)]
    InvalidJurisdiction(#[from] UnsupportedJurisdiction),

    /// `lookup` needs a geocoder key and none was supplied
    #[error("No API key provided. Pass --api-key or set GOOGLE_CIVIC_API_KEY")]
    MissingApiKey,

    /// No `--cache-dir` and no platform cache directory
    #[error("Could not determine a cache directory. Pass --cache-dir or set CIVICLOOKUP_CACHE_DIR")]
    NoCacheDir,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// civiclookup - Find the members of Congress who represent an address
#[derive(Parser, Debug)]
#[command(name = "civiclookup")]
#[command(about = "Find the members of Congress who represent a U.S. address")]
#[command(version)]
pub struct Cli {
    /// Google Civic Information API key
    #[arg(long, env = "GOOGLE_CIVIC_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Directory for the cached legislator roster
    #[arg(long, env = "CIVICLOOKUP_CACHE_DIR", value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "CIVICLOOKUP_TIMEOUT", value_name = "SECONDS", default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Hours before a cached roster is considered stale
    #[arg(long, env = "CIVICLOOKUP_MAX_AGE_HOURS", value_name = "HOURS", default_value_t = 24, global = true)]
    pub max_age_hours: u32,

    /// Base URL of the divisions geocoder
    #[arg(long, env = "CIVICLOOKUP_CIVIC_URL", hide = true, global = true)]
    pub civic_url: Option<String>,

    /// Base URL of the legislator dataset
    #[arg(long, env = "CIVICLOOKUP_DATASET_URL", hide = true, global = true)]
    pub dataset_url: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the legislators representing an address
    ///
    /// Examples:
    ///   civiclookup lookup "1600 Pennsylvania Ave NW, Washington, DC 20500"
    ///   civiclookup lookup 1 Main St Burlington VT --format json
    ///   civiclookup lookup "..." --keep-fields full_name,party,phone
    Lookup(LookupArgs),

    /// Download the legislator roster and replace the cache
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Street address; multiple words are joined with spaces
    #[arg(required = true, value_name = "ADDRESS")]
    pub address: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

impl LookupArgs {
    pub fn address(&self) -> String {
        self.address.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Jurisdiction to refresh
    #[arg(long, default_value = "us")]
    pub jurisdiction: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

impl UpdateArgs {
    pub fn jurisdiction(&self) -> Result<Jurisdiction, CliError> {
        Ok(self.jurisdiction.parse()?)
    }
}

/// Mutually exclusive keep/delete field lists
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Only include these fields (comma-separated or repeated)
    #[arg(long, value_name = "FIELD", value_delimiter = ',', conflicts_with = "delete_fields")]
    pub keep_fields: Option<Vec<String>>,

    /// Exclude these fields (comma-separated or repeated)
    #[arg(long, value_name = "FIELD", value_delimiter = ',')]
    pub delete_fields: Option<Vec<String>>,
}

impl FieldArgs {
    /// Validates the field names against the legislator schema
    pub fn filter(&self) -> Result<FieldFilter, CliError> {
        Ok(FieldFilter::from_lists(
            self.keep_fields.as_deref(),
            self.delete_fields.as_deref(),
        )?)
    }
}
