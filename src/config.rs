//! Runtime configuration assembled from CLI flags and environment

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheManager;
use crate::cli::{Cli, CliError};
use crate::data::{CivicClient, CongressClient, CIVIC_API_BASE_URL, DATASET_BASE_URL};

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub cache_dir: PathBuf,
    pub civic_url: String,
    pub dataset_url: String,
    pub timeout: Duration,
    pub staleness_window: chrono::Duration,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// Environment variables are already folded in by clap. Fails only when
    /// no cache directory can be determined.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => CacheManager::new()
                .map(|cache| cache.cache_dir().to_path_buf())
                .ok_or(CliError::NoCacheDir)?,
        };

        Ok(Config {
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            cache_dir,
            civic_url: cli
                .civic_url
                .clone()
                .unwrap_or_else(|| CIVIC_API_BASE_URL.to_string()),
            dataset_url: cli
                .dataset_url
                .clone()
                .unwrap_or_else(|| DATASET_BASE_URL.to_string()),
            timeout: Duration::from_secs(cli.timeout),
            staleness_window: chrono::Duration::hours(i64::from(cli.max_age_hours)),
        })
    }

    pub fn cache(&self) -> CacheManager {
        CacheManager::with_dir(self.cache_dir.clone())
    }

    /// HTTP client shared by both remote collaborators
    pub fn http_client(&self) -> Result<reqwest::Client, CliError> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("civiclookup/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }

    /// Geocoder client; requires an API key
    pub fn civic_client(&self, client: reqwest::Client) -> Result<CivicClient, CliError> {
        let api_key = self.api_key.clone().ok_or(CliError::MissingApiKey)?;
        Ok(CivicClient::with_client(client, api_key).with_base_url(&self.civic_url))
    }

    pub fn congress_client(&self, client: reqwest::Client) -> CongressClient {
        CongressClient::with_client(client).with_base_url(&self.dataset_url)
    }
}
