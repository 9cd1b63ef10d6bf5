//! Core data models and API clients for civiclookup
//!
//! This module contains the types used throughout the lookup pipeline for
//! representing division identifiers, legislators and cached rosters, plus
//! the clients for the geocoding service and the legislator dataset.

pub mod civic;
pub mod congress;
pub mod division;
pub mod fields;
pub mod legislator;

pub use civic::{CivicClient, GeocodeError, Geocoder, CIVIC_API_BASE_URL};
pub use congress::{CongressClient, DatasetSource, FetchError, DATASET_BASE_URL};
pub use division::{DivisionError, DivisionId};
pub use fields::{FieldFilter, FieldFilterError, LegislatorField};
pub use legislator::{Chamber, Legislator, MatchedRepresentative, Role};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default validity period of a cached roster
pub const STALENESS_WINDOW_HOURS: i64 = 24;

/// Error for jurisdiction codes this tool has no dataset for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported jurisdiction '{0}'. Supported: us")]
pub struct UnsupportedJurisdiction(pub String);

/// A top-level scope with its own legislator dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    /// United States federal legislature
    Us,
}

impl Jurisdiction {
    /// Cache key and OCD country code
    pub fn code(self) -> &'static str {
        match self {
            Jurisdiction::Us => "us",
        }
    }

    /// Maps the `country` segment of a division identifier
    pub fn from_country(country: &str) -> Result<Self, UnsupportedJurisdiction> {
        country.parse()
    }
}

impl FromStr for Jurisdiction {
    type Err = UnsupportedJurisdiction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Jurisdiction::Us),
            _ => Err(UnsupportedJurisdiction(s.to_string())),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A jurisdiction's legislators as stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub jurisdiction: Jurisdiction,
    /// When the dataset was fetched from the remote source
    pub fetched_at: DateTime<Utc>,
    /// Filter the profiles were pruned with; a stale roster is refetched with it
    #[serde(default)]
    pub field_filter: FieldFilter,
    pub legislators: Vec<Legislator>,
}

impl Roster {
    pub fn new(jurisdiction: Jurisdiction, legislators: Vec<Legislator>) -> Self {
        Self {
            jurisdiction,
            fetched_at: Utc::now(),
            field_filter: FieldFilter::All,
            legislators,
        }
    }

    pub fn with_field_filter(mut self, filter: FieldFilter) -> Self {
        self.field_filter = filter;
        self
    }

    /// Valid only while `now - fetched_at < window`
    pub fn is_fresh_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.fetched_at < window
    }

    pub fn count(&self, role: Role) -> usize {
        self.legislators.iter().filter(|l| l.role == role).count()
    }
}
