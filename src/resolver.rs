//! Address to representatives resolution
//!
//! `resolve` runs the lookup pipeline in order: geocode the address, make
//! sure the jurisdiction's cached roster is fresh, match divisions against
//! it, and project the matches through the output field filter. A failure
//! at any step aborts the lookup; stale or partial data is never returned.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::data::{
    DatasetSource, DivisionId, FieldFilter, GeocodeError, Geocoder, Jurisdiction,
    MatchedRepresentative, UnsupportedJurisdiction,
};
use crate::matching::DivisionIndex;
use crate::refresh::{DatasetRefresher, RefreshError};

/// Successful outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Matched legislators, never empty, in output order
    Found(Vec<MatchedRepresentative>),
    /// The geocoder returned no divisions for the address
    NoDistricts,
    /// Divisions were found but no cached legislator represents them
    NoMatches { divisions: Vec<DivisionId> },
}

impl Resolution {
    /// Matched legislators; empty for the no-result variants
    pub fn representatives(&self) -> &[MatchedRepresentative] {
        match self {
            Resolution::Found(reps) => reps,
            Resolution::NoDistricts | Resolution::NoMatches { .. } => &[],
        }
    }
}

/// Errors that abort a lookup
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The geocoder failed or returned unusable divisions
    #[error("Could not geocode '{address}': {source}")]
    Geocode {
        address: String,
        #[source]
        source: GeocodeError,
    },

    /// The address lies outside every supported jurisdiction
    #[error("Address '{address}' is outside supported jurisdictions: {source}")]
    UnsupportedJurisdiction {
        address: String,
        #[source]
        source: UnsupportedJurisdiction,
    },

    /// The cached roster was missing or stale and could not be refreshed
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Appends a country hint unless the address already names the USA
pub fn with_country_hint(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.to_ascii_uppercase().contains("USA") {
        trimmed.to_string()
    } else {
        format!("{}, USA", trimmed)
    }
}

/// Resolves addresses to the legislators that represent them
#[derive(Debug)]
pub struct DistrictResolver<G, S> {
    geocoder: G,
    refresher: DatasetRefresher<S>,
    refresh_filter: FieldFilter,
}

impl<G: Geocoder, S: DatasetSource> DistrictResolver<G, S> {
    pub fn new(geocoder: G, refresher: DatasetRefresher<S>) -> Self {
        Self {
            geocoder,
            refresher,
            refresh_filter: FieldFilter::All,
        }
    }

    /// Field filter applied when a lookup has to refresh the cache
    pub fn with_refresh_filter(mut self, filter: FieldFilter) -> Self {
        self.refresh_filter = filter;
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn refresher(&self) -> &DatasetRefresher<S> {
        &self.refresher
    }

    /// Looks up the legislators representing `address`
    pub async fn resolve(
        &self,
        address: &str,
        output_filter: &FieldFilter,
    ) -> Result<Resolution, ResolveError> {
        let query = with_country_hint(address);
        let geocode_err = |source: GeocodeError| ResolveError::Geocode {
            address: address.to_string(),
            source,
        };

        let divisions = self
            .geocoder
            .divisions(&query)
            .await
            .map_err(geocode_err)?;
        tracing::debug!(address, count = divisions.len(), "geocoded address");

        if divisions.is_empty() {
            tracing::info!(address, "no divisions found for address");
            return Ok(Resolution::NoDistricts);
        }

        let jurisdiction = infer_jurisdiction(&divisions).map_err(|e| match e {
            JurisdictionError::Geocode(source) => geocode_err(source),
            JurisdictionError::Unsupported(source) => ResolveError::UnsupportedJurisdiction {
                address: address.to_string(),
                source,
            },
        })?;

        let roster = self
            .refresher
            .ensure_fresh(jurisdiction, &self.refresh_filter)
            .await?;
        tracing::debug!(
            jurisdiction = %jurisdiction,
            legislators = roster.legislators.len(),
            "cache validated"
        );

        let index = DivisionIndex::build(&roster.legislators);
        let matched = index.match_all(&divisions);
        tracing::debug!(address, matched = matched.len(), "matched divisions");

        if matched.is_empty() {
            return Ok(Resolution::NoMatches { divisions });
        }

        Ok(Resolution::Found(
            matched
                .into_iter()
                .map(|legislator| legislator.project(output_filter))
                .collect(),
        ))
    }
}

enum JurisdictionError {
    Geocode(GeocodeError),
    Unsupported(UnsupportedJurisdiction),
}

/// The single jurisdiction all divisions belong to
fn infer_jurisdiction(divisions: &[DivisionId]) -> Result<Jurisdiction, JurisdictionError> {
    let mut countries = BTreeSet::new();
    for division in divisions {
        let country = division.country().ok_or_else(|| {
            JurisdictionError::Geocode(GeocodeError::MissingCountry {
                id: division.to_string(),
            })
        })?;
        countries.insert(country);
    }

    let mut countries = countries.into_iter();
    match (countries.next(), countries.next()) {
        (Some(country), None) => {
            Jurisdiction::from_country(country).map_err(JurisdictionError::Unsupported)
        }
        (first, second) => {
            let countries = first
                .into_iter()
                .chain(second)
                .chain(countries)
                .map(str::to_string)
                .collect();
            Err(JurisdictionError::Geocode(GeocodeError::Ambiguous { countries }))
        }
    }
}
