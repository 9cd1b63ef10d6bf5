//! In-memory collaborators and fixtures for unit tests

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::{
    DatasetSource, DivisionId, FetchError, GeocodeError, Geocoder, Jurisdiction, Legislator,
    LegislatorField, Role,
};

pub fn legislator(
    id: &str,
    first: &str,
    last: &str,
    role: Role,
    state: &str,
    district: Option<u32>,
    party: &str,
) -> Legislator {
    Legislator {
        bioguide_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role,
        state: state.to_string(),
        district,
        divisions: Legislator::seat_divisions(role, state, district),
        profile: BTreeMap::from([
            (
                LegislatorField::FullName,
                Value::from(format!("{} {}", first, last)),
            ),
            (LegislatorField::Party, Value::from(party)),
            (LegislatorField::Phone, Value::from("202-224-0000")),
        ]),
    }
}

/// A small roster covering states, numbered districts, at-large seats and DC
pub fn sample_roster() -> Vec<Legislator> {
    vec![
        legislator("P000145", "Alex", "Padilla", Role::Senator, "CA", None, "Democrat"),
        legislator("S001150", "Adam", "Schiff", Role::Senator, "CA", None, "Democrat"),
        legislator("P000197", "Nancy", "Pelosi", Role::Representative, "CA", Some(11), "Democrat"),
        legislator("S001231", "Lateefah", "Simon", Role::Representative, "CA", Some(12), "Democrat"),
        legislator("N000147", "Eleanor", "Norton", Role::Representative, "DC", Some(0), "Democrat"),
        legislator("S000033", "Bernard", "Sanders", Role::Senator, "VT", None, "Independent"),
        legislator("W000800", "Peter", "Welch", Role::Senator, "VT", None, "Democrat"),
        legislator("B001318", "Becca", "Balint", Role::Representative, "VT", Some(0), "Democrat"),
        legislator("S000148", "Charles", "Schumer", Role::Senator, "NY", None, "Democrat"),
        legislator("G000555", "Kirsten", "Gillibrand", Role::Senator, "NY", None, "Democrat"),
    ]
}

/// Dataset source returning a fixed roster and counting calls
pub struct FakeSource {
    legislators: Option<Vec<Legislator>>,
    calls: Cell<usize>,
}

impl FakeSource {
    pub fn new(legislators: Vec<Legislator>) -> Self {
        Self {
            legislators: Some(legislators),
            calls: Cell::new(0),
        }
    }

    /// A source whose every fetch fails with HTTP 503
    pub fn failing() -> Self {
        Self {
            legislators: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl DatasetSource for FakeSource {
    async fn fetch_roster(&self, _jurisdiction: Jurisdiction) -> Result<Vec<Legislator>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.legislators.clone().ok_or_else(|| FetchError::Status {
            url: "https://example.invalid/legislators-current.json".to_string(),
            status: 503,
        })
    }
}

/// Geocoder returning fixed division identifiers
pub struct FakeGeocoder {
    divisions: Option<Vec<String>>,
    calls: Cell<usize>,
    last_address: RefCell<Option<String>>,
}

impl FakeGeocoder {
    pub fn new(divisions: &[&str]) -> Self {
        Self {
            divisions: Some(divisions.iter().map(|d| d.to_string()).collect()),
            calls: Cell::new(0),
            last_address: RefCell::new(None),
        }
    }

    /// A geocoder that rejects its API key
    pub fn unauthorized() -> Self {
        Self {
            divisions: None,
            calls: Cell::new(0),
            last_address: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_address(&self) -> Option<String> {
        self.last_address.borrow().clone()
    }
}

impl Geocoder for FakeGeocoder {
    async fn divisions(&self, address: &str) -> Result<Vec<DivisionId>, GeocodeError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_address.borrow_mut() = Some(address.to_string());

        let divisions = self.divisions.as_ref().ok_or_else(|| GeocodeError::InvalidApiKey {
            status: 403,
            message: "API key not valid".to_string(),
        })?;
        divisions
            .iter()
            .map(|id| {
                id.parse::<DivisionId>()
                    .map_err(|source| GeocodeError::InvalidDivision {
                        id: id.clone(),
                        source,
                    })
            })
            .collect()
    }
}
