//! Legislator records and their projection into output records

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::division::DivisionId;
use super::fields::{FieldFilter, LegislatorField};

/// State codes whose House member is a non-voting delegate
const DELEGATE_JURISDICTIONS: [&str; 5] = ["DC", "GU", "VI", "MP", "AS"];

/// Territories (as opposed to DC) that the geocoder reports as `territory:xx`
const TERRITORIES: [&str; 5] = ["PR", "GU", "VI", "MP", "AS"];

/// Congressional seat held by a legislator
///
/// Declaration order is the output grouping order: senators first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Senator,
    Representative,
}

/// Chamber of Congress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chamber {
    Senate,
    House,
}

impl Role {
    pub fn chamber(self) -> Chamber {
        match self {
            Role::Senator => Chamber::Senate,
            Role::Representative => Chamber::House,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Senator => "senator",
            Role::Representative => "representative",
        }
    }
}

/// A cached legislator profile
///
/// The named fields are structural: they drive matching and ordering and are
/// never pruned from the cache. Everything else lives in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    /// Congressional Biographical Directory id, the stable source key
    pub bioguide_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Two-letter postal code, uppercase
    pub state: String,
    /// House district number; 0 is at-large, `None` for senators
    pub district: Option<u32>,
    /// Division identifiers this legislator represents
    pub divisions: Vec<DivisionId>,
    #[serde(default)]
    pub profile: BTreeMap<LegislatorField, Value>,
}

impl Legislator {
    /// Division identifiers represented by a seat
    ///
    /// At-large seats map to the whole state, plus the `cd:al` form some
    /// geocoder responses use. DC and the territories also get the
    /// `district:`/`territory:` forms.
    pub fn seat_divisions(role: Role, state: &str, district: Option<u32>) -> Vec<DivisionId> {
        let state_div = DivisionId::us_state(state);
        let mut divisions = Vec::new();

        match (role, district) {
            (Role::Representative, Some(n)) if n > 0 => {
                divisions.push(state_div.child("cd", &n.to_string()));
            }
            (Role::Representative, _) => {
                divisions.push(state_div.clone());
                divisions.push(state_div.child("cd", "al"));
            }
            (Role::Senator, _) => divisions.push(state_div),
        }

        let upper = state.to_ascii_uppercase();
        if upper == "DC" {
            divisions.push(DivisionId::from_pairs([("country", "us"), ("district", "dc")]));
        } else if TERRITORIES.contains(&upper.as_str()) {
            divisions.push(DivisionId::from_pairs([
                ("country", "us"),
                ("territory", state),
            ]));
        }

        divisions
    }

    /// Formal title of the seat
    pub fn title(&self) -> &'static str {
        match self.role {
            Role::Senator => "Senator",
            Role::Representative if self.state == "PR" => "Resident Commissioner",
            Role::Representative if DELEGATE_JURISDICTIONS.contains(&self.state.as_str()) => {
                "Delegate"
            }
            Role::Representative => "Representative",
        }
    }

    /// `CA-12`, `WY-AL`, or the bare state code for senators
    pub fn district_label(&self) -> String {
        match (self.role, self.district) {
            (Role::Senator, _) => self.state.clone(),
            (Role::Representative, Some(n)) if n > 0 => format!("{}-{}", self.state, n),
            (Role::Representative, _) => format!("{}-AL", self.state),
        }
    }

    /// Value of any schema field, structural or profile
    pub fn field_value(&self, field: LegislatorField) -> Option<Value> {
        match field {
            LegislatorField::BioguideId => Some(Value::from(self.bioguide_id.clone())),
            LegislatorField::FirstName => Some(Value::from(self.first_name.clone())),
            LegislatorField::LastName => Some(Value::from(self.last_name.clone())),
            LegislatorField::Role => Some(Value::from(self.role.as_str())),
            LegislatorField::Title => Some(Value::from(self.title())),
            LegislatorField::State => Some(Value::from(self.state.clone())),
            LegislatorField::District => self.district.map(Value::from),
            LegislatorField::Divisions => Some(Value::Array(
                self.divisions
                    .iter()
                    .map(|d| Value::from(d.to_string()))
                    .collect(),
            )),
            other => self.profile.get(&other).cloned(),
        }
    }

    /// Drops profile fields the filter rejects
    pub fn prune(&mut self, filter: &FieldFilter) {
        self.profile.retain(|field, _| filter.allows(*field));
    }

    /// Output ordering: role group, surname, given name, then id
    pub fn output_order(&self, other: &Legislator) -> Ordering {
        self.role
            .cmp(&other.role)
            .then_with(|| {
                self.last_name
                    .to_lowercase()
                    .cmp(&other.last_name.to_lowercase())
            })
            .then_with(|| {
                self.first_name
                    .to_lowercase()
                    .cmp(&other.first_name.to_lowercase())
            })
            .then_with(|| self.bioguide_id.cmp(&other.bioguide_id))
    }

    /// Projects this record through an output filter
    pub fn project(&self, filter: &FieldFilter) -> MatchedRepresentative {
        let fields = filter
            .selected()
            .into_iter()
            .filter_map(|field| self.field_value(field).map(|value| (field, value)))
            .collect();

        MatchedRepresentative {
            bioguide_id: self.bioguide_id.clone(),
            role: self.role,
            fields,
        }
    }
}

/// A legislator matched to an address, shaped by the output field filter
///
/// Serializes as a map of the selected fields in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRepresentative {
    pub bioguide_id: String,
    pub role: Role,
    fields: Vec<(LegislatorField, Value)>,
}

impl MatchedRepresentative {
    pub fn get(&self, field: LegislatorField) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    /// String value of a field, if present and a string
    pub fn get_str(&self, field: LegislatorField) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = LegislatorField> + '_ {
        self.fields.iter().map(|(f, _)| *f)
    }
}

impl Serialize for MatchedRepresentative {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}
