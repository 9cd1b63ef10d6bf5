//! Legislator field schema and keep/delete field filtering
//!
//! Every field a legislator record can carry is enumerated in
//! [`LegislatorField`]. A [`FieldFilter`] is validated against that schema
//! when it is built, so a typo in `--keep-fields` fails up front instead of
//! silently producing empty records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field of a legislator record, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegislatorField {
    BioguideId,
    FirstName,
    MiddleName,
    LastName,
    Suffix,
    Nickname,
    FullName,
    Role,
    Title,
    State,
    District,
    Party,
    Divisions,
    Gender,
    Birthday,
    Phone,
    Address,
    Office,
    Url,
    ContactForm,
    RssUrl,
    TermStart,
    TermEnd,
    SenateClass,
    StateRank,
    Twitter,
    Facebook,
    Youtube,
    Instagram,
    GovtrackId,
    OpensecretsId,
    VotesmartId,
    WikipediaId,
    BallotpediaId,
    FecIds,
}

impl LegislatorField {
    /// The full schema, in output order
    pub const ALL: [LegislatorField; 35] = [
        LegislatorField::BioguideId,
        LegislatorField::FirstName,
        LegislatorField::MiddleName,
        LegislatorField::LastName,
        LegislatorField::Suffix,
        LegislatorField::Nickname,
        LegislatorField::FullName,
        LegislatorField::Role,
        LegislatorField::Title,
        LegislatorField::State,
        LegislatorField::District,
        LegislatorField::Party,
        LegislatorField::Divisions,
        LegislatorField::Gender,
        LegislatorField::Birthday,
        LegislatorField::Phone,
        LegislatorField::Address,
        LegislatorField::Office,
        LegislatorField::Url,
        LegislatorField::ContactForm,
        LegislatorField::RssUrl,
        LegislatorField::TermStart,
        LegislatorField::TermEnd,
        LegislatorField::SenateClass,
        LegislatorField::StateRank,
        LegislatorField::Twitter,
        LegislatorField::Facebook,
        LegislatorField::Youtube,
        LegislatorField::Instagram,
        LegislatorField::GovtrackId,
        LegislatorField::OpensecretsId,
        LegislatorField::VotesmartId,
        LegislatorField::WikipediaId,
        LegislatorField::BallotpediaId,
        LegislatorField::FecIds,
    ];

    /// Field name as used on the command line and in output records
    pub fn as_str(self) -> &'static str {
        match self {
            LegislatorField::BioguideId => "bioguide_id",
            LegislatorField::FirstName => "first_name",
            LegislatorField::MiddleName => "middle_name",
            LegislatorField::LastName => "last_name",
            LegislatorField::Suffix => "suffix",
            LegislatorField::Nickname => "nickname",
            LegislatorField::FullName => "full_name",
            LegislatorField::Role => "role",
            LegislatorField::Title => "title",
            LegislatorField::State => "state",
            LegislatorField::District => "district",
            LegislatorField::Party => "party",
            LegislatorField::Divisions => "divisions",
            LegislatorField::Gender => "gender",
            LegislatorField::Birthday => "birthday",
            LegislatorField::Phone => "phone",
            LegislatorField::Address => "address",
            LegislatorField::Office => "office",
            LegislatorField::Url => "url",
            LegislatorField::ContactForm => "contact_form",
            LegislatorField::RssUrl => "rss_url",
            LegislatorField::TermStart => "term_start",
            LegislatorField::TermEnd => "term_end",
            LegislatorField::SenateClass => "senate_class",
            LegislatorField::StateRank => "state_rank",
            LegislatorField::Twitter => "twitter",
            LegislatorField::Facebook => "facebook",
            LegislatorField::Youtube => "youtube",
            LegislatorField::Instagram => "instagram",
            LegislatorField::GovtrackId => "govtrack_id",
            LegislatorField::OpensecretsId => "opensecrets_id",
            LegislatorField::VotesmartId => "votesmart_id",
            LegislatorField::WikipediaId => "wikipedia_id",
            LegislatorField::BallotpediaId => "ballotpedia_id",
            LegislatorField::FecIds => "fec_ids",
        }
    }

    /// Structural fields are stored on the record itself and survive
    /// cache-time filtering, since matching and ordering depend on them
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            LegislatorField::BioguideId
                | LegislatorField::FirstName
                | LegislatorField::LastName
                | LegislatorField::Role
                | LegislatorField::Title
                | LegislatorField::State
                | LegislatorField::District
                | LegislatorField::Divisions
        )
    }

    /// Comma-separated list of every field name, for error messages
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LegislatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegislatorField {
    type Err = FieldFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| FieldFilterError::UnknownField {
                name: s.to_string(),
                available: Self::available(),
            })
    }
}

/// Errors raised while building a field filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldFilterError {
    /// A field name is not part of the legislator schema
    #[error("Invalid field '{name}'. Available fields: {available}")]
    UnknownField { name: String, available: String },

    /// Both keep and delete lists were supplied
    #[error("--keep-fields and --delete-fields are mutually exclusive")]
    Conflicting,
}

/// Projection over the legislator schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFilter {
    /// Every field is kept
    #[default]
    All,
    /// Only these fields are kept
    Keep(BTreeSet<LegislatorField>),
    /// These fields are removed, all others kept
    Delete(BTreeSet<LegislatorField>),
}

impl FieldFilter {
    /// Builds a filter from raw field names
    ///
    /// An empty or absent list means "no filtering". Supplying both lists is
    /// an error, as is any name outside [`LegislatorField::ALL`].
    pub fn from_lists<S: AsRef<str>>(
        keep: Option<&[S]>,
        delete: Option<&[S]>,
    ) -> Result<Self, FieldFilterError> {
        let keep = keep.filter(|k| !k.is_empty());
        let delete = delete.filter(|d| !d.is_empty());

        match (keep, delete) {
            (Some(_), Some(_)) => Err(FieldFilterError::Conflicting),
            (Some(names), None) => Ok(FieldFilter::Keep(parse_names(names)?)),
            (None, Some(names)) => Ok(FieldFilter::Delete(parse_names(names)?)),
            (None, None) => Ok(FieldFilter::All),
        }
    }

    /// Whether the given field passes the filter
    pub fn allows(&self, field: LegislatorField) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Keep(fields) => fields.contains(&field),
            FieldFilter::Delete(fields) => !fields.contains(&field),
        }
    }

    /// Fields that pass the filter, in schema order
    pub fn selected(&self) -> Vec<LegislatorField> {
        LegislatorField::ALL
            .iter()
            .copied()
            .filter(|f| self.allows(*f))
            .collect()
    }

    /// Short description for log and summary lines
    pub fn describe(&self) -> Option<String> {
        let join = |fields: &BTreeSet<LegislatorField>| {
            fields
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            FieldFilter::All => None,
            FieldFilter::Keep(fields) => Some(format!("keeping only: {}", join(fields))),
            FieldFilter::Delete(fields) => Some(format!("excluding: {}", join(fields))),
        }
    }
}

fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<LegislatorField>, FieldFilterError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}
