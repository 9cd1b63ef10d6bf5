//! Open Civic Data division identifiers
//!
//! A division identifier names a political geography as a path of
//! `type:value` segments, e.g. `ocd-division/country:us/state:ca/cd:12`.
//! The leading `ocd-division/` is optional when parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Prefix used by the geocoder and in the cache
const OCD_PREFIX: &str = "ocd-division/";

/// Errors produced while parsing a division identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DivisionError {
    /// The identifier contained no segments
    #[error("Empty division identifier")]
    Empty,

    /// A segment was not of the form `type:value`
    #[error("Malformed segment '{segment}' in division identifier '{input}'")]
    MalformedSegment { input: String, segment: String },
}

/// One `type:value` step of a division path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub kind: String,
    pub value: String,
}

/// A parsed, lowercased division identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DivisionId {
    segments: Vec<Segment>,
}

impl DivisionId {
    /// Builds an identifier from `(type, value)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            segments: pairs
                .into_iter()
                .map(|(kind, value)| Segment {
                    kind: kind.to_ascii_lowercase(),
                    value: value.to_ascii_lowercase(),
                })
                .collect(),
        }
    }

    /// Division of a U.S. state or state-like entity (`country:us/state:xx`)
    pub fn us_state(state: &str) -> Self {
        Self::from_pairs([("country", "us"), ("state", state)])
    }

    /// Returns a new identifier with one more segment appended
    pub fn child(&self, kind: &str, value: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment {
            kind: kind.to_ascii_lowercase(),
            value: value.to_ascii_lowercase(),
        });
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments; `country:us` has depth 1
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The `country` segment value, if the path starts with one
    pub fn country(&self) -> Option<&str> {
        self.segments
            .first()
            .filter(|s| s.kind == "country")
            .map(|s| s.value.as_str())
    }

    /// Value of the first segment of the given type
    pub fn value_of(&self, kind: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.value.as_str())
    }

    /// True if `self` is `other` or one of its ancestors
    pub fn contains(&self, other: &DivisionId) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// This identifier followed by each ancestor, most specific first
    pub fn lineage(&self) -> impl Iterator<Item = DivisionId> + '_ {
        (1..=self.segments.len()).rev().map(move |len| DivisionId {
            segments: self.segments[..len].to_vec(),
        })
    }
}

impl FromStr for DivisionId {
    type Err = DivisionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let path = trimmed.strip_prefix(OCD_PREFIX).unwrap_or(trimmed);

        let mut segments = Vec::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let (kind, value) = part
                .split_once(':')
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(|| DivisionError::MalformedSegment {
                    input: input.to_string(),
                    segment: part.to_string(),
                })?;
            segments.push(Segment {
                kind: kind.to_ascii_lowercase(),
                value: value.to_ascii_lowercase(),
            });
        }

        if segments.is_empty() {
            return Err(DivisionError::Empty);
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for DivisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(OCD_PREFIX.trim_end_matches('/'))?;
        for segment in &self.segments {
            write!(f, "/{}:{}", segment.kind, segment.value)?;
        }
        Ok(())
    }
}

impl Serialize for DivisionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DivisionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
