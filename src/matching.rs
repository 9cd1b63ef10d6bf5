//! Longest-prefix matching of divisions to legislators
//!
//! Legislators are indexed under every division identifier they represent.
//! A division then matches at the most specific level of its lineage that
//! has any legislator indexed; every legislator at that level is returned.
//! A legislator indexed below the division (more specific than what the
//! geocoder reported) never matches it.

use std::collections::BTreeMap;

use crate::data::{DivisionId, Legislator};

/// Division identifier to legislator lookup
#[derive(Debug, Default)]
pub struct DivisionIndex<'a> {
    by_division: BTreeMap<DivisionId, Vec<&'a Legislator>>,
}

impl<'a> DivisionIndex<'a> {
    pub fn build(legislators: &'a [Legislator]) -> Self {
        let mut by_division: BTreeMap<DivisionId, Vec<&'a Legislator>> = BTreeMap::new();
        for legislator in legislators {
            for division in &legislator.divisions {
                let entry = by_division.entry(division.clone()).or_default();
                if !entry.iter().any(|l| l.bioguide_id == legislator.bioguide_id) {
                    entry.push(legislator);
                }
            }
        }
        Self { by_division }
    }

    /// Number of distinct division identifiers indexed
    pub fn len(&self) -> usize {
        self.by_division.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_division.is_empty()
    }

    /// Legislators at the most specific indexed level of `division`
    ///
    /// An exact match wins; otherwise the closest ancestor with any
    /// legislators. Ties at that level are all returned.
    pub fn lookup(&self, division: &DivisionId) -> &[&'a Legislator] {
        division
            .lineage()
            .find_map(|level| self.by_division.get(&level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of [`lookup`](Self::lookup) over all divisions
    ///
    /// Duplicates collapse by `bioguide_id`. The result is in output order:
    /// senators first, then by surname.
    pub fn match_all(&self, divisions: &[DivisionId]) -> Vec<&'a Legislator> {
        let mut matched: BTreeMap<&'a str, &'a Legislator> = BTreeMap::new();
        for division in divisions {
            for legislator in self.lookup(division) {
                matched.insert(legislator.bioguide_id.as_str(), *legislator);
            }
        }

        let mut result: Vec<&'a Legislator> = matched.into_values().collect();
        result.sort_by(|a, b| a.output_order(b));
        result
    }
}
