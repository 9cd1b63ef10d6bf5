//! civiclookup library
//!
//! Resolves a U.S. street address to the members of Congress who represent
//! it. The geocoder reports political divisions for the address; those are
//! matched against a locally cached legislator roster that is refreshed
//! from the public congress-legislators dataset once it is a day old.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod matching;
pub mod output;
pub mod refresh;
pub mod resolver;

#[cfg(test)]
mod test_support;
