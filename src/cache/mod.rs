//! Cache module for storing legislator rosters on disk
//!
//! The cache store is created once at startup and handed to both the
//! dataset refresher (the only writer) and the district resolver (a reader).

mod manager;

pub use manager::{CacheError, CacheManager};
