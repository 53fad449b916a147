//! Charm and bundle identifier types.
//!
//! This module contains:
//! - `CharmId`, the owner/series/name/revision tuple
//! - `SeriesSet`, the injected set of series recognised in id paths
//! - The id grammar and the id-path splitter used by the router

mod parser;
mod types;
#[cfg(test)]
mod types_proptest;

pub use parser::split_id;
pub use types::*;
