//! Analysis modules.
//!
//! Line segmentation of staged text and aggregation of per-line outcomes.

pub mod aggregator;
pub mod segment;

pub use aggregator::*;
