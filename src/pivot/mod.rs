//! Aggregation and pivoting of triples into a labeled matrix.

mod cooccurrence;

pub use cooccurrence::{pivot_cooccurrence, PivotOptions};
