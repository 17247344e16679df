//! Filtering primitives for triple tables and co-occurrence matrices.

pub mod exclusion;
pub mod frequency;

pub use exclusion::{
    filter_exclusions, filter_exclusions_with_stats, zero_cross_matches, ExclusionFilterResult,
    ExclusionSpec,
};
pub use frequency::{
    filter_frequency, filter_frequency_with_stats, FilteredTriples, FrequencyFilterResult,
};
