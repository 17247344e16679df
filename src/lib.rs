//! Entity Co-occurrence Matrix Construction
//!
//! This library converts pairwise entity co-occurrence counts
//! (entity_1, entity_2, frequency) into a cleaned, labeled co-occurrence
//! matrix suitable for downstream network or similarity analysis.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (TripleTable, CoocMatrix)
//! - **filter**: Frequency thresholding and label-based exclusion
//! - **pivot**: Aggregation and pivoting of triples into a matrix
//! - **prune**: Removal of disconnected entities
//! - **profile**: Data profiling (frequency distribution, sparsity)
//! - **pipeline**: Pipeline composition and execution
//!
//! # Example
//!
//! ```no_run
//! use cooc_matrix::prelude::*;
//!
//! // Load co-occurrence triples
//! let triples = TripleTable::from_csv("cooc.csv").unwrap();
//!
//! // Run the construction pipeline
//! let (matrix, report) = Pipeline::new()
//!     .name("envidis")
//!     .percentile(0.6)
//!     .lowercase(true)
//!     .exclude_rows(vec!["current".to_string(), "wave".to_string()])
//!     .run(&triples)
//!     .unwrap();
//!
//! matrix.to_csv("cooc_matrix.csv").unwrap();
//! eprintln!("{}", report);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod pivot;
pub mod profile;
pub mod prune;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{CoocMatrix, Triple, TripleTable};
    pub use crate::error::{CoocError, Result};
    pub use crate::filter::{
        // Frequency filtering
        filter_frequency, filter_frequency_with_stats, FilteredTriples, FrequencyFilterResult,
        // Exclusion filtering
        filter_exclusions, filter_exclusions_with_stats, zero_cross_matches,
        ExclusionFilterResult, ExclusionSpec,
    };
    pub use crate::pipeline::{run_build, Pipeline, PipelineConfig, RunReport};
    pub use crate::pivot::{pivot_cooccurrence, PivotOptions};
    pub use crate::profile::{
        profile_frequencies, profile_sparsity, FrequencyProfile, SparsityProfile,
    };
    pub use crate::prune::{prune_disconnected, prune_disconnected_with_stats, PruneResult};
}
