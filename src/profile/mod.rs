//! Profiling primitives for triple tables and co-occurrence matrices.

mod frequency;
mod sparsity;

pub use frequency::{profile_frequencies, FrequencyProfile};
pub use sparsity::{profile_sparsity, SparsityProfile};
