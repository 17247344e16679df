//! Pruning of disconnected entities from co-occurrence matrices.

mod disconnected;

pub use disconnected::{prune_disconnected, prune_disconnected_with_stats, PruneResult};
