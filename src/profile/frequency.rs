//! Frequency distribution profiling for triple tables.

use crate::data::TripleTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Profile of the frequency distribution in a triple table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyProfile {
    /// Number of triples.
    pub n_triples: usize,
    /// Number of distinct entity_1 values.
    pub n_entity_1: usize,
    /// Number of distinct entity_2 values.
    pub n_entity_2: usize,
    /// Sum of all frequencies.
    pub total_frequency: u64,
    /// Minimum frequency.
    pub min: u64,
    /// Maximum frequency.
    pub max: u64,
    /// Mean frequency.
    pub mean: f64,
    /// Median frequency.
    pub median: f64,
}

impl std::fmt::Display for FrequencyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Frequency Profile")?;
        writeln!(f, "  Triples:           {}", self.n_triples)?;
        writeln!(f, "  Distinct entity_1: {}", self.n_entity_1)?;
        writeln!(f, "  Distinct entity_2: {}", self.n_entity_2)?;
        writeln!(f, "  Total frequency:   {}", self.total_frequency)?;
        writeln!(f, "  Range:             {} - {}", self.min, self.max)?;
        writeln!(f, "  Mean:              {:.1}", self.mean)?;
        writeln!(f, "  Median:            {:.1}", self.median)?;
        Ok(())
    }
}

/// Profile the frequency distribution of a triple table.
pub fn profile_frequencies(table: &TripleTable) -> FrequencyProfile {
    let n_triples = table.len();
    let entity_1: HashSet<&str> = table.iter().map(|t| t.entity_1.as_str()).collect();
    let entity_2: HashSet<&str> = table.iter().map(|t| t.entity_2.as_str()).collect();

    let mut frequencies = table.frequencies();
    frequencies.sort_unstable();

    let total_frequency: u64 = frequencies.iter().sum();
    let min = frequencies.first().copied().unwrap_or(0);
    let max = frequencies.last().copied().unwrap_or(0);
    let mean = if n_triples > 0 {
        total_frequency as f64 / n_triples as f64
    } else {
        0.0
    };

    FrequencyProfile {
        n_triples,
        n_entity_1: entity_1.len(),
        n_entity_2: entity_2.len(),
        total_frequency,
        min,
        max,
        mean,
        median: median(&frequencies),
    }
}

fn median(sorted: &[u64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    } else {
        sorted[n / 2] as f64
    }
}
