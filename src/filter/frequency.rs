//! Percentile-based frequency filtering for triple tables.

use crate::data::{Triple, TripleTable};
use crate::error::{CoocError, Result};
use serde::{Deserialize, Serialize};

/// Outcome of frequency filtering.
///
/// Carries the surviving triples together with the numeric threshold that
/// was applied, so callers can audit the cut without recomputing it.
#[derive(Debug, Clone)]
pub struct FilteredTriples {
    /// Triples with frequency at or above the threshold, in input order.
    pub table: TripleTable,
    /// The frequency value at the requested percentile.
    pub threshold: f64,
}

/// Drop triples whose frequency falls below a percentile of the distribution.
///
/// The threshold is the `percentile`-quantile of the raw frequency column,
/// linearly interpolated between ranks, computed over ALL triples before any
/// aggregation. Triples with `fq >= threshold` survive: `percentile = 0.0`
/// keeps everything, `percentile = 1.0` keeps only triples at the maximum
/// observed frequency.
///
/// # Arguments
/// * `table` - The triple table to filter
/// * `percentile` - Percentile in [0, 1] of the frequency distribution
///
/// # Returns
/// The surviving triples plus the computed threshold.
pub fn filter_frequency(table: &TripleTable, percentile: f64) -> Result<FilteredTriples> {
    if !(0.0..=1.0).contains(&percentile) {
        return Err(CoocError::InvalidParameter(format!(
            "percentile must be between 0 and 1, got {}",
            percentile
        )));
    }
    if table.is_empty() {
        return Err(CoocError::EmptyMatrix(
            "cannot compute a frequency threshold over 0 triples".to_string(),
        ));
    }

    let mut sorted = table.frequencies();
    sorted.sort_unstable();
    let threshold = interpolated_percentile(&sorted, percentile);

    let kept: Vec<Triple> = table
        .iter()
        .filter(|t| t.fq as f64 >= threshold)
        .cloned()
        .collect();

    Ok(FilteredTriples {
        table: TripleTable::new(kept),
        threshold,
    })
}

/// Percentile of a sorted sample with linear interpolation between ranks.
fn interpolated_percentile(sorted: &[u64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0] as f64;
    }
    let rank = percentile * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    let lo_val = sorted[lo] as f64;
    let hi_val = sorted[hi] as f64;
    lo_val + frac * (hi_val - lo_val)
}

/// Result of frequency filtering with statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyFilterResult {
    /// Requested percentile.
    pub percentile: f64,
    /// Computed frequency threshold.
    pub threshold: f64,
    /// Number of triples before filtering.
    pub n_before: usize,
    /// Number of triples after filtering.
    pub n_after: usize,
    /// Number of triples removed.
    pub n_removed: usize,
    /// Proportion of triples retained.
    pub retention_rate: f64,
}

impl std::fmt::Display for FrequencyFilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Frequency Filter Result")?;
        writeln!(f, "  Percentile:       {:.2}", self.percentile)?;
        writeln!(f, "  Threshold:        {}", self.threshold)?;
        writeln!(f, "  Triples before:   {}", self.n_before)?;
        writeln!(f, "  Triples after:    {}", self.n_after)?;
        writeln!(f, "  Triples removed:  {}", self.n_removed)?;
        writeln!(f, "  Retention:        {:.1}%", self.retention_rate * 100.0)?;
        Ok(())
    }
}

/// Filter with statistics about what was filtered.
pub fn filter_frequency_with_stats(
    table: &TripleTable,
    percentile: f64,
) -> Result<(FilteredTriples, FrequencyFilterResult)> {
    let n_before = table.len();
    let filtered = filter_frequency(table, percentile)?;
    let n_after = filtered.table.len();

    let result = FrequencyFilterResult {
        percentile,
        threshold: filtered.threshold,
        n_before,
        n_after,
        n_removed: n_before - n_after,
        retention_rate: n_after as f64 / n_before as f64,
    };

    Ok((filtered, result))
}
