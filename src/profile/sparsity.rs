//! Sparsity profiling for co-occurrence matrices.

use crate::data::CoocMatrix;
use serde::{Deserialize, Serialize};

/// Profile of sparsity characteristics in a co-occurrence matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparsityProfile {
    /// Total number of entries (rows × columns).
    pub total_entries: usize,
    /// Number of non-zero entries.
    pub nonzero_entries: usize,
    /// Number of zero entries.
    pub zero_entries: usize,
    /// Overall sparsity (proportion of zeros).
    pub sparsity: f64,
    /// Mean sparsity across rows.
    pub mean_row_sparsity: f64,
    /// Mean sparsity across columns.
    pub mean_col_sparsity: f64,
}

impl SparsityProfile {
    /// Check if the matrix is highly sparse (> 50% zeros).
    pub fn is_highly_sparse(&self) -> bool {
        self.sparsity > 0.5
    }
}

impl std::fmt::Display for SparsityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sparsity Profile")?;
        writeln!(f, "  Total entries:    {}", self.total_entries)?;
        writeln!(f, "  Non-zero entries: {}", self.nonzero_entries)?;
        writeln!(f, "  Zero entries:     {}", self.zero_entries)?;
        writeln!(f, "  Overall sparsity: {:.2}%", self.sparsity * 100.0)?;
        writeln!(f, "  Mean row sparsity:    {:.2}%", self.mean_row_sparsity * 100.0)?;
        writeln!(f, "  Mean column sparsity: {:.2}%", self.mean_col_sparsity * 100.0)?;
        Ok(())
    }
}

/// Profile sparsity characteristics of a co-occurrence matrix.
pub fn profile_sparsity(matrix: &CoocMatrix) -> SparsityProfile {
    let n_rows = matrix.n_rows();
    let n_cols = matrix.n_cols();
    let total_entries = n_rows * n_cols;
    let nonzero_entries = matrix.nnz();
    let zero_entries = total_entries - nonzero_entries;
    let sparsity = if total_entries > 0 {
        zero_entries as f64 / total_entries as f64
    } else {
        0.0
    };

    let row_sparsity: Vec<f64> = (0..n_rows)
        .map(|row| {
            let row_nnz = matrix
                .data()
                .outer_view(row)
                .map(|v| v.nnz())
                .unwrap_or(0);
            (n_cols - row_nnz) as f64 / n_cols.max(1) as f64
        })
        .collect();

    let mut col_nnz = vec![0usize; n_cols];
    for row_vec in matrix.data().outer_iterator() {
        for (col, _) in row_vec.iter() {
            col_nnz[col] += 1;
        }
    }
    let col_sparsity: Vec<f64> = col_nnz
        .iter()
        .map(|&nnz| (n_rows - nnz) as f64 / n_rows.max(1) as f64)
        .collect();

    let mean_row_sparsity = if n_rows > 0 {
        row_sparsity.iter().sum::<f64>() / n_rows as f64
    } else {
        0.0
    };
    let mean_col_sparsity = if n_cols > 0 {
        col_sparsity.iter().sum::<f64>() / n_cols as f64
    } else {
        0.0
    };

    SparsityProfile {
        total_entries,
        nonzero_entries,
        zero_entries,
        sparsity,
        mean_row_sparsity,
        mean_col_sparsity,
    }
}
