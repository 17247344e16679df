//! Removal of all-zero rows and columns.

use crate::data::CoocMatrix;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Remove disconnected entities from a matrix.
///
/// Rows that are all-zero across the current column set are removed first;
/// columns that are all-zero across the already-row-pruned matrix are removed
/// second. The ordering matters: a column connected only through removed rows
/// is still caught by the second pass. Idempotent, and an empty result is
/// valid output.
pub fn prune_disconnected(matrix: &CoocMatrix) -> Result<CoocMatrix> {
    let row_sums = matrix.row_sums();
    let keep_rows: Vec<usize> = (0..matrix.n_rows()).filter(|&r| row_sums[r] > 0).collect();
    let row_pruned = matrix.subset_rows(&keep_rows)?;

    let col_sums = row_pruned.col_sums();
    let keep_cols: Vec<usize> = (0..row_pruned.n_cols())
        .filter(|&c| col_sums[c] > 0)
        .collect();
    row_pruned.subset_cols(&keep_cols)
}

/// Result of pruning with statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneResult {
    /// Number of rows before pruning.
    pub n_rows_before: usize,
    /// Number of rows after pruning.
    pub n_rows_after: usize,
    /// Number of columns before pruning.
    pub n_cols_before: usize,
    /// Number of columns after pruning.
    pub n_cols_after: usize,
    /// Labels of removed rows.
    pub removed_rows: Vec<String>,
    /// Labels of removed columns.
    pub removed_cols: Vec<String>,
}

impl std::fmt::Display for PruneResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Prune Result")?;
        writeln!(f, "  Rows:    {} -> {}", self.n_rows_before, self.n_rows_after)?;
        writeln!(f, "  Columns: {} -> {}", self.n_cols_before, self.n_cols_after)?;
        if !self.removed_rows.is_empty() {
            writeln!(f, "  Removed rows: {:?}", self.removed_rows)?;
        }
        if !self.removed_cols.is_empty() {
            writeln!(f, "  Removed columns: {:?}", self.removed_cols)?;
        }
        Ok(())
    }
}

/// Prune with statistics about what was removed.
pub fn prune_disconnected_with_stats(matrix: &CoocMatrix) -> Result<(CoocMatrix, PruneResult)> {
    let pruned = prune_disconnected(matrix)?;

    let removed_rows: Vec<String> = matrix
        .row_labels()
        .iter()
        .filter(|l| pruned.row_index(l).is_none())
        .cloned()
        .collect();
    let removed_cols: Vec<String> = matrix
        .col_labels()
        .iter()
        .filter(|l| pruned.col_index(l).is_none())
        .cloned()
        .collect();

    let result = PruneResult {
        n_rows_before: matrix.n_rows(),
        n_rows_after: pruned.n_rows(),
        n_cols_before: matrix.n_cols(),
        n_cols_after: pruned.n_cols(),
        removed_rows,
        removed_cols,
    };

    Ok((pruned, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn labeled(
        shape: (usize, usize),
        entries: &[(usize, usize, u64)],
        rows: &[&str],
        cols: &[&str],
    ) -> CoocMatrix {
        let mut tri_mat = TriMat::new(shape);
        for &(r, c, v) in entries {
            tri_mat.add_triplet(r, c, v);
        }
        CoocMatrix::new(
            tri_mat.to_csr(),
            rows.iter().map(|s| s.to_string()).collect(),
            cols.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_removes_zero_rows_and_columns() {
        // Row "drought" and column "zika" carry no connections.
        let matrix = labeled(
            (3, 3),
            &[(0, 0, 4), (2, 1, 6)],
            &["flood", "drought", "storm"],
            &["asthma", "cholera", "zika"],
        );
        let pruned = prune_disconnected(&matrix).unwrap();

        assert_eq!(pruned.row_labels(), &["flood", "storm"]);
        assert_eq!(pruned.col_labels(), &["asthma", "cholera"]);
        assert_eq!(pruned.get_by_label("flood", "asthma"), 4);
        assert_eq!(pruned.get_by_label("storm", "cholera"), 6);
    }

    #[test]
    fn test_column_pass_runs_after_row_pass() {
        // Row "drought" is all-zero and goes in the first pass; column
        // "cholera" is all-zero against the remaining rows and goes in the
        // second.
        let matrix = labeled(
            (2, 2),
            &[(0, 0, 5)],
            &["flood", "drought"],
            &["asthma", "cholera"],
        );
        let pruned = prune_disconnected(&matrix).unwrap();
        assert_eq!(pruned.row_labels(), &["flood"]);
        assert_eq!(pruned.col_labels(), &["asthma"]);
    }

    #[test]
    fn test_idempotent() {
        let matrix = labeled(
            (3, 3),
            &[(0, 0, 4), (2, 1, 6)],
            &["flood", "drought", "storm"],
            &["asthma", "cholera", "zika"],
        );
        let once = prune_disconnected(&matrix).unwrap();
        let twice = prune_disconnected(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fully_connected_matrix_unchanged() {
        let matrix = labeled(
            (2, 2),
            &[(0, 0, 1), (1, 1, 2)],
            &["flood", "storm"],
            &["asthma", "cholera"],
        );
        let pruned = prune_disconnected(&matrix).unwrap();
        assert_eq!(pruned, matrix);
    }

    #[test]
    fn test_all_zero_matrix_prunes_to_empty() {
        let matrix = labeled((2, 2), &[], &["flood", "storm"], &["asthma", "cholera"]);
        let pruned = prune_disconnected(&matrix).unwrap();

        assert_eq!(pruned.n_rows(), 0);
        assert_eq!(pruned.n_cols(), 0);
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_prune_with_stats() {
        let matrix = labeled(
            (3, 3),
            &[(0, 0, 4), (2, 1, 6)],
            &["flood", "drought", "storm"],
            &["asthma", "cholera", "zika"],
        );
        let (pruned, stats) = prune_disconnected_with_stats(&matrix).unwrap();

        assert_eq!(stats.n_rows_before, 3);
        assert_eq!(stats.n_rows_after, 2);
        assert_eq!(stats.removed_rows, vec!["drought"]);
        assert_eq!(stats.removed_cols, vec!["zika"]);
        assert_eq!(pruned.n_rows(), 2);
    }
}
