//! Label-based row/column exclusion for co-occurrence matrices.

use crate::data::CoocMatrix;
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::TriMat;

/// Substring patterns identifying rows and columns to exclude.
///
/// Exclusion lists encode domain knowledge (ambiguous phenomena, mislabeled
/// entities) that cannot be inferred from the data; they are supplied by the
/// caller, not hard-coded. A pattern matches a label when it occurs anywhere
/// inside it, case-sensitive against the labels as they stand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSpec {
    /// Patterns matched against row labels.
    pub row_patterns: Vec<String>,
    /// Patterns matched against column labels.
    pub column_patterns: Vec<String>,
}

impl ExclusionSpec {
    /// Create a spec from row and column pattern lists.
    pub fn new(row_patterns: Vec<String>, column_patterns: Vec<String>) -> Self {
        Self {
            row_patterns,
            column_patterns,
        }
    }

    /// Whether both pattern lists are empty.
    pub fn is_empty(&self) -> bool {
        self.row_patterns.is_empty() && self.column_patterns.is_empty()
    }
}

/// Substring predicate list evaluated once per label, not per cell.
struct LabelMatcher<'a> {
    patterns: &'a [String],
}

impl LabelMatcher<'_> {
    fn matches(&self, label: &str) -> bool {
        self.patterns.iter().any(|p| label.contains(p.as_str()))
    }

    fn mask(&self, labels: &[String]) -> Vec<bool> {
        labels.par_iter().map(|l| self.matches(l)).collect()
    }
}

/// Remove excluded rows and columns from a matrix.
///
/// 1. Removes every row whose label contains any row pattern.
/// 2. Removes every column whose label contains any column pattern.
/// 3. Zeroes any surviving cell whose row label matches a row pattern AND
///    whose column label matches a column pattern (see
///    [`zero_cross_matches`]).
///
/// Removing every row or every column is a valid outcome, not an error; the
/// pruning stage downstream treats the resulting empty matrix as terminal
/// output.
pub fn filter_exclusions(matrix: &CoocMatrix, spec: &ExclusionSpec) -> Result<CoocMatrix> {
    let row_matcher = LabelMatcher {
        patterns: &spec.row_patterns,
    };
    let col_matcher = LabelMatcher {
        patterns: &spec.column_patterns,
    };

    let row_mask = row_matcher.mask(matrix.row_labels());
    let keep_rows: Vec<usize> = row_mask
        .iter()
        .enumerate()
        .filter(|(_, &hit)| !hit)
        .map(|(i, _)| i)
        .collect();

    let col_mask = col_matcher.mask(matrix.col_labels());
    let keep_cols: Vec<usize> = col_mask
        .iter()
        .enumerate()
        .filter(|(_, &hit)| !hit)
        .map(|(i, _)| i)
        .collect();

    let filtered = matrix.subset_rows(&keep_rows)?.subset_cols(&keep_cols)?;

    // The removal passes above already eliminate labels matching either
    // list, so this pass only acts if a matching label slipped through.
    zero_cross_matches(&filtered, spec)
}

/// Zero every cell whose row label matches any row pattern and whose column
/// label matches any column pattern simultaneously.
///
/// Unreachable under consistent exclusion lists once the removal passes of
/// [`filter_exclusions`] have run; retained so that inconsistent pattern
/// lists zero the cell instead of keeping it.
pub fn zero_cross_matches(matrix: &CoocMatrix, spec: &ExclusionSpec) -> Result<CoocMatrix> {
    let row_matcher = LabelMatcher {
        patterns: &spec.row_patterns,
    };
    let col_matcher = LabelMatcher {
        patterns: &spec.column_patterns,
    };

    let row_hits = row_matcher.mask(matrix.row_labels());
    let col_hits = col_matcher.mask(matrix.col_labels());

    if !row_hits.contains(&true) || !col_hits.contains(&true) {
        return Ok(matrix.clone());
    }

    let mut tri_mat = TriMat::new((matrix.n_rows(), matrix.n_cols()));
    for (row, row_vec) in matrix.data().outer_iterator().enumerate() {
        for (col, &val) in row_vec.iter() {
            if !(row_hits[row] && col_hits[col]) {
                tri_mat.add_triplet(row, col, val);
            }
        }
    }

    CoocMatrix::new(
        tri_mat.to_csr(),
        matrix.row_labels().to_vec(),
        matrix.col_labels().to_vec(),
    )
}

/// Result of exclusion filtering with statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionFilterResult {
    /// Number of rows before filtering.
    pub n_rows_before: usize,
    /// Number of rows after filtering.
    pub n_rows_after: usize,
    /// Number of columns before filtering.
    pub n_cols_before: usize,
    /// Number of columns after filtering.
    pub n_cols_after: usize,
    /// Labels of removed rows.
    pub removed_rows: Vec<String>,
    /// Labels of removed columns.
    pub removed_cols: Vec<String>,
    /// Number of non-zero cells zeroed by the cross-matching pass.
    pub n_cells_zeroed: usize,
}

impl std::fmt::Display for ExclusionFilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Exclusion Filter Result")?;
        writeln!(f, "  Rows:    {} -> {}", self.n_rows_before, self.n_rows_after)?;
        writeln!(f, "  Columns: {} -> {}", self.n_cols_before, self.n_cols_after)?;
        if !self.removed_rows.is_empty() {
            writeln!(f, "  Removed rows: {:?}", self.removed_rows)?;
        }
        if !self.removed_cols.is_empty() {
            writeln!(f, "  Removed columns: {:?}", self.removed_cols)?;
        }
        writeln!(f, "  Cells zeroed: {}", self.n_cells_zeroed)?;
        Ok(())
    }
}

/// Filter with statistics about what was removed.
pub fn filter_exclusions_with_stats(
    matrix: &CoocMatrix,
    spec: &ExclusionSpec,
) -> Result<(CoocMatrix, ExclusionFilterResult)> {
    let row_matcher = LabelMatcher {
        patterns: &spec.row_patterns,
    };
    let col_matcher = LabelMatcher {
        patterns: &spec.column_patterns,
    };

    let removed_rows: Vec<String> = matrix
        .row_labels()
        .iter()
        .filter(|l| row_matcher.matches(l))
        .cloned()
        .collect();
    let removed_cols: Vec<String> = matrix
        .col_labels()
        .iter()
        .filter(|l| col_matcher.matches(l))
        .cloned()
        .collect();

    let filtered = filter_exclusions(matrix, spec)?;

    // Removal accounts for every dropped cell, so any remaining nnz gap
    // comes from the cross-matching pass.
    let kept_rows: Vec<usize> = (0..matrix.n_rows())
        .filter(|&r| !row_matcher.matches(&matrix.row_labels()[r]))
        .collect();
    let kept_cols: Vec<usize> = (0..matrix.n_cols())
        .filter(|&c| !col_matcher.matches(&matrix.col_labels()[c]))
        .collect();
    let after_removal = matrix.subset_rows(&kept_rows)?.subset_cols(&kept_cols)?;
    let n_cells_zeroed = after_removal.nnz() - filtered.nnz();

    let result = ExclusionFilterResult {
        n_rows_before: matrix.n_rows(),
        n_rows_after: filtered.n_rows(),
        n_cols_before: matrix.n_cols(),
        n_cols_after: filtered.n_cols(),
        removed_rows,
        removed_cols,
        n_cells_zeroed,
    };

    Ok((filtered, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> CoocMatrix {
        // rows: current, flood, forest fire; columns: ad, asthma, malaria
        let mut tri_mat = TriMat::new((3, 3));
        tri_mat.add_triplet(0, 0, 5);
        tri_mat.add_triplet(0, 1, 10);
        tri_mat.add_triplet(1, 1, 20);
        tri_mat.add_triplet(1, 2, 30);
        tri_mat.add_triplet(2, 0, 7);
        tri_mat.add_triplet(2, 2, 9);

        CoocMatrix::new(
            tri_mat.to_csr(),
            vec![
                "current".to_string(),
                "flood".to_string(),
                "forest fire".to_string(),
            ],
            vec!["ad".to_string(), "asthma".to_string(), "malaria".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_spec_is_noop() {
        let matrix = create_test_matrix();
        let filtered = filter_exclusions(&matrix, &ExclusionSpec::default()).unwrap();
        assert_eq!(filtered, matrix);
    }

    #[test]
    fn test_row_removal_by_substring() {
        let matrix = create_test_matrix();
        // "fire" matches "forest fire" by containment.
        let spec = ExclusionSpec::new(vec!["fire".to_string()], vec![]);
        let filtered = filter_exclusions(&matrix, &spec).unwrap();

        assert_eq!(filtered.row_labels(), &["current", "flood"]);
        assert_eq!(filtered.n_cols(), 3);
    }

    #[test]
    fn test_column_removal() {
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(vec![], vec!["ad".to_string()]);
        let filtered = filter_exclusions(&matrix, &spec).unwrap();

        assert_eq!(filtered.col_labels(), &["asthma", "malaria"]);
        assert_eq!(filtered.n_rows(), 3);
        assert_eq!(filtered.get_by_label("flood", "malaria"), 30);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(vec!["Flood".to_string()], vec![]);
        let filtered = filter_exclusions(&matrix, &spec).unwrap();
        assert_eq!(filtered.n_rows(), 3);
    }

    #[test]
    fn test_removing_all_rows_is_valid_output() {
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(
            vec![
                "current".to_string(),
                "flood".to_string(),
                "fire".to_string(),
            ],
            vec![],
        );
        let filtered = filter_exclusions(&matrix, &spec).unwrap();

        assert_eq!(filtered.n_rows(), 0);
        assert!(filtered.is_empty());
        assert_eq!(filtered.n_cols(), 3);
    }

    #[test]
    fn test_cross_matching_cells_are_zeroed() {
        // Drive the defensive pass directly: labels matching both lists are
        // still present, as if removal had run against different lists.
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(vec!["current".to_string()], vec!["ad".to_string()]);
        let zeroed = zero_cross_matches(&matrix, &spec).unwrap();

        assert_eq!(zeroed.get_by_label("current", "ad"), 0);
        // Only the doubly-matching cell changes.
        assert_eq!(zeroed.get_by_label("current", "asthma"), 10);
        assert_eq!(zeroed.get_by_label("forest fire", "ad"), 7);
        assert_eq!(zeroed.row_labels(), matrix.row_labels());
        assert_eq!(zeroed.col_labels(), matrix.col_labels());
    }

    #[test]
    fn test_cross_zeroing_is_noop_after_removal() {
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(vec!["current".to_string()], vec!["ad".to_string()]);
        let (filtered, stats) = filter_exclusions_with_stats(&matrix, &spec).unwrap();

        // Both matching labels were removed outright, so nothing to zero.
        assert_eq!(stats.n_cells_zeroed, 0);
        assert_eq!(stats.removed_rows, vec!["current"]);
        assert_eq!(stats.removed_cols, vec!["ad"]);
        assert_eq!(filtered.row_labels(), &["flood", "forest fire"]);
        assert_eq!(filtered.col_labels(), &["asthma", "malaria"]);
    }

    #[test]
    fn test_with_stats_counts() {
        let matrix = create_test_matrix();
        let spec = ExclusionSpec::new(vec!["fire".to_string()], vec!["malaria".to_string()]);
        let (filtered, stats) = filter_exclusions_with_stats(&matrix, &spec).unwrap();

        assert_eq!(stats.n_rows_before, 3);
        assert_eq!(stats.n_rows_after, 2);
        assert_eq!(stats.n_cols_before, 3);
        assert_eq!(stats.n_cols_after, 2);
        assert_eq!(filtered.get_by_label("flood", "asthma"), 20);
    }
}
