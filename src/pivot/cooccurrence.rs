//! Pivot of a triple table into a dense labeled co-occurrence matrix.

use crate::data::{CoocMatrix, TripleTable};
use crate::error::{CoocError, Result};
use serde::{Deserialize, Serialize};
use sprs::TriMat;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Options controlling matrix construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotOptions {
    /// Lowercase both entity columns before aggregation, merging pairs that
    /// differ only by case.
    pub lowercase: bool,
    /// Keep only the first N rows in label order. This is a hard slice of
    /// the sorted labels, not a top-N selection by weight.
    pub limit_rows: Option<usize>,
    /// Keep only the first N columns in label order. Hard slice, as above.
    pub limit_columns: Option<usize>,
}

/// Aggregate a triple table and pivot it into a co-occurrence matrix.
///
/// Triples are grouped by `(entity_2, entity_1)` and their frequencies
/// summed; `entity_2` keys the rows and `entity_1` keys the columns, so
/// (A, B) and (B, A) stay distinct cells. Row and column labels are the
/// distinct entity values in ascending lexicographic order, which makes the
/// output independent of input row order. Combinations absent from the
/// aggregated input read as 0.
///
/// # Errors
/// `EmptyMatrix` when the table has no triples, `InvalidParameter` when a
/// limit is zero.
pub fn pivot_cooccurrence(table: &TripleTable, options: &PivotOptions) -> Result<CoocMatrix> {
    if options.limit_rows == Some(0) {
        return Err(CoocError::InvalidParameter(
            "limit_rows must be at least 1".to_string(),
        ));
    }
    if options.limit_columns == Some(0) {
        return Err(CoocError::InvalidParameter(
            "limit_columns must be at least 1".to_string(),
        ));
    }
    if table.is_empty() {
        return Err(CoocError::EmptyMatrix(
            "cannot pivot a triple table with 0 rows".to_string(),
        ));
    }

    // Group by (entity_2, entity_1) and sum.
    let mut aggregated: BTreeMap<(String, String), u64> = BTreeMap::new();
    for triple in table.iter() {
        let (row, col) = if options.lowercase {
            (
                triple.entity_2.to_lowercase(),
                triple.entity_1.to_lowercase(),
            )
        } else {
            (triple.entity_2.clone(), triple.entity_1.clone())
        };
        *aggregated.entry((row, col)).or_insert(0) += triple.fq;
    }

    let mut row_set = BTreeSet::new();
    let mut col_set = BTreeSet::new();
    for (row, col) in aggregated.keys() {
        row_set.insert(row.clone());
        col_set.insert(col.clone());
    }
    let row_labels: Vec<String> = row_set.into_iter().collect();
    let col_labels: Vec<String> = col_set.into_iter().collect();

    let row_index: HashMap<&str, usize> = row_labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();
    let col_index: HashMap<&str, usize> = col_labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut tri_mat = TriMat::new((row_labels.len(), col_labels.len()));
    for ((row, col), fq) in &aggregated {
        if let (Some(&r), Some(&c)) = (row_index.get(row.as_str()), col_index.get(col.as_str())) {
            if *fq > 0 {
                tri_mat.add_triplet(r, c, *fq);
            }
        }
    }

    let mut matrix = CoocMatrix::new(tri_mat.to_csr(), row_labels, col_labels)?;

    if let Some(limit) = options.limit_rows {
        if limit < matrix.n_rows() {
            let indices: Vec<usize> = (0..limit).collect();
            matrix = matrix.subset_rows(&indices)?;
        }
    }
    if let Some(limit) = options.limit_columns {
        if limit < matrix.n_cols() {
            let indices: Vec<usize> = (0..limit).collect();
            matrix = matrix.subset_cols(&indices)?;
        }
    }

    Ok(matrix)
}
