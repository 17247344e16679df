//! Labeled co-occurrence matrix with compact sparse storage.

use crate::error::{CoocError, Result};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};
use std::collections::HashMap;
use std::path::Path;

/// An entity×entity co-occurrence matrix addressed by label.
///
/// Row labels come from `entity_2` values and column labels from `entity_1`
/// values; the two axes are independent and never interchangeable. Labels are
/// ordered vectors layered over a CSR grid, so cells absent from the storage
/// read as 0.
#[derive(Debug, Clone)]
pub struct CoocMatrix {
    /// Sparse matrix in CSR format (rows × columns)
    data: CsMat<u64>,
    /// Row entity labels
    row_labels: Vec<String>,
    /// Column entity labels
    col_labels: Vec<String>,
}

impl CoocMatrix {
    /// Create a new CoocMatrix from a sparse grid and label vectors.
    pub fn new(data: CsMat<u64>, row_labels: Vec<String>, col_labels: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != row_labels.len() {
            return Err(CoocError::DimensionMismatch {
                expected: nrows,
                actual: row_labels.len(),
            });
        }
        if ncols != col_labels.len() {
            return Err(CoocError::DimensionMismatch {
                expected: ncols,
                actual: col_labels.len(),
            });
        }
        Ok(Self {
            data,
            row_labels,
            col_labels,
        })
    }

    /// Read a serialized matrix back from a delimited file.
    ///
    /// Expected format mirrors [`CoocMatrix::to_csv`]: the first header cell
    /// is empty (or a row-index label) followed by column labels, and each
    /// data row is a row label followed by integer cells.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        let mut records = reader.records();

        let header = records
            .next()
            .ok_or_else(|| CoocError::EmptyMatrix("matrix file has no header row".to_string()))??;
        let col_labels: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();
        let n_cols = col_labels.len();

        let mut row_labels: Vec<String> = Vec::new();
        let mut entries: Vec<(usize, usize, u64)> = Vec::new();
        for (row, record) in records.enumerate() {
            let record = record?;
            row_labels.push(record.get(0).unwrap_or("").to_string());
            for col in 0..n_cols {
                let raw = record.get(col + 1).unwrap_or("");
                let value: u64 = raw.trim().parse().map_err(|_| CoocError::InvalidCount {
                    value: raw.to_string(),
                    row,
                    col,
                })?;
                if value > 0 {
                    entries.push((row, col, value));
                }
            }
        }

        let mut tri_mat = TriMat::new((row_labels.len(), n_cols));
        for (row, col, value) in entries {
            tri_mat.add_triplet(row, col, value);
        }

        Self::new(tri_mat.to_csr(), row_labels, col_labels)
    }

    /// Write the matrix to a delimited file.
    ///
    /// The first header cell is left empty, followed by the column labels;
    /// each data row is the row label followed by its integer cells.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = Vec::with_capacity(self.n_cols() + 1);
        header.push(String::new());
        header.extend(self.col_labels.iter().cloned());
        writer.write_record(&header)?;

        for (row, label) in self.row_labels.iter().enumerate() {
            let mut record = Vec::with_capacity(self.n_cols() + 1);
            record.push(label.clone());
            for col in 0..self.n_cols() {
                record.push(self.get(row, col).to_string());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Get the value at (row, col), returning 0 for missing entries.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.data.get(row, col).copied().unwrap_or(0)
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.data.rows()
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.data.cols()
    }

    /// Total number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// Whether the matrix has no rows or no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    /// Row entity labels.
    #[inline]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column entity labels.
    #[inline]
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Get the underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<u64> {
        &self.data
    }

    /// Index of a row label, if present.
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.row_labels.iter().position(|l| l == label)
    }

    /// Index of a column label, if present.
    pub fn col_index(&self, label: &str) -> Option<usize> {
        self.col_labels.iter().position(|l| l == label)
    }

    /// Value at a (row label, column label) address, 0 when either is absent.
    pub fn get_by_label(&self, row_label: &str, col_label: &str) -> u64 {
        match (self.row_index(row_label), self.col_index(col_label)) {
            (Some(row), Some(col)) => self.get(row, col),
            _ => 0,
        }
    }

    /// Compute row sums.
    pub fn row_sums(&self) -> Vec<u64> {
        (0..self.n_rows())
            .into_par_iter()
            .map(|row| {
                self.data
                    .outer_view(row)
                    .map(|v| v.iter().map(|(_, &val)| val).sum())
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Compute column sums.
    pub fn col_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.n_cols()];
        for row_vec in self.data.outer_iterator() {
            for (col, &val) in row_vec.iter() {
                sums[col] += val;
            }
        }
        sums
    }

    /// Sum of all cell values.
    pub fn total(&self) -> u64 {
        self.row_sums().iter().sum()
    }

    /// Subset the matrix to the specified rows (by index), preserving order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let n_rows = indices.len();
        let n_cols = self.n_cols();

        let mut triplets = Vec::new();
        let mut new_row_labels = Vec::with_capacity(n_rows);

        for (new_row, &old_row) in indices.iter().enumerate() {
            if old_row >= self.n_rows() {
                return Err(CoocError::InvalidParameter(format!(
                    "Row index {} out of bounds",
                    old_row
                )));
            }
            new_row_labels.push(self.row_labels[old_row].clone());

            if let Some(row_vec) = self.data.outer_view(old_row) {
                for (col, &val) in row_vec.iter() {
                    triplets.push((new_row, col, val));
                }
            }
        }

        let mut tri_mat = TriMat::new((n_rows, n_cols));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), new_row_labels, self.col_labels.clone())
    }

    /// Subset the matrix to the specified columns (by index), preserving order.
    pub fn subset_cols(&self, indices: &[usize]) -> Result<Self> {
        let n_rows = self.n_rows();
        let n_cols = indices.len();

        let col_map: HashMap<usize, usize> = indices
            .iter()
            .enumerate()
            .map(|(new_idx, &old_idx)| (old_idx, new_idx))
            .collect();

        let mut new_col_labels = Vec::with_capacity(n_cols);
        for &old_col in indices {
            if old_col >= self.n_cols() {
                return Err(CoocError::InvalidParameter(format!(
                    "Column index {} out of bounds",
                    old_col
                )));
            }
            new_col_labels.push(self.col_labels[old_col].clone());
        }

        let mut triplets = Vec::new();
        for (row, row_vec) in self.data.outer_iterator().enumerate() {
            for (old_col, &val) in row_vec.iter() {
                if let Some(&new_col) = col_map.get(&old_col) {
                    triplets.push((row, new_col, val));
                }
            }
        }

        let mut tri_mat = TriMat::new((n_rows, n_cols));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), self.row_labels.clone(), new_col_labels)
    }
}

impl PartialEq for CoocMatrix {
    fn eq(&self, other: &Self) -> bool {
        if self.row_labels != other.row_labels || self.col_labels != other.col_labels {
            return false;
        }
        for row in 0..self.n_rows() {
            for col in 0..self.n_cols() {
                if self.get(row, col) != other.get(row, col) {
                    return false;
                }
            }
        }
        true
    }
}
