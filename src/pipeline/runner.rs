//! Fixed-sequence pipeline from triple table to pruned matrix.

use crate::data::{CoocMatrix, TripleTable};
use crate::error::{CoocError, Result};
use crate::filter::{filter_exclusions_with_stats, filter_frequency, ExclusionSpec};
use crate::pivot::{pivot_cooccurrence, PivotOptions};
use crate::prune::prune_disconnected_with_stats;
use serde::{Deserialize, Serialize};

/// Pipeline configuration for serialization.
///
/// All knobs of the construction pipeline live here as explicit values;
/// there is no process-wide configuration state. Exclusion lists are part of
/// the config so they can be versioned alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Percentile of the frequency distribution below which pairs are dropped.
    #[serde(default)]
    pub percentile: f64,
    /// Lowercase entity names before aggregation.
    #[serde(default)]
    pub lowercase: bool,
    /// Keep only the first N rows in label order.
    #[serde(default)]
    pub limit_rows: Option<usize>,
    /// Keep only the first N columns in label order.
    #[serde(default)]
    pub limit_columns: Option<usize>,
    /// Substring patterns removing matching rows.
    #[serde(default)]
    pub row_exclusions: Vec<String>,
    /// Substring patterns removing matching columns.
    #[serde(default)]
    pub column_exclusions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            description: None,
            percentile: 0.0,
            lowercase: false,
            limit_rows: None,
            limit_columns: None,
            row_exclusions: Vec::new(),
            column_exclusions: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(CoocError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CoocError::from)
    }

    /// Check parameter ranges before any stage runs.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(CoocError::InvalidParameter(format!(
                "percentile must be between 0 and 1, got {}",
                self.percentile
            )));
        }
        if self.limit_rows == Some(0) {
            return Err(CoocError::InvalidParameter(
                "limit_rows must be at least 1".to_string(),
            ));
        }
        if self.limit_columns == Some(0) {
            return Err(CoocError::InvalidParameter(
                "limit_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-stage statistics reported alongside the final matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the pipeline that produced the matrix.
    pub name: String,
    /// Frequency value at the configured percentile; pairs below it were
    /// dropped.
    pub threshold: f64,
    /// Triples loaded.
    pub n_triples_in: usize,
    /// Triples surviving the frequency filter.
    pub n_triples_kept: usize,
    /// Matrix rows right after the pivot.
    pub n_rows_built: usize,
    /// Matrix columns right after the pivot.
    pub n_cols_built: usize,
    /// Rows removed by exclusion patterns.
    pub rows_excluded: usize,
    /// Columns removed by exclusion patterns.
    pub cols_excluded: usize,
    /// Cells zeroed by the cross-matching pass.
    pub cells_zeroed: usize,
    /// Disconnected rows pruned.
    pub rows_pruned: usize,
    /// Disconnected columns pruned.
    pub cols_pruned: usize,
    /// Final matrix rows.
    pub n_rows: usize,
    /// Final matrix columns.
    pub n_cols: usize,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Report ({})", self.name)?;
        writeln!(f, "  Frequency threshold: {}", self.threshold)?;
        writeln!(
            f,
            "  Triples:  {} -> {}",
            self.n_triples_in, self.n_triples_kept
        )?;
        writeln!(
            f,
            "  Pivoted:  {} rows x {} columns",
            self.n_rows_built, self.n_cols_built
        )?;
        writeln!(
            f,
            "  Excluded: {} rows, {} columns, {} cells zeroed",
            self.rows_excluded, self.cols_excluded, self.cells_zeroed
        )?;
        writeln!(
            f,
            "  Pruned:   {} rows, {} columns",
            self.rows_pruned, self.cols_pruned
        )?;
        writeln!(
            f,
            "  Final:    {} rows x {} columns",
            self.n_rows, self.n_cols
        )?;
        Ok(())
    }
}

/// Builder for constructing and running the matrix pipeline.
///
/// The stage order is fixed: frequency filter, pivot, exclusion filter,
/// prune. The builder only parameterizes the stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    /// Set the frequency percentile threshold.
    pub fn percentile(mut self, percentile: f64) -> Self {
        self.config.percentile = percentile;
        self
    }

    /// Lowercase entity names before aggregation.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.config.lowercase = lowercase;
        self
    }

    /// Keep only the first N rows in label order.
    pub fn limit_rows(mut self, limit: Option<usize>) -> Self {
        self.config.limit_rows = limit;
        self
    }

    /// Keep only the first N columns in label order.
    pub fn limit_columns(mut self, limit: Option<usize>) -> Self {
        self.config.limit_columns = limit;
        self
    }

    /// Set row exclusion patterns.
    pub fn exclude_rows(mut self, patterns: Vec<String>) -> Self {
        self.config.row_exclusions = patterns;
        self
    }

    /// Set column exclusion patterns.
    pub fn exclude_columns(mut self, patterns: Vec<String>) -> Self {
        self.config.column_exclusions = patterns;
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        let mut config = self.config.clone();
        config.description = description.map(String::from);
        config
    }

    /// Run the pipeline on a triple table.
    ///
    /// Returns the final matrix together with a report of what every stage
    /// did, including the computed frequency threshold. Nothing is written
    /// to disk here; serialization is the caller's final step so that a
    /// failing stage never leaves partial output behind.
    pub fn run(&self, table: &TripleTable) -> Result<(CoocMatrix, RunReport)> {
        let config = &self.config;
        config.validate()?;

        let n_triples_in = table.len();

        let filtered = filter_frequency(table, config.percentile)
            .map_err(|e| CoocError::Pipeline(format!("frequency filter failed: {}", e)))?;
        let n_triples_kept = filtered.table.len();

        let pivot_options = PivotOptions {
            lowercase: config.lowercase,
            limit_rows: config.limit_rows,
            limit_columns: config.limit_columns,
        };
        let matrix = pivot_cooccurrence(&filtered.table, &pivot_options)
            .map_err(|e| CoocError::Pipeline(format!("pivot failed: {}", e)))?;
        let n_rows_built = matrix.n_rows();
        let n_cols_built = matrix.n_cols();

        let spec = ExclusionSpec::new(
            config.row_exclusions.clone(),
            config.column_exclusions.clone(),
        );
        let (matrix, exclusion_stats) = filter_exclusions_with_stats(&matrix, &spec)
            .map_err(|e| CoocError::Pipeline(format!("exclusion filter failed: {}", e)))?;

        let (matrix, prune_stats) = prune_disconnected_with_stats(&matrix)
            .map_err(|e| CoocError::Pipeline(format!("prune failed: {}", e)))?;

        let report = RunReport {
            name: config.name.clone(),
            threshold: filtered.threshold,
            n_triples_in,
            n_triples_kept,
            n_rows_built,
            n_cols_built,
            rows_excluded: exclusion_stats.removed_rows.len(),
            cols_excluded: exclusion_stats.removed_cols.len(),
            cells_zeroed: exclusion_stats.n_cells_zeroed,
            rows_pruned: prune_stats.removed_rows.len(),
            cols_pruned: prune_stats.removed_cols.len(),
            n_rows: matrix.n_rows(),
            n_cols: matrix.n_cols(),
        };

        Ok((matrix, report))
    }
}

/// Convenience function running the full construction pipeline with explicit
/// parameters.
pub fn run_build(
    table: &TripleTable,
    percentile: f64,
    lowercase: bool,
    limit_rows: Option<usize>,
    limit_columns: Option<usize>,
    row_exclusions: Vec<String>,
    column_exclusions: Vec<String>,
) -> Result<(CoocMatrix, RunReport)> {
    Pipeline::new()
        .name("build")
        .percentile(percentile)
        .lowercase(lowercase)
        .limit_rows(limit_rows)
        .limit_columns(limit_columns)
        .exclude_rows(row_exclusions)
        .exclude_columns(column_exclusions)
        .run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Triple;

    fn create_test_table() -> TripleTable {
        TripleTable::new(vec![
            Triple::new("cancer", "current", 50),
            Triple::new("cancer", "current", 10),
            Triple::new("Depression", "Current", 30),
            Triple::new("asthma", "wildfire", 20),
            Triple::new("malaria", "flood", 2),
        ])
    }

    #[test]
    fn test_full_run_with_lowercasing() {
        let table = create_test_table();
        let (matrix, report) = Pipeline::new()
            .name("test")
            .percentile(0.0)
            .lowercase(true)
            .run(&table)
            .unwrap();

        // "Current"/"current" and "Depression"/"depression" merge.
        assert_eq!(matrix.row_labels(), &["current", "flood", "wildfire"]);
        assert_eq!(
            matrix.col_labels(),
            &["asthma", "cancer", "depression", "malaria"]
        );
        assert_eq!(matrix.get_by_label("current", "cancer"), 60);
        assert_eq!(matrix.get_by_label("current", "depression"), 30);

        assert_eq!(report.n_triples_in, 5);
        assert_eq!(report.n_triples_kept, 5);
        assert_eq!(report.threshold, 2.0);
        assert_eq!(report.n_rows, 3);
        assert_eq!(report.n_cols, 4);
    }

    #[test]
    fn test_exclusion_and_pruning_interact() {
        let table = create_test_table();
        let (matrix, report) = Pipeline::new()
            .lowercase(true)
            .exclude_rows(vec!["current".to_string()])
            .run(&table)
            .unwrap();

        // Removing the "current" row disconnects cancer and depression,
        // which the pruner then drops as all-zero columns.
        assert_eq!(matrix.row_labels(), &["flood", "wildfire"]);
        assert_eq!(matrix.col_labels(), &["asthma", "malaria"]);
        assert_eq!(report.rows_excluded, 1);
        assert_eq!(report.cols_pruned, 2);
    }

    #[test]
    fn test_exclusion_can_empty_the_matrix() {
        let table = TripleTable::new(vec![
            Triple::new("A", "X", 10),
            Triple::new("B", "X", 3),
        ]);
        let (matrix, report) = Pipeline::new()
            .exclude_rows(vec!["X".to_string()])
            .run(&table)
            .unwrap();

        // An empty matrix is valid terminal output, not an error.
        assert!(matrix.is_empty());
        assert_eq!(matrix.n_rows(), 0);
        assert_eq!(matrix.n_cols(), 0);
        assert_eq!(report.rows_excluded, 1);
        assert_eq!(report.cols_pruned, 2);
    }

    #[test]
    fn test_percentile_drives_threshold() {
        let table = create_test_table();
        let (_, report) = Pipeline::new().percentile(1.0).run(&table).unwrap();

        assert_eq!(report.threshold, 50.0);
        assert_eq!(report.n_triples_kept, 1);
    }

    #[test]
    fn test_invalid_config_rejected_before_stages() {
        let table = create_test_table();
        assert!(Pipeline::new().percentile(1.5).run(&table).is_err());
        assert!(Pipeline::new().limit_rows(Some(0)).run(&table).is_err());
    }

    #[test]
    fn test_empty_input_fails_in_frequency_stage() {
        let err = Pipeline::new().run(&TripleTable::default()).unwrap_err();
        match err {
            CoocError::Pipeline(message) => {
                assert!(message.contains("frequency filter"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = Pipeline::new()
            .name("envidis")
            .percentile(0.6)
            .lowercase(true)
            .exclude_rows(vec!["current".to_string(), "wave".to_string()])
            .exclude_columns(vec!["fire".to_string()])
            .to_config(Some("EnviDis co-occurrence build"));

        let yaml = config.to_yaml().unwrap();
        let reloaded = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_run_build_matches_builder() {
        let table = create_test_table();
        let (via_builder, _) = Pipeline::new()
            .name("build")
            .percentile(0.5)
            .lowercase(true)
            .run(&table)
            .unwrap();
        let (via_fn, _) =
            run_build(&table, 0.5, true, None, None, Vec::new(), Vec::new()).unwrap();
        assert_eq!(via_builder, via_fn);
    }
}
