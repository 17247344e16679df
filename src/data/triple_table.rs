//! Co-occurrence triples loaded from a delimited count table.

use crate::error::{CoocError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One observed co-occurrence count between two entity names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// First entity of the pair (becomes a column label).
    pub entity_1: String,
    /// Second entity of the pair (becomes a row label).
    pub entity_2: String,
    /// Observed co-occurrence frequency.
    pub fq: u64,
}

impl Triple {
    /// Create a triple from entity names and a frequency.
    pub fn new<S: Into<String>, T: Into<String>>(entity_1: S, entity_2: T, fq: u64) -> Self {
        Self {
            entity_1: entity_1.into(),
            entity_2: entity_2.into(),
            fq,
        }
    }
}

/// An ordered table of co-occurrence triples.
///
/// Rows are kept in input order and duplicate (entity_1, entity_2) pairs are
/// preserved as-is; summation happens at pivot time, never at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleTable {
    triples: Vec<Triple>,
}

impl TripleTable {
    /// Create a table from an existing list of triples.
    pub fn new(triples: Vec<Triple>) -> Self {
        Self { triples }
    }

    /// Load a triple table from a delimited file.
    ///
    /// The header row must contain `entity_1`, `entity_2` and `fq` columns,
    /// in any order; extra columns are ignored. Row order is preserved.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CoocError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let entity_1_col = column("entity_1")?;
        let entity_2_col = column("entity_2")?;
        let fq_col = column("fq")?;

        let mut triples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let raw_fq = record.get(fq_col).unwrap_or("");
            let fq: u64 = raw_fq
                .trim()
                .parse()
                .map_err(|_| CoocError::InvalidFrequency {
                    value: raw_fq.to_string(),
                    row,
                })?;
            triples.push(Triple {
                entity_1: record.get(entity_1_col).unwrap_or("").to_string(),
                entity_2: record.get(entity_2_col).unwrap_or("").to_string(),
                fq,
            });
        }

        Ok(Self { triples })
    }

    /// Number of triples.
    #[inline]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the table holds no triples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// The triples in input order.
    #[inline]
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Iterate over triples in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Frequencies in input order.
    pub fn frequencies(&self) -> Vec<u64> {
        self.triples.iter().map(|t| t.fq).collect()
    }

    /// Sum of all frequencies.
    pub fn total_frequency(&self) -> u64 {
        self.triples.iter().map(|t| t.fq).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_preserves_order_and_duplicates() {
        let file = write_csv(
            "entity_1,entity_2,fq\n\
             cancer,current,50112\n\
             cancer,current,100\n\
             fire,fire,41171\n",
        );
        let table = TripleTable::from_csv(file.path()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.triples()[0], Triple::new("cancer", "current", 50112));
        assert_eq!(table.triples()[1], Triple::new("cancer", "current", 100));
        assert_eq!(table.triples()[2], Triple::new("fire", "fire", 41171));
        assert_eq!(table.total_frequency(), 91383);
    }

    #[test]
    fn test_extra_columns_ignored_and_header_order_free() {
        let file = write_csv(
            "source,fq,entity_2,entity_1\n\
             pubmed,7,flood,malaria\n",
        );
        let table = TripleTable::from_csv(file.path()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.triples()[0], Triple::new("malaria", "flood", 7));
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv("entity_1,entity_2,count\na,b,1\n");
        let err = TripleTable::from_csv(file.path()).unwrap_err();
        match err {
            crate::error::CoocError::MissingColumn { column } => assert_eq!(column, "fq"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_non_numeric_frequency() {
        let file = write_csv("entity_1,entity_2,fq\na,b,1\nc,d,many\n");
        let err = TripleTable::from_csv(file.path()).unwrap_err();
        match err {
            crate::error::CoocError::InvalidFrequency { value, row } => {
                assert_eq!(value, "many");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_negative_frequency_rejected() {
        let file = write_csv("entity_1,entity_2,fq\na,b,-3\n");
        assert!(TripleTable::from_csv(file.path()).is_err());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = write_csv("entity_1,entity_2,fq\n");
        let table = TripleTable::from_csv(file.path()).unwrap();
        assert!(table.is_empty());
    }
}
