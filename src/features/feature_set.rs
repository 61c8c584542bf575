use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use ndarray::Array2;
use std::path::Path;

const LABEL_COLUMN: &str = "label";

/// A feature matrix paired with encoded labels, as stored in the
/// processed CSV files (`0,1,...,k-1,label`).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}

impl FeatureSet {
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(PipelineError::shape_mismatch(
                format!("{} labels", features.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Write as CSV with numbered feature columns and a trailing label column
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut headers: Vec<String> = (0..self.n_features()).map(|j| j.to_string()).collect();
        headers.push(LABEL_COLUMN.to_string());

        let rows: Vec<Vec<String>> = self
            .features
            .rows()
            .into_iter()
            .zip(&self.labels)
            .map(|(row, label)| {
                row.iter()
                    .map(|v| v.to_string())
                    .chain(std::iter::once(label.to_string()))
                    .collect()
            })
            .collect();

        Dataset::new(headers, rows)?.write_csv(path)
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::read_csv(path)?;

        let label = dataset.column_index(LABEL_COLUMN)?;
        if label + 1 != dataset.headers().len() {
            return Err(PipelineError::parse(
                path,
                "label must be the last column",
            ));
        }

        let n_features = label;
        let mut values = Vec::with_capacity(dataset.len() * n_features);
        let mut labels = Vec::with_capacity(dataset.len());

        for (index, row) in dataset.rows().iter().enumerate() {
            for cell in &row[..n_features] {
                let value = cell.trim().parse::<f64>().map_err(|e| {
                    PipelineError::parse(path, format!("row {}: bad feature '{}': {}", index, cell, e))
                })?;
                values.push(value);
            }
            let code = row[label].trim().parse::<usize>().map_err(|e| {
                PipelineError::parse(path, format!("row {}: bad label '{}': {}", index, row[label], e))
            })?;
            labels.push(code);
        }

        let features = Array2::from_shape_vec((labels.len(), n_features), values)
            .map_err(|e| PipelineError::parse(path, e.to_string()))?;

        Self::new(features, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_csv_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("train_tfidf.csv");

        let features = array![[0.1, 0.0, 1.0 / 3.0], [0.7071067811865475, 0.2, 0.0]];
        let set = FeatureSet::new(features, vec![0, 1]).unwrap();
        set.write_csv(&path).unwrap();

        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("0,1,2,label\n"));

        assert_eq!(FeatureSet::read_csv(&path).unwrap(), set);
    }

    #[test]
    fn test_length_mismatch() {
        let err = FeatureSet::new(Array2::zeros((5, 2)), vec![0; 4]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }

    #[test]
    fn test_missing_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "0,1\n0.5,0.5\n").unwrap();

        let err = FeatureSet::read_csv(&path).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_bad_value_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "0,label\nabc,1\n").unwrap();

        let err = FeatureSet::read_csv(&path).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
