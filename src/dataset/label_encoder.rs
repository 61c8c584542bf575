use crate::error::{PathContext, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Mapping from distinct label values to contiguous integer codes.
///
/// Codes follow the sorted order of the distinct values: numeric order when
/// every value parses as a number, lexicographic order otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoding {
    classes: Vec<String>,
}

impl LabelEncoding {
    /// Fit an encoding from the observed label values
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let mut classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        let numeric: Option<Vec<f64>> = classes
            .iter()
            .map(|c| c.trim().parse::<f64>().ok().filter(|v| !v.is_nan()))
            .collect();

        if let Some(keys) = numeric {
            let mut keyed: Vec<(f64, String)> = keys.into_iter().zip(classes).collect();
            keyed.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.1.cmp(&b.1))
            });
            classes = keyed.into_iter().map(|(_, c)| c).collect();
        }

        Self { classes }
    }

    /// Code for a label value, if it was seen during fitting
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == value)
    }

    /// Original label value for a code
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Distinct values in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Persist as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        let writer = BufWriter::new(File::create(path).with_path(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path).with_path(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
