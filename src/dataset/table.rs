use crate::error::{PathContext, PipelineError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// An in-memory tabular dataset: a header row plus string cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Create a dataset, checking every row has one cell per header
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(PipelineError::shape_mismatch(
                format!("{} cells per row", headers.len()),
                format!("{} cells in row {}", row.len(), index),
            ));
        }

        Ok(Self { headers, rows })
    }

    /// Convenience constructor from string slices
    pub fn from_records(headers: &[&str], rows: &[&[&str]]) -> Result<Self> {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Read a comma-separated file with a header row
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_path(path)?;
        let dataset = Self::from_reader(file, path)?;

        tracing::debug!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Read CSV from any reader; `source` is only used in error messages
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| PipelineError::parse(source, e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::parse(source, "missing header row"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| PipelineError::parse(source, e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Write the dataset as CSV, creating parent directories
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }

        let file = File::create(path).with_path(path)?;
        self.to_writer(file)?;

        tracing::debug!(path = %path.display(), rows = self.len(), "Dataset saved");
        Ok(())
    }

    /// Write the dataset as CSV to any writer
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers).map_err(csv_write_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_write_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column, or a schema error naming it
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::Schema {
                column: name.to_string(),
            })
    }

    /// All values of a named column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }
}

fn csv_write_error(err: csv::Error) -> PipelineError {
    PipelineError::Serialization(format!("Failed to write CSV record: {}", err))
}
