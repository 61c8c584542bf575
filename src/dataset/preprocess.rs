use crate::dataset::label_encoder::LabelEncoding;
use crate::dataset::table::Dataset;
use crate::error::{PipelineError, Result};
use crate::text::{TextNormalizer, TextTransform};
use std::collections::HashSet;

/// Cleans a labeled text dataset: schema check, label encoding,
/// duplicate removal, then text normalization.
pub struct Preprocessor<T: TextTransform = TextNormalizer> {
    text_column: String,
    target_column: String,
    transform: T,
}

impl Preprocessor<TextNormalizer> {
    /// Preprocessor using the default English normalizer
    pub fn new(text_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self::with_transform(text_column, target_column, TextNormalizer::new())
    }
}

impl<T: TextTransform> Preprocessor<T> {
    pub fn with_transform(
        text_column: impl Into<String>,
        target_column: impl Into<String>,
        transform: T,
    ) -> Self {
        Self {
            text_column: text_column.into(),
            target_column: target_column.into(),
            transform,
        }
    }

    /// Fit a label encoding on this dataset, then preprocess it
    pub fn fit_preprocess(&self, dataset: Dataset) -> Result<(LabelEncoding, Dataset)> {
        let target = dataset.column_index(&self.target_column)?;
        dataset.column_index(&self.text_column)?;

        let encoding = LabelEncoding::fit(dataset.rows().iter().map(|row| row[target].as_str()));
        tracing::debug!(
            column = %self.target_column,
            classes = encoding.len(),
            "Label encoding fitted"
        );

        let processed = self.preprocess_with(dataset, &encoding)?;
        Ok((encoding, processed))
    }

    /// Preprocess with a previously fitted label encoding
    pub fn preprocess_with(&self, dataset: Dataset, encoding: &LabelEncoding) -> Result<Dataset> {
        let text = dataset.column_index(&self.text_column)?;
        let target = dataset.column_index(&self.target_column)?;
        let input_rows = dataset.len();
        let (headers, rows) = dataset.into_parts();

        // Encode labels in place
        let mut encoded = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            let code = encoding
                .encode(&row[target])
                .ok_or_else(|| PipelineError::UnseenLabel {
                    value: row[target].clone(),
                    row: index,
                })?;
            row[target] = code.to_string();
            encoded.push((index, row));
        }
        tracing::debug!(column = %self.target_column, "Target column encoded");

        // Keep the first occurrence of each fully identical row
        let mut seen = HashSet::with_capacity(encoded.len());
        let unique: Vec<(usize, Vec<String>)> = encoded
            .into_iter()
            .filter(|(_, row)| seen.insert(row.clone()))
            .collect();
        tracing::debug!(
            removed = input_rows - unique.len(),
            remaining = unique.len(),
            "Duplicates removed"
        );

        let mut cleaned = Vec::with_capacity(unique.len());
        for (index, mut row) in unique {
            row[text] = self
                .transform
                .transform(&row[text])
                .map_err(|e| PipelineError::Transform {
                    row: index,
                    message: e.to_string(),
                })?;
            cleaned.push(row);
        }
        tracing::debug!(column = %self.text_column, "Text column transformed");

        Dataset::new(headers, cleaned)
    }
}

/// Preprocess a single dataset, fitting its own label encoding
pub fn preprocess(dataset: Dataset, text_field: &str, label_field: &str) -> Result<Dataset> {
    let (_, processed) = Preprocessor::new(text_field, label_field).fit_preprocess(dataset)?;
    Ok(processed)
}
