use crate::error::{PathContext, PipelineError, Result};
use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Terms are runs of two or more word characters
static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern must be a valid regex"));

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// TF-IDF vectorizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfConfig {
    /// Maximum vocabulary size
    #[serde(rename = "max_feature")]
    pub max_features: usize,

    /// Minimum number of training documents a term must appear in
    #[serde(default = "default_min_doc_freq")]
    pub min_doc_freq: usize,

    /// Weight term counts by inverse document frequency
    #[serde(default = "default_true")]
    pub use_idf: bool,

    /// Add one to document counts when computing idf
    #[serde(default = "default_true")]
    pub smooth_idf: bool,

    #[serde(default)]
    pub norm: Norm,
}

impl TfidfConfig {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            min_doc_freq: default_min_doc_freq(),
            use_idf: true,
            smooth_idf: true,
            norm: Norm::L2,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_features < 1 {
            return Err(PipelineError::Config(format!(
                "feature_engineering.max_feature must be at least 1, got {}",
                self.max_features
            )));
        }
        if self.min_doc_freq < 1 {
            return Err(PipelineError::Config(
                "feature_engineering.min_doc_freq must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_min_doc_freq() -> usize {
    1
}

fn default_true() -> bool {
    true
}

/// Fits a vocabulary and idf weights on training texts
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
}

impl TfidfVectorizer {
    pub fn new(config: TfidfConfig) -> Self {
        Self { config }
    }

    /// Fit on the training texts and return the vocabulary with their matrix
    pub fn fit_transform<S: AsRef<str>>(&self, texts: &[S]) -> Result<(Vocabulary, Array2<f64>)> {
        let vocabulary = self.fit(texts)?;
        let matrix = vocabulary.transform(texts);
        Ok((vocabulary, matrix))
    }

    /// Fit the vocabulary only
    pub fn fit<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vocabulary> {
        self.config.validate()?;

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_count: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for (term, count) in count_terms(text.as_ref()) {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
                *total_count.entry(term).or_insert(0) += count;
            }
        }

        // Rank surviving terms by corpus frequency, ties lexicographic
        let mut ranked: Vec<(String, usize)> = total_count
            .into_iter()
            .filter(|(term, _)| doc_freq[term] >= self.config.min_doc_freq)
            .collect();
        ranked.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        ranked.truncate(self.config.max_features);

        if ranked.is_empty() {
            return Err(PipelineError::EmptyVocabulary(format!(
                "no terms left from {} training documents",
                texts.len()
            )));
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_docs = texts.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                if !self.config.use_idf {
                    return 1.0;
                }
                let df = doc_freq[term] as f64;
                if self.config.smooth_idf {
                    ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
                } else {
                    (n_docs / df).ln() + 1.0
                }
            })
            .collect();

        tracing::debug!(
            documents = texts.len(),
            terms = terms.len(),
            "Vocabulary fitted"
        );

        Ok(Vocabulary {
            terms,
            idf,
            norm: self.config.norm,
        })
    }
}

/// A fitted vocabulary: sorted terms, their idf weights and the row norm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    norm: Norm,
}

impl Vocabulary {
    /// Map texts to a matrix with one column per vocabulary term.
    /// Terms outside the vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Array2<f64> {
        let mut matrix = Array2::zeros((texts.len(), self.terms.len()));

        for (i, text) in texts.iter().enumerate() {
            let mut row = matrix.row_mut(i);
            for (term, count) in count_terms(text.as_ref()) {
                if let Some(j) = self.index_of(&term) {
                    row[j] = count as f64 * self.idf[j];
                }
            }

            if self.norm == Norm::L2 {
                let length = row.dot(&row).sqrt();
                if length > 0.0 {
                    row /= length;
                }
            }
        }

        matrix
    }

    /// Column index of a term
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn n_features(&self) -> usize {
        self.terms.len()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        serde_json::to_writer_pretty(BufWriter::new(File::create(path).with_path(path)?), self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path).with_path(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Lowercased term counts for one document
fn count_terms(text: &str) -> HashMap<String, usize> {
    let lowered = text.to_lowercase();
    let mut counts = HashMap::new();
    for m in TERM_PATTERN.find_iter(&lowered) {
        *counts.entry(m.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}
