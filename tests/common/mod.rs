//! Common fixtures for pipeline integration tests
//!
//! Builds small, fully separable spam/ham corpora and parameter sets rooted
//! in a temporary directory.

#![allow(dead_code)]

use std::ops::Range;
use std::path::Path;
use textclf_pipeline::dataset::Dataset;
use textclf_pipeline::Params;

pub const SPAM_WORDS: [&str; 8] = [
    "free", "prize", "winner", "cash", "claim", "urgent", "offer", "bonus",
];

pub const HAM_WORDS: [&str; 8] = [
    "lunch", "meeting", "tomorrow", "family", "dinner", "movie", "weekend", "garden",
];

/// Every word of the class once, plus one of them repeated so each index
/// gives a distinct message
pub fn message(words: &[&str], i: usize) -> String {
    let mut parts: Vec<String> = words.iter().map(|w| w.to_uppercase()).collect();
    for _ in 0..=(i / words.len()) {
        parts.push(words[i % words.len()].to_string());
    }
    format!("{}!!", parts.join(" "))
}

/// Interleaved spam and ham rows for the given message indexes
pub fn corpus(indexes: Range<usize>) -> Vec<(String, String)> {
    indexes
        .flat_map(|i| {
            [
                (message(&SPAM_WORDS, i), "spam".to_string()),
                (message(&HAM_WORDS, i), "ham".to_string()),
            ]
        })
        .collect()
}

pub fn write_split(path: &Path, rows: &[(String, String)]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(text, target)| vec![text.clone(), target.clone()])
        .collect();
    Dataset::new(vec!["text".to_string(), "target".to_string()], rows)
        .unwrap()
        .write_csv(path)
        .unwrap();
}

/// Parameters with every directory under `root`
pub fn params(root: &Path, n_estimator: usize, random_state: u64) -> Params {
    let document = format!(
        "
feature_engineering:
  max_feature: 16
model_training:
  n_estimator: {n_estimator}
  random_state: {random_state}
paths:
  data_dir: {root}/data
  models_dir: {root}/models
  reports_dir: {root}/reports
",
        root = root.display()
    );
    Params::from_yaml_str(&document).unwrap()
}
