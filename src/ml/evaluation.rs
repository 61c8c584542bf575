use crate::error::{PathContext, PipelineError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::models::EvaluationMetrics;
use ndarray::Array2;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Score a binary classifier on a held-out split.
///
/// Class 1 is the positive class. The model must have been trained on two
/// classes and `labels` must contain both 0 and 1 and nothing else.
pub fn evaluate<C>(model: &C, features: &Array2<f64>, labels: &[usize]) -> Result<EvaluationMetrics>
where
    C: Classifier + ?Sized,
{
    if features.nrows() != labels.len() {
        return Err(PipelineError::shape_mismatch(
            format!("{} labels", features.nrows()),
            format!("{} labels", labels.len()),
        ));
    }
    if features.ncols() != model.n_features() {
        return Err(PipelineError::shape_mismatch(
            format!("{} features", model.n_features()),
            format!("{} features", features.ncols()),
        ));
    }
    if model.n_classes() != 2 {
        return Err(PipelineError::Unsupported(format!(
            "binary metrics need a two-class model, got {} classes",
            model.n_classes()
        )));
    }

    let has_negative = labels.contains(&0);
    let has_positive = labels.contains(&1);
    if !has_negative || !has_positive || labels.iter().any(|&l| l > 1) {
        return Err(PipelineError::Unsupported(
            "evaluation labels must contain exactly the classes 0 and 1".to_string(),
        ));
    }

    let predictions = model.predict(features)?;
    let proba = model.predict_proba(features)?;
    let scores: Vec<f64> = proba.column(1).to_vec();

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_count = 0usize;
    let mut correct = 0usize;
    for (&truth, &pred) in labels.iter().zip(&predictions) {
        if truth == pred {
            correct += 1;
        }
        match (truth, pred) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_count += 1,
            _ => {}
        }
    }

    let metrics = EvaluationMetrics {
        accuracy: correct as f64 / labels.len() as f64,
        precision: ratio(tp, tp + fp),
        recall: ratio(tp, tp + fn_count),
        auc: roc_auc(labels, &scores)?,
    };

    tracing::info!(
        accuracy = metrics.accuracy,
        precision = metrics.precision,
        recall = metrics.recall,
        auc = metrics.auc,
        "Model evaluated"
    );

    Ok(metrics)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Area under the ROC curve for binary labels and positive-class scores,
/// computed as the normalized Mann-Whitney U statistic with tied scores
/// sharing their average rank.
pub fn roc_auc(labels: &[usize], scores: &[f64]) -> Result<f64> {
    if labels.len() != scores.len() {
        return Err(PipelineError::shape_mismatch(
            format!("{} scores", labels.len()),
            format!("{} scores", scores.len()),
        ));
    }

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(PipelineError::Unsupported(
            "ROC AUC needs both positive and negative samples".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1..=end share their mean
        let average = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = average;
        }
        start = end;
    }

    let positive_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(l, _)| **l == 1)
        .map(|(_, r)| *r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Write metrics as a pretty-printed JSON object
pub fn save_metrics(metrics: &EvaluationMetrics, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    serde_json::to_writer_pretty(BufWriter::new(File::create(path).with_path(path)?), metrics)?;
    tracing::debug!(path = %path.display(), "Metrics saved");
    Ok(())
}

pub fn load_metrics(path: impl AsRef<Path>) -> Result<EvaluationMetrics> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path).with_path(path)?);
    Ok(serde_json::from_reader(reader)?)
}
