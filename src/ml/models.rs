use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classifier training configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelTrainingConfig {
    /// Number of trees in the forest
    #[serde(rename = "n_estimator")]
    pub n_estimators: usize,

    /// Seed for bootstrap sampling
    pub random_state: u64,

    /// Classifier family
    #[serde(default)]
    pub model_type: ModelType,

    /// Maximum tree depth (unbounded when absent)
    #[serde(default)]
    pub max_depth: Option<u16>,
}

impl ModelTrainingConfig {
    pub fn new(n_estimators: usize, random_state: u64) -> Self {
        Self {
            n_estimators,
            random_state,
            model_type: ModelType::default(),
            max_depth: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators < 1 {
            return Err(PipelineError::Config(format!(
                "model_training.n_estimator must be at least 1, got {}",
                self.n_estimators
            )));
        }
        if self.max_depth == Some(0) {
            return Err(PipelineError::Config(
                "model_training.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Hyperparameters as recorded in model metadata
    pub fn hyperparameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if self.model_type == ModelType::RandomForest {
            params.insert("n_estimator".to_string(), self.n_estimators.to_string());
            params.insert("random_state".to_string(), self.random_state.to_string());
        }
        params.insert(
            "max_depth".to_string(),
            self.max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".to_string()),
        );
        params
    }
}

/// Model type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Bootstrap-aggregated decision trees
    #[default]
    RandomForest,

    /// A single decision tree
    DecisionTree,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::RandomForest => write!(f, "Random Forest"),
            ModelType::DecisionTree => write!(f, "Decision Tree"),
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    /// Model type
    pub model_type: ModelType,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of features
    pub n_features: usize,

    /// Number of classes seen in training
    pub n_classes: usize,

    /// Accuracy on the training split
    pub training_accuracy: f64,

    /// Hyperparameters
    pub hyperparameters: BTreeMap<String, String>,
}

/// Held-out evaluation metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub auc: f64,
}
