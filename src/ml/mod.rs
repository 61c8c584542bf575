/// Model training and evaluation
///
/// This module provides:
/// - The `Classifier` abstraction with random forest and decision tree
///   implementations backed by CART trees
/// - Shape-checked training and model artifact persistence
/// - Binary evaluation metrics (accuracy, precision, recall, ROC AUC)

pub mod classifier;
pub mod evaluation;
pub mod models;
pub mod trainer;

pub use classifier::{Classifier, ForestClassifier, TrainedModel, TreeClassifier};
pub use evaluation::{evaluate, load_metrics, roc_auc, save_metrics};
pub use models::{EvaluationMetrics, ModelMetadata, ModelTrainingConfig, ModelType};
pub use trainer::{load_model, save_model, ModelArtifact, Trainer};
