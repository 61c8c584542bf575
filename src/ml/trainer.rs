use crate::error::{PathContext, PipelineError, Result};
use crate::ml::classifier::{Classifier, TrainedModel};
use crate::ml::models::{ModelMetadata, ModelTrainingConfig};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A trained classifier together with how it was trained
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub model: TrainedModel,
}

impl ModelArtifact {
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        self.model.predict(features)
    }

    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.model.predict_proba(features)
    }
}

/// Fits the configured classifier on a training feature set
pub struct Trainer {
    config: ModelTrainingConfig,
}

impl Trainer {
    pub fn new(config: ModelTrainingConfig) -> Self {
        Self { config }
    }

    pub fn train(&self, features: &Array2<f64>, labels: &[usize]) -> Result<ModelArtifact> {
        self.config.validate()?;

        if features.nrows() != labels.len() {
            return Err(PipelineError::shape_mismatch(
                format!("{} labels", features.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        if labels.is_empty() {
            return Err(PipelineError::EmptyDataset(
                "training split has no rows".to_string(),
            ));
        }

        tracing::info!(
            model_type = %self.config.model_type,
            samples = features.nrows(),
            features = features.ncols(),
            "Training classifier"
        );

        let mut model = TrainedModel::from_config(&self.config);
        model.fit(features, labels)?;

        let predictions = model.predict(features)?;
        let correct = predictions
            .iter()
            .zip(labels)
            .filter(|(p, t)| p == t)
            .count();
        let training_accuracy = correct as f64 / labels.len() as f64;

        let metadata = ModelMetadata {
            model_type: model.model_type(),
            trained_at: chrono::Utc::now(),
            n_training_samples: labels.len(),
            n_features: features.ncols(),
            n_classes: model.n_classes(),
            training_accuracy,
            hyperparameters: self.config.hyperparameters(),
        };

        tracing::debug!(training_accuracy, "Classifier trained");

        Ok(ModelArtifact { metadata, model })
    }
}

/// Persist a model artifact with bincode, creating parent directories
pub fn save_model(artifact: &ModelArtifact, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    let writer = BufWriter::new(File::create(path).with_path(path)?);
    bincode::serialize_into(writer, artifact)?;

    tracing::debug!(path = %path.display(), "Model saved");
    Ok(())
}

pub fn load_model(path: impl AsRef<Path>) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path).with_path(path)?);
    let artifact: ModelArtifact = bincode::deserialize_from(reader)?;

    tracing::debug!(
        path = %path.display(),
        model_type = %artifact.metadata.model_type,
        "Model loaded"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::models::ModelType;
    use ndarray::array;

    fn data() -> (Array2<f64>, Vec<usize>) {
        let features = array![
            [1.0, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [0.8, 0.0, 0.2],
            [0.0, 1.0, 0.9],
            [0.1, 0.8, 1.0],
            [0.0, 0.9, 0.8],
        ];
        (features, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_train_records_metadata() {
        let (features, labels) = data();
        let artifact = Trainer::new(ModelTrainingConfig::new(5, 2))
            .train(&features, &labels)
            .unwrap();

        assert_eq!(artifact.metadata.model_type, ModelType::RandomForest);
        assert_eq!(artifact.metadata.n_training_samples, 6);
        assert_eq!(artifact.metadata.n_features, 3);
        assert_eq!(artifact.metadata.n_classes, 2);
        assert_eq!(artifact.metadata.hyperparameters["n_estimator"], "5");
        assert!(artifact.model.is_trained());
    }

    #[test]
    fn test_row_count_mismatch() {
        let features = Array2::zeros((5, 3));
        let labels = vec![0, 1, 0, 1];
        let err = Trainer::new(ModelTrainingConfig::new(5, 2))
            .train(&features, &labels)
            .unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_training_set() {
        let err = Trainer::new(ModelTrainingConfig::new(5, 2))
            .train(&Array2::zeros((0, 3)), &[])
            .unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DATASET");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (features, labels) = data();
        let err = Trainer::new(ModelTrainingConfig::new(0, 2))
            .train(&features, &labels)
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_model_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("model.bin");
        let (features, labels) = data();

        for model_type in [ModelType::RandomForest, ModelType::DecisionTree] {
            let mut config = ModelTrainingConfig::new(7, 11);
            config.model_type = model_type;
            let artifact = Trainer::new(config).train(&features, &labels).unwrap();

            save_model(&artifact, &path).unwrap();
            let loaded = load_model(&path).unwrap();

            assert_eq!(loaded.metadata, artifact.metadata);
            assert_eq!(
                loaded.predict_proba(&features).unwrap(),
                artifact.predict_proba(&features).unwrap()
            );
        }
    }

    #[test]
    fn test_load_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path().join("model.bin")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("model.bin"));
    }

    #[test]
    fn test_save_over_directory_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::create_dir(&path).unwrap();

        let (features, labels) = data();
        let artifact = Trainer::new(ModelTrainingConfig::new(3, 1))
            .train(&features, &labels)
            .unwrap();

        let err = save_model(&artifact, &path).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("model.bin"));
    }
}
