use crate::config::Params;
use crate::dataset::{Dataset, Preprocessor};
use crate::error::{PipelineError, Result};
use crate::features::{FeatureSet, TfidfVectorizer};
use crate::ml::{evaluate, load_model, save_metrics, save_model, Trainer};
use crate::pipeline::stage::{Artifact, ArtifactPaths, Stage};
use std::io;
use std::path::{Path, PathBuf};

/// Shared state for running stages: parameters and artifact locations
#[derive(Debug, Clone)]
pub struct StageContext {
    params: Params,
    paths: ArtifactPaths,
}

impl StageContext {
    pub fn new(params: Params) -> Self {
        let paths = ArtifactPaths::new(&params.paths);
        Self { params, paths }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.paths.path(artifact)
    }

    /// Run one stage. Failures are logged once here and returned.
    pub fn run_stage(&self, stage: Stage) -> Result<()> {
        let span = tracing::info_span!("stage", stage = %stage);
        let _enter = span.enter();

        tracing::info!("Stage started");
        let result = self
            .check_inputs(stage)
            .and_then(|()| match stage {
                Stage::Preprocess => self.preprocess(),
                Stage::FeatureEngineering => self.feature_engineering(),
                Stage::Training => self.training(),
                Stage::Evaluation => self.evaluation(),
            });

        match &result {
            Ok(()) => tracing::info!("Stage completed"),
            Err(e) => tracing::error!(error = %e, code = e.error_code(), "Stage failed"),
        }
        result
    }

    fn check_inputs(&self, stage: Stage) -> Result<()> {
        for &artifact in stage.inputs() {
            let path = self.path(artifact);
            if !path.exists() {
                return Err(PipelineError::file(
                    path,
                    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", artifact)),
                ));
            }
        }
        Ok(())
    }

    fn preprocess(&self) -> Result<()> {
        let columns = &self.params.preprocessing;
        let train = Dataset::read_csv(self.path(Artifact::RawTrain))?;
        let test = Dataset::read_csv(self.path(Artifact::RawTest))?;

        let preprocessor = Preprocessor::new(&columns.text_column, &columns.target_column);
        let (encoding, train) = preprocessor.fit_preprocess(train)?;
        let test = preprocessor.preprocess_with(test, &encoding)?;

        train.write_csv(self.path(Artifact::InterimTrain))?;
        test.write_csv(self.path(Artifact::InterimTest))?;
        encoding.save(self.path(Artifact::LabelEncoding))?;

        tracing::info!(
            train_rows = train.len(),
            test_rows = test.len(),
            classes = encoding.len(),
            "Preprocessed data saved"
        );
        Ok(())
    }

    fn feature_engineering(&self) -> Result<()> {
        let train_path = self.path(Artifact::InterimTrain);
        let test_path = self.path(Artifact::InterimTest);
        let (train_texts, train_labels) = self.texts_and_labels(&train_path)?;
        let (test_texts, test_labels) = self.texts_and_labels(&test_path)?;

        let vectorizer = TfidfVectorizer::new(self.params.feature_engineering.clone());
        let (vocabulary, train_features) = vectorizer.fit_transform(&train_texts)?;
        let test_features = vocabulary.transform(&test_texts);

        FeatureSet::new(train_features, train_labels)?
            .write_csv(self.path(Artifact::ProcessedTrain))?;
        FeatureSet::new(test_features, test_labels)?
            .write_csv(self.path(Artifact::ProcessedTest))?;
        vocabulary.save(self.path(Artifact::Vocabulary))?;

        tracing::info!(features = vocabulary.n_features(), "Features saved");
        Ok(())
    }

    fn training(&self) -> Result<()> {
        let train = FeatureSet::read_csv(self.path(Artifact::ProcessedTrain))?;
        let artifact = Trainer::new(self.params.model_training.clone())
            .train(&train.features, &train.labels)?;

        let path = self.path(Artifact::Model);
        save_model(&artifact, &path)?;
        tracing::info!(
            path = %path.display(),
            training_accuracy = artifact.metadata.training_accuracy,
            "Model saved"
        );
        Ok(())
    }

    fn evaluation(&self) -> Result<()> {
        let artifact = load_model(self.path(Artifact::Model))?;
        let test = FeatureSet::read_csv(self.path(Artifact::ProcessedTest))?;

        let metrics = evaluate(&artifact.model, &test.features, &test.labels)?;

        let path = self.path(Artifact::Metrics);
        save_metrics(&metrics, &path)?;
        tracing::info!(path = %path.display(), "Metrics saved");
        Ok(())
    }

    /// Normalized texts and encoded labels from an interim split
    fn texts_and_labels(&self, path: &Path) -> Result<(Vec<String>, Vec<usize>)> {
        let columns = &self.params.preprocessing;
        let dataset = Dataset::read_csv(path)?;
        let text = dataset.column_index(&columns.text_column)?;
        let target = dataset.column_index(&columns.target_column)?;

        let mut texts = Vec::with_capacity(dataset.len());
        let mut labels = Vec::with_capacity(dataset.len());
        for (index, row) in dataset.rows().iter().enumerate() {
            let label = row[target].trim().parse::<usize>().map_err(|e| {
                PipelineError::parse(
                    path,
                    format!("row {}: label '{}' is not an encoded class: {}", index, row[target], e),
                )
            })?;
            texts.push(row[text].clone());
            labels.push(label);
        }

        tracing::debug!(path = %path.display(), rows = texts.len(), "Interim split loaded");
        Ok((texts, labels))
    }
}
