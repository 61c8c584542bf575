use crate::config::PathsConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::runner::StageContext;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Files exchanged between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    RawTrain,
    RawTest,
    InterimTrain,
    InterimTest,
    LabelEncoding,
    ProcessedTrain,
    ProcessedTest,
    Vocabulary,
    Model,
    Metrics,
}

impl Artifact {
    /// Supplied from outside the pipeline rather than produced by a stage
    pub fn is_external(self) -> bool {
        matches!(self, Artifact::RawTrain | Artifact::RawTest)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::RawTrain => "raw train split",
            Artifact::RawTest => "raw test split",
            Artifact::InterimTrain => "interim train split",
            Artifact::InterimTest => "interim test split",
            Artifact::LabelEncoding => "label encoding",
            Artifact::ProcessedTrain => "processed train features",
            Artifact::ProcessedTest => "processed test features",
            Artifact::Vocabulary => "vocabulary",
            Artifact::Model => "model",
            Artifact::Metrics => "metrics report",
        };
        f.write_str(name)
    }
}

/// Pipeline stages in their natural order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preprocess,
    FeatureEngineering,
    Training,
    Evaluation,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Preprocess,
        Stage::FeatureEngineering,
        Stage::Training,
        Stage::Evaluation,
    ];

    pub fn inputs(self) -> &'static [Artifact] {
        match self {
            Stage::Preprocess => &[Artifact::RawTrain, Artifact::RawTest],
            Stage::FeatureEngineering => &[Artifact::InterimTrain, Artifact::InterimTest],
            Stage::Training => &[Artifact::ProcessedTrain],
            Stage::Evaluation => &[Artifact::Model, Artifact::ProcessedTest],
        }
    }

    pub fn outputs(self) -> &'static [Artifact] {
        match self {
            Stage::Preprocess => &[
                Artifact::InterimTrain,
                Artifact::InterimTest,
                Artifact::LabelEncoding,
            ],
            Stage::FeatureEngineering => &[
                Artifact::ProcessedTrain,
                Artifact::ProcessedTest,
                Artifact::Vocabulary,
            ],
            Stage::Training => &[Artifact::Model],
            Stage::Evaluation => &[Artifact::Metrics],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::FeatureEngineering => "feature_engineering",
            Stage::Training => "training",
            Stage::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of stages whose artifact dependencies have been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Compose a pipeline. Every input must be external or produced by an
    /// earlier stage, and no stage may appear twice.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        let mut produced: HashSet<Artifact> = HashSet::new();
        let mut seen: HashSet<Stage> = HashSet::new();

        for &stage in &stages {
            if !seen.insert(stage) {
                return Err(PipelineError::Config(format!(
                    "stage '{}' appears more than once",
                    stage
                )));
            }

            if let Some(missing) = stage
                .inputs()
                .iter()
                .find(|a| !a.is_external() && !produced.contains(*a))
            {
                return Err(PipelineError::Config(format!(
                    "stage '{}' needs the {}, which no earlier stage produces",
                    stage, missing
                )));
            }

            produced.extend(stage.outputs().iter().copied());
        }

        Ok(Self { stages })
    }

    /// All four stages in order
    pub fn full() -> Result<Self> {
        Self::new(Stage::ALL.to_vec())
    }

    /// A single stage reading artifacts left by earlier runs
    pub fn single(stage: Stage) -> Self {
        Self {
            stages: vec![stage],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run the stages in order, stopping at the first failure
    pub fn run(&self, ctx: &StageContext) -> Result<()> {
        for &stage in &self.stages {
            ctx.run_stage(stage)?;
        }
        tracing::info!(stages = self.stages.len(), "Pipeline finished");
        Ok(())
    }
}

/// Resolves artifacts to files under the configured directories
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    data_dir: PathBuf,
    models_dir: PathBuf,
    reports_dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(config: &PathsConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            models_dir: config.models_dir.clone(),
            reports_dir: config.reports_dir.clone(),
        }
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        let raw = self.data_dir.join("raw");
        let interim = self.data_dir.join("interim");
        let processed = self.data_dir.join("processed");

        match artifact {
            Artifact::RawTrain => raw.join("train.csv"),
            Artifact::RawTest => raw.join("test.csv"),
            Artifact::InterimTrain => interim.join("train_processed.csv"),
            Artifact::InterimTest => interim.join("test_processed.csv"),
            Artifact::LabelEncoding => interim.join("label_encoding.json"),
            Artifact::ProcessedTrain => processed.join("train_tfidf.csv"),
            Artifact::ProcessedTest => processed.join("test_tfidf.csv"),
            Artifact::Vocabulary => self.models_dir.join("vocabulary.json"),
            Artifact::Model => self.models_dir.join("model.bin"),
            Artifact::Metrics => self.reports_dir.join("metrics.json"),
        }
    }
}
