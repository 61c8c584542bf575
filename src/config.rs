use crate::error::{PipelineError, Result};
use crate::features::TfidfConfig;
use crate::ml::ModelTrainingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TEXTCLF";

/// Pipeline parameters shared by every stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Vectorizer configuration
    pub feature_engineering: TfidfConfig,

    /// Classifier configuration
    pub model_training: ModelTrainingConfig,

    /// Column naming for raw and interim datasets
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    /// Artifact directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Diagnostics configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Params {
    /// Load parameters from a YAML file, with `TEXTCLF__` environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::Config(format!(
                "parameters file not found: {}",
                path.display()
            )));
        }

        let params: Params = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            // Override with environment variables (prefix: TEXTCLF__)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        params.validate()?;
        Ok(params)
    }

    /// Parse parameters from an in-memory YAML document
    pub fn from_yaml_str(document: &str) -> Result<Self> {
        let params: Params = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?;

        params.validate()?;
        Ok(params)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.feature_engineering.validate()?;
        self.model_training.validate()?;

        if self.preprocessing.text_column.is_empty() || self.preprocessing.target_column.is_empty()
        {
            return Err(PipelineError::Config(
                "preprocessing column names must not be empty".to_string(),
            ));
        }

        if self.preprocessing.text_column == self.preprocessing.target_column {
            return Err(PipelineError::Config(format!(
                "text_column and target_column must differ (both '{}')",
                self.preprocessing.text_column
            )));
        }

        Ok(())
    }
}

/// Column names used by the preprocessing stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    #[serde(default = "default_text_column")]
    pub text_column: String,

    #[serde(default = "default_target_column")]
    pub target_column: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            target_column: default_target_column(),
        }
    }
}

/// Root directories for pipeline artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Holds raw/, interim/ and processed/
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            models_dir: default_models_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for the run log file; `None` logs to the console only
    #[serde(default = "default_log_dir")]
    pub dir: Option<PathBuf>,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// Default value functions
fn default_text_column() -> String {
    "text".to_string()
}

fn default_target_column() -> String {
    "target".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_dir() -> Option<PathBuf> {
    Some(PathBuf::from("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Norm;
    use crate::ml::ModelType;

    const MINIMAL: &str = "
feature_engineering:
  max_feature: 50
model_training:
  n_estimator: 25
  random_state: 2
";

    #[test]
    fn test_minimal_params_use_defaults() {
        let params = Params::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(params.feature_engineering.max_features, 50);
        assert_eq!(params.feature_engineering.min_doc_freq, 1);
        assert!(params.feature_engineering.use_idf);
        assert_eq!(params.feature_engineering.norm, Norm::L2);
        assert_eq!(params.model_training.n_estimators, 25);
        assert_eq!(params.model_training.random_state, 2);
        assert_eq!(params.model_training.model_type, ModelType::RandomForest);
        assert_eq!(params.preprocessing.text_column, "text");
        assert_eq!(params.paths.data_dir, PathBuf::from("data"));
        assert_eq!(params.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_full_params() {
        let document = "
feature_engineering:
  max_feature: 10
  min_doc_freq: 2
  use_idf: false
  norm: none
model_training:
  n_estimator: 5
  random_state: 7
  model_type: decision_tree
  max_depth: 4
preprocessing:
  text_column: message
  target_column: category
paths:
  data_dir: /tmp/data
logging:
  level: info
  format: json
";
        let params = Params::from_yaml_str(document).unwrap();

        assert_eq!(params.feature_engineering.min_doc_freq, 2);
        assert!(!params.feature_engineering.use_idf);
        assert_eq!(params.feature_engineering.norm, Norm::None);
        assert_eq!(params.model_training.model_type, ModelType::DecisionTree);
        assert_eq!(params.model_training.max_depth, Some(4));
        assert_eq!(params.preprocessing.target_column, "category");
        assert_eq!(params.paths.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(params.paths.models_dir, PathBuf::from("models"));
        assert_eq!(params.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_zero_max_feature_is_config_error() {
        let document = MINIMAL.replace("max_feature: 50", "max_feature: 0");
        let err = Params::from_yaml_str(&document).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_zero_estimators_is_config_error() {
        let document = MINIMAL.replace("n_estimator: 25", "n_estimator: 0");
        let err = Params::from_yaml_str(&document).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let document = "
feature_engineering:
  max_feature: 50
";
        assert!(matches!(
            Params::from_yaml_str(document),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.yaml");
        std::fs::write(&path, MINIMAL).unwrap();

        let params = Params::load(&path).unwrap();
        assert_eq!(params.feature_engineering.max_features, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Params::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }
}
