use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use textclf_pipeline::{telemetry, Params, Pipeline, Stage, StageContext};

#[derive(Parser)]
#[command(name = "textclf", version)]
#[command(about = "File-based text classification pipeline", long_about = None)]
struct Cli {
    /// Parameters file
    #[arg(short, long, global = true, default_value = "params.yaml", env = "TEXTCLF_PARAMS")]
    params: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage in order
    Run,

    /// Clean and normalize the raw splits
    Preprocess,

    /// Fit the TF-IDF vocabulary and write feature matrices
    Features,

    /// Train the classifier on the processed train split
    Train,

    /// Score the model on the processed test split
    Evaluate,
}

impl Commands {
    fn pipeline(&self) -> textclf_pipeline::Result<Pipeline> {
        Ok(match self {
            Commands::Run => Pipeline::full()?,
            Commands::Preprocess => Pipeline::single(Stage::Preprocess),
            Commands::Features => Pipeline::single(Stage::FeatureEngineering),
            Commands::Train => Pipeline::single(Stage::Training),
            Commands::Evaluate => Pipeline::single(Stage::Evaluation),
        })
    }

    /// Log file stem for this invocation
    fn log_name(&self) -> &'static str {
        match self {
            Commands::Run => "pipeline",
            Commands::Preprocess => Stage::Preprocess.name(),
            Commands::Features => Stage::FeatureEngineering.name(),
            Commands::Train => Stage::Training.name(),
            Commands::Evaluate => Stage::Evaluation.name(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let params = Params::load(&cli.params)
        .with_context(|| format!("failed to load parameters from {}", cli.params.display()))?;

    telemetry::init(&params.logging, cli.command.log_name())
        .context("failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        params = %cli.params.display(),
        "Starting textclf"
    );
    tracing::debug!(
        max_features = params.feature_engineering.max_features,
        n_estimators = params.model_training.n_estimators,
        model_type = %params.model_training.model_type,
        "Parameters loaded"
    );

    let pipeline = cli.command.pipeline().context("invalid stage composition")?;
    pipeline
        .run(&StageContext::new(params))
        .context("pipeline run failed")?;

    Ok(())
}
