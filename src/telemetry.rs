use crate::config::{LogFormat, LoggingConfig};
use crate::error::{PathContext, PipelineError, Result};
use std::fs::{self, File};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: a console layer plus, when a log
/// directory is configured, an appending `<name>.log` file layer.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig, name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| PipelineError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let file = match &config.dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_path(dir)?;
            let path = dir.join(format!("{}.log", name));
            Some(Arc::new(
                File::options()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_path(&path)?,
            ))
        }
        None => None,
    };

    let json = config.format == LogFormat::Json;

    let console_text = (!json).then(|| fmt::layer().with_target(true));
    let console_json = json.then(|| fmt::layer().json());
    let file_text = file
        .clone()
        .filter(|_| !json)
        .map(|f| fmt::layer().with_ansi(false).with_writer(f));
    let file_json = file
        .filter(|_| json)
        .map(|f| fmt::layer().json().with_writer(f));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_text)
        .with(console_json)
        .with(file_text)
        .with(file_json)
        .try_init()
        .map_err(|e| PipelineError::Config(format!("failed to install logger: {}", e)))?;

    Ok(())
}
