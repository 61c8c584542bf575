//! File-based text classification pipeline.
//!
//! Raw labeled text is normalized, vectorized with TF-IDF over a vocabulary
//! fitted on the training split, used to train a tree-ensemble classifier,
//! and evaluated on the held-out split. Each stage reads and writes files.

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod ml;
pub mod pipeline;
pub mod telemetry;
pub mod text;

pub use config::Params;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, Stage, StageContext};
