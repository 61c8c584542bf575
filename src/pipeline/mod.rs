//! Stage composition and execution.
//!
//! Stages communicate only through files. Each stage declares the artifacts
//! it reads and writes, and a `Pipeline` refuses to compose a stage whose
//! inputs nothing upstream produces.

pub mod runner;
pub mod stage;

pub use runner::StageContext;
pub use stage::{Artifact, ArtifactPaths, Pipeline, Stage};
