//! Tabular datasets and the preprocessing stage.

pub mod label_encoder;
pub mod preprocess;
pub mod table;

pub use label_encoder::LabelEncoding;
pub use preprocess::{preprocess, Preprocessor};
pub use table::Dataset;
