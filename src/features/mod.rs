/// TF-IDF feature engineering
///
/// The vocabulary is fitted on the training split only and then applied
/// unchanged to every other split, so column `j` means the same term
/// everywhere.

pub mod feature_set;
pub mod vectorizer;

pub use feature_set::FeatureSet;
pub use vectorizer::{Norm, TfidfConfig, TfidfVectorizer, Vocabulary};
