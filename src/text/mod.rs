/// Text normalization
///
/// This module turns free text into the cleaned token strings the
/// vectorizer consumes:
/// - Penn-Treebank-style word tokenization
/// - English stopword and punctuation filtering
/// - Porter stemming
/// - The `TextNormalizer` pipeline that composes them

pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::{TextNormalizer, TextTransform};
pub use stemmer::{PorterStemmer, Stemmer};
pub use stopwords::{is_punctuation, StopwordSet, ENGLISH_STOPWORDS, PUNCTUATION};
pub use tokenizer::WordTokenizer;
