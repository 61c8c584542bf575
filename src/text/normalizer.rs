use crate::error::Result;
use crate::text::stemmer::{PorterStemmer, Stemmer};
use crate::text::stopwords::{is_punctuation, StopwordSet};
use crate::text::tokenizer::WordTokenizer;

/// A per-record text rewrite applied by the preprocessor
pub trait TextTransform: Send + Sync {
    fn transform(&self, text: &str) -> Result<String>;
}

/// Lowercase, tokenize, keep alphanumeric tokens, drop stopwords and
/// punctuation, stem, and re-join with single spaces.
pub struct TextNormalizer {
    tokenizer: WordTokenizer,
    stopwords: StopwordSet,
    stemmer: Box<dyn Stemmer>,
}

impl TextNormalizer {
    /// English stopwords and the Porter stemmer
    pub fn new() -> Self {
        Self::with_parts(StopwordSet::english().clone(), Box::new(PorterStemmer::new()))
    }

    pub fn with_parts(stopwords: StopwordSet, stemmer: Box<dyn Stemmer>) -> Self {
        Self {
            tokenizer: WordTokenizer::new(),
            stopwords,
            stemmer,
        }
    }

    /// Normalize a single text
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        self.tokenizer
            .tokenize(&lowered)
            .into_iter()
            .filter(|token| is_alphanumeric(token))
            .filter(|token| !self.stopwords.contains(token) && !is_punctuation(token))
            .map(|token| self.stemmer.stem(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTransform for TextNormalizer {
    fn transform(&self, text: &str) -> Result<String> {
        Ok(self.normalize(text))
    }
}

fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}
