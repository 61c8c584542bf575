//! English stopword list and ASCII punctuation set.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Standard English stopword list (179 entries)
pub const ENGLISH_STOPWORDS: [&str; 179] = [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// The 32 ASCII punctuation characters
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

static ENGLISH: Lazy<StopwordSet> = Lazy::new(|| StopwordSet::new(ENGLISH_STOPWORDS));

/// A set of tokens to drop before stemming
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Shared English stopword set
    pub fn english() -> &'static StopwordSet {
        &ENGLISH
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// True when the token is a single ASCII punctuation character
pub fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATION.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_set_is_complete() {
        let set = StopwordSet::english();
        assert_eq!(set.len(), 179);
        assert!(set.contains("the"));
        assert!(set.contains("in"));
        assert!(set.contains("don't"));
        assert!(!set.contains("rain"));
    }

    #[test]
    fn test_custom_set() {
        let set = StopwordSet::new(["foo", "bar"]);
        assert!(set.contains("foo"));
        assert!(!set.contains("the"));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(PUNCTUATION.len(), 32);
        assert!(is_punctuation("!"));
        assert!(is_punctuation("~"));
        assert!(!is_punctuation("!!"));
        assert!(!is_punctuation("a"));
        assert!(!is_punctuation(""));
    }
}
