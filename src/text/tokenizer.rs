//! Penn-Treebank-style word tokenization.
//!
//! Punctuation (including typographic quotes, runs of dots and asterisks)
//! is split away from words, English clitics become their own
//! tokens (`"don't"` → `"do"`, `"n't"`), and characters that join word
//! pieces (hyphens, slashes, inner periods) are left in place.

use once_cell::sync::Lazy;
use regex::Regex;

/// An ordered rewrite rule: every match of `pattern` is replaced by `replacement`
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("tokenizer rule must be a valid regex"),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

static STARTING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(r"[«“‘„]", " $0 "),
        Rule::new(r#"^""#, "``"),
        Rule::new(r"(``)", " $1 "),
        Rule::new(r#"([ (\[{<])("|'')"#, "$1 `` "),
    ]
});

static PUNCTUATION: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(r"([:,])([^\d])", " $1 $2"),
        Rule::new(r"([:,])$", " $1 "),
        Rule::new(r"\.{2,}", " $0 "),
        Rule::new(r"[;@#$%&*]", " $0 "),
        // A period that closes a word, optionally followed by closing brackets/quotes
        Rule::new(r#"([^.])(\.)([\]\)}>"'»”’]*)(\s|$)"#, "$1 $2 $3$4"),
        Rule::new(r"[?!]", " $0 "),
        Rule::new(r"([^'])' ", "$1 ' "),
    ]
});

static BRACKETS: Lazy<Rule> = Lazy::new(|| Rule::new(r"[\]\[\(\)\{\}<>]", " $0 "));

static DOUBLE_DASHES: Lazy<Rule> = Lazy::new(|| Rule::new(r"--", " -- "));

static ENDING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(r"[»”’]", " $0 "),
        Rule::new(r#"""#, " '' "),
        Rule::new(r"(\S)('')", "$1 $2 "),
        Rule::new(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "$1 $2 "),
        Rule::new(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "$1 $2 "),
    ]
});

static CONTRACTIONS: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(r"(?i)\b(can)(not)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(d)('ye)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(gim)(me)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(gon)(na)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(got)(ta)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(lem)(me)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(mor)('n)\b", " $1 $2 "),
        Rule::new(r"(?i)\b(wan)(na)\s", " $1 $2 "),
        Rule::new(r"(?i) ('t)(is)\b", " $1 $2 "),
        Rule::new(r"(?i) ('t)(was)\b", " $1 $2 "),
    ]
});

/// Clitic suffixes that stay attached to a leading apostrophe
const CLITIC_PREFIXES: [&str; 8] = ["re", "ve", "ll", "m", "t", "s", "d", "n"];

/// Word tokenizer following Penn Treebank conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Split text into word and punctuation tokens, in order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut text = text.to_string();

        for rule in STARTING_QUOTES.iter() {
            text = rule.apply(&text);
        }
        for rule in PUNCTUATION.iter() {
            text = rule.apply(&text);
        }
        text = BRACKETS.apply(&text);
        text = DOUBLE_DASHES.apply(&text);

        // Padding lets the clitic rules anchor on a trailing space
        text = format!(" {text} ");
        for rule in ENDING_QUOTES.iter() {
            text = rule.apply(&text);
        }
        for rule in CONTRACTIONS.iter() {
            text = rule.apply(&text);
        }

        text.split_whitespace()
            .flat_map(split_opening_quote)
            .collect()
    }
}

/// Separate an opening single quote from the word it precedes
/// (`'hello` → `'`, `hello`) unless it starts a clitic such as `'s`.
fn split_opening_quote(token: &str) -> Vec<String> {
    match token.strip_prefix('\'') {
        Some(rest)
            if rest.chars().next().is_some_and(char::is_alphanumeric)
                && !CLITIC_PREFIXES
                    .iter()
                    .any(|clitic| rest.to_lowercase().starts_with(clitic)) =>
        {
            vec!["'".to_string(), rest.to_string()]
        }
        _ => vec![token.to_string()],
    }
}
