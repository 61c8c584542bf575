//! Porter suffix-stripping stemmer.
//!
//! The 1980 algorithm with the extensions of NLTK's default mode: a pool of
//! irregular forms, words of one or two letters left alone, four-letter
//! `-ies`/`-ied` words kept as `-ie`, terminal `y` → `i` only after a
//! consonant, and the extra step-2 rules `-fulli`, `-lessli` and `-logi`.

/// Reduces a word to its stem
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Porter (1980) stemmer
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if let Some(form) = irregular_form(&word) {
            return form.to_string();
        }

        let chars: Word = word.chars().collect();
        if chars.len() <= 2 {
            return word;
        }

        let steps: [fn(Word) -> Word; 8] =
            [step1a, step1b, step1c, step2, step3, step4, step5a, step5b];
        steps
            .iter()
            .fold(chars, |w, step| step(w))
            .into_iter()
            .collect()
    }
}

fn irregular_form(word: &str) -> Option<&'static str> {
    match word {
        "sky" | "skies" => Some("sky"),
        "dying" => Some("die"),
        "lying" => Some("lie"),
        "tying" => Some("tie"),
        "news" => Some("news"),
        "inning" | "innings" => Some("inning"),
        "outing" | "outings" => Some("outing"),
        "canning" | "cannings" => Some("canning"),
        "howe" => Some("howe"),
        "proceed" => Some("proceed"),
        "exceed" => Some("exceed"),
        "succeed" => Some("succeed"),
        _ => None,
    }
}

type Word = Vec<char>;

/// A suffix, its replacement, and the condition the remaining stem must meet
type Rule = (&'static str, &'static str, fn(&[char]) -> bool);

/// `y` is a consonant unless it follows one
fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// The `m` of `[C](VC){m}[V]`
fn measure(stem: &[char]) -> usize {
    (1..stem.len())
        .filter(|&i| !is_consonant(stem, i - 1) && is_consonant(stem, i))
        .count()
}

fn has_positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn always(_: &[char]) -> bool {
    true
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_with_consonant(stem: &[char]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant-vowel-consonant ending whose last letter is not w, x or y.
/// A two-letter vowel-consonant word also counts.
fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    (n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !is_consonant(word, 0) && is_consonant(word, 1))
}

/// The stem left after removing `suffix`, if the word ends with it
fn strip<'a>(word: &'a [char], suffix: &str) -> Option<&'a [char]> {
    let n = suffix.chars().count();
    if n > word.len() {
        return None;
    }
    let (stem, tail) = word.split_at(word.len() - n);
    tail.iter().copied().eq(suffix.chars()).then_some(stem)
}

fn replaced(stem: &[char], replacement: &str) -> Word {
    stem.iter().copied().chain(replacement.chars()).collect()
}

/// Apply the first rule whose suffix matches. If its condition fails the
/// word is returned unchanged and later rules are not tried.
fn apply_rules(word: Word, rules: &[Rule]) -> Word {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = strip(&word, suffix) {
            if condition(stem) {
                return replaced(stem, replacement);
            }
            break;
        }
    }
    word
}

const STEP2_RULES: &[Rule] = &[
    ("ational", "ate", has_positive_measure),
    ("tional", "tion", has_positive_measure),
    ("enci", "ence", has_positive_measure),
    ("anci", "ance", has_positive_measure),
    ("izer", "ize", has_positive_measure),
    ("bli", "ble", has_positive_measure),
    ("alli", "al", has_positive_measure),
    ("entli", "ent", has_positive_measure),
    ("eli", "e", has_positive_measure),
    ("ousli", "ous", has_positive_measure),
    ("ization", "ize", has_positive_measure),
    ("ation", "ate", has_positive_measure),
    ("ator", "ate", has_positive_measure),
    ("alism", "al", has_positive_measure),
    ("iveness", "ive", has_positive_measure),
    ("fulness", "ful", has_positive_measure),
    ("ousness", "ous", has_positive_measure),
    ("aliti", "al", has_positive_measure),
    ("iviti", "ive", has_positive_measure),
    ("biliti", "ble", has_positive_measure),
    ("fulli", "ful", has_positive_measure),
    ("lessli", "less", has_positive_measure),
];

const STEP3_RULES: &[Rule] = &[
    ("icate", "ic", has_positive_measure),
    ("ative", "", has_positive_measure),
    ("alize", "al", has_positive_measure),
    ("iciti", "ic", has_positive_measure),
    ("ical", "ic", has_positive_measure),
    ("ful", "", has_positive_measure),
    ("ness", "", has_positive_measure),
];

const STEP4_RULES: &[Rule] = &[
    ("al", "", measure_above_one),
    ("ance", "", measure_above_one),
    ("ence", "", measure_above_one),
    ("er", "", measure_above_one),
    ("ic", "", measure_above_one),
    ("able", "", measure_above_one),
    ("ible", "", measure_above_one),
    ("ant", "", measure_above_one),
    ("ement", "", measure_above_one),
    ("ment", "", measure_above_one),
    ("ent", "", measure_above_one),
    ("ion", "", ion_stem),
    ("ou", "", measure_above_one),
    ("ism", "", measure_above_one),
    ("ate", "", measure_above_one),
    ("iti", "", measure_above_one),
    ("ous", "", measure_above_one),
    ("ive", "", measure_above_one),
    ("ize", "", measure_above_one),
];

fn ion_stem(stem: &[char]) -> bool {
    measure_above_one(stem) && matches!(stem.last(), Some('s' | 't'))
}

/// Plurals
fn step1a(word: Word) -> Word {
    if word.len() == 4 && strip(&word, "ies").is_some() {
        return replaced(&word[..1], "ie");
    }
    apply_rules(
        word,
        &[
            ("sses", "ss", always),
            ("ies", "i", always),
            ("ss", "ss", always),
            ("s", "", always),
        ],
    )
}

/// -eed, -ed and -ing
fn step1b(word: Word) -> Word {
    if let Some(stem) = strip(&word, "ied") {
        return replaced(stem, if word.len() == 4 { "ie" } else { "i" });
    }

    if let Some(stem) = strip(&word, "eed") {
        return if has_positive_measure(stem) {
            replaced(stem, "ee")
        } else {
            word
        };
    }

    let stem_len = ["ed", "ing"].iter().find_map(|suffix| {
        strip(&word, suffix)
            .filter(|stem| contains_vowel(stem))
            .map(<[char]>::len)
    });
    let Some(stem_len) = stem_len else {
        return word;
    };
    let mut stem = word;
    stem.truncate(stem_len);

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = strip(&stem, suffix) {
            return replaced(base, replacement);
        }
    }

    if ends_double_consonant(&stem) {
        return if matches!(stem[stem.len() - 1], 'l' | 's' | 'z') {
            stem
        } else {
            stem[..stem.len() - 1].to_vec()
        };
    }

    if measure(&stem) == 1 && ends_cvc(&stem) {
        return replaced(&stem, "e");
    }
    stem
}

/// Terminal y after a consonant
fn step1c(word: Word) -> Word {
    apply_rules(word, &[("y", "i", ends_with_consonant)])
}

/// Double suffixes to single ones
fn step2(word: Word) -> Word {
    if let Some(stem) = strip(&word, "alli") {
        if has_positive_measure(stem) {
            return step2(replaced(stem, "al"));
        }
    }

    if strip(&word, "logi").is_some() {
        // measured with the `l` kept on the stem
        let stem = &word[..word.len() - 3];
        return if has_positive_measure(stem) {
            replaced(stem, "og")
        } else {
            word
        };
    }

    apply_rules(word, STEP2_RULES)
}

/// -ic-, -ful, -ness etc.
fn step3(word: Word) -> Word {
    apply_rules(word, STEP3_RULES)
}

/// -ant, -ence etc. when m > 1
fn step4(word: Word) -> Word {
    apply_rules(word, STEP4_RULES)
}

/// Final -e
fn step5a(word: Word) -> Word {
    if let Some(stem) = strip(&word, "e") {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    word
}

/// -ll to -l
fn step5b(mut word: Word) -> Word {
    if strip(&word, "ll").is_some() && measure(&word[..word.len() - 1]) > 1 {
        word.pop();
    }
    word
}
