//! Porter stemming algorithm implementation.
//!
//! Reduces English words to their stems with the five rule groups of the
//! original Porter algorithm:
//! 1. Plurals and -ed/-ing suffixes, then terminal y → i
//! 2. -ational → -ate, -tional → -tion, etc.
//! 3. -icate → -ic, -ative → "", etc.
//! 4. Remove -al, -ance, -ence, etc.
//! 5. Remove final -e and -ll
//!
//! Only lowercase ASCII words are rewritten; anything else is returned
//! lowercased but otherwise untouched.
//!
//! # Examples
//!
//! ```
//! use tfcat::analysis::token_filter::stem::Stemmer;
//! use tfcat::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("crashed"), "crash");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("traditional"), "tradit");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2_SUFFIXES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3_SUFFIXES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

// Longer suffixes sharing an ending come first ("ement" before "ment").
const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemming algorithm implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// Check if the byte at `pos` acts as a consonant.
    fn is_consonant(word: &[u8], pos: usize) -> bool {
        match word[pos] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => pos == 0 || !Self::is_consonant(word, pos - 1),
            _ => true,
        }
    }

    /// Calculate the measure of a stem (number of VC sequences).
    fn measure(stem: &[u8]) -> usize {
        let n = stem.len();
        let mut i = 0;

        while i < n && Self::is_consonant(stem, i) {
            i += 1;
        }

        let mut m = 0;
        loop {
            while i < n && !Self::is_consonant(stem, i) {
                i += 1;
            }
            if i >= n {
                return m;
            }

            m += 1;

            while i < n && Self::is_consonant(stem, i) {
                i += 1;
            }
        }
    }

    fn contains_vowel(stem: &[u8]) -> bool {
        (0..stem.len()).any(|i| !Self::is_consonant(stem, i))
    }

    fn ends_with_double_consonant(word: &[u8]) -> bool {
        let n = word.len();
        n >= 2 && word[n - 1] == word[n - 2] && Self::is_consonant(word, n - 1)
    }

    /// Consonant-vowel-consonant ending where the last consonant is not w, x or y.
    fn ends_cvc(word: &[u8]) -> bool {
        let n = word.len();
        n >= 3
            && Self::is_consonant(word, n - 1)
            && !Self::is_consonant(word, n - 2)
            && Self::is_consonant(word, n - 3)
            && !matches!(word[n - 1], b'w' | b'x' | b'y')
    }

    /// Replace the first matching suffix from `rules` when its stem has measure > 0.
    fn apply_rules(word: &mut Vec<u8>, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if word.ends_with(suffix.as_bytes()) {
                let stem_len = word.len() - suffix.len();
                if Self::measure(&word[..stem_len]) > 0 {
                    word.truncate(stem_len);
                    word.extend_from_slice(replacement.as_bytes());
                }
                return;
            }
        }
    }

    fn step1a(word: &mut Vec<u8>) {
        if word.ends_with(b"sses") || word.ends_with(b"ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with(b"ss") {
            // unchanged
        } else if word.ends_with(b"s") {
            word.pop();
        }
    }

    fn step1b(word: &mut Vec<u8>) {
        if word.ends_with(b"eed") {
            if Self::measure(&word[..word.len() - 3]) > 0 {
                word.pop();
            }
            return;
        }

        let removed = if word.ends_with(b"ed") && Self::contains_vowel(&word[..word.len() - 2]) {
            word.truncate(word.len() - 2);
            true
        } else if word.ends_with(b"ing") && Self::contains_vowel(&word[..word.len() - 3]) {
            word.truncate(word.len() - 3);
            true
        } else {
            false
        };

        if !removed {
            return;
        }

        if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
            word.push(b'e');
        } else if Self::ends_with_double_consonant(word)
            && !matches!(word.last(), Some(&(b'l' | b's' | b'z')))
        {
            word.pop();
        } else if Self::measure(word) == 1 && Self::ends_cvc(word) {
            word.push(b'e');
        }
    }

    fn step1c(word: &mut [u8]) {
        let n = word.len();
        if word.ends_with(b"y") && Self::contains_vowel(&word[..n - 1]) {
            word[n - 1] = b'i';
        }
    }

    fn step4(word: &mut Vec<u8>) {
        for suffix in STEP4_SUFFIXES {
            if word.ends_with(suffix.as_bytes()) {
                let stem_len = word.len() - suffix.len();
                let stem = &word[..stem_len];
                let allowed = *suffix != "ion" || stem.ends_with(b"s") || stem.ends_with(b"t");
                if allowed && Self::measure(stem) > 1 {
                    word.truncate(stem_len);
                }
                return;
            }
        }
    }

    fn step5(word: &mut Vec<u8>) {
        if word.ends_with(b"e") {
            let stem = &word[..word.len() - 1];
            let m = Self::measure(stem);
            if m > 1 || (m == 1 && !Self::ends_cvc(stem)) {
                word.pop();
            }
        }

        if word.ends_with(b"ll") && Self::measure(word) > 1 {
            word.pop();
        }
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word;
        }

        let mut bytes = word.into_bytes();
        Self::step1a(&mut bytes);
        Self::step1b(&mut bytes);
        Self::step1c(&mut bytes);
        Self::apply_rules(&mut bytes, STEP2_SUFFIXES);
        Self::apply_rules(&mut bytes, STEP3_SUFFIXES);
        Self::step4(&mut bytes);
        Self::step5(&mut bytes);

        // Only ASCII bytes were ever written.
        String::from_utf8(bytes).unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porter_stemmer() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.stem("died"), "di");
        assert_eq!(stemmer.stem("agreed"), "agre");
        assert_eq!(stemmer.stem("disabled"), "disabl");
        assert_eq!(stemmer.stem("measuring"), "measur");
        assert_eq!(stemmer.stem("itemization"), "item");
        assert_eq!(stemmer.stem("sensational"), "sensat");
        assert_eq!(stemmer.stem("traditional"), "tradit");
    }

    #[test]
    fn test_porter_classic_vocabulary() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("caresses"), "caress");
        assert_eq!(stemmer.stem("ponies"), "poni");
        assert_eq!(stemmer.stem("happy"), "happi");
        assert_eq!(stemmer.stem("relational"), "relat");
        assert_eq!(stemmer.stem("hopeful"), "hope");
        assert_eq!(stemmer.stem("goodness"), "good");
        assert_eq!(stemmer.stem("adjustment"), "adjust");
        assert_eq!(stemmer.stem("generalizations"), "gener");
    }

    #[test]
    fn test_message_vocabulary() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("crashed"), "crash");
        assert_eq!(stemmer.stem("crashes"), "crash");
        assert_eq!(stemmer.stem("crashing"), "crash");
        assert_eq!(stemmer.stem("installed"), "instal");
        assert_eq!(stemmer.stem("mode"), "mode");
        assert_eq!(stemmer.stem("add"), "add");
        assert_eq!(stemmer.stem("startup"), "startup");
    }

    #[test]
    fn test_short_and_non_ascii_words() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("is"), "is");
        assert_eq!(stemmer.stem("UI"), "ui");
        assert_eq!(stemmer.stem("café"), "café");
        assert_eq!(stemmer.stem("v2.0"), "v2.0");
    }

    #[test]
    fn test_porter_measure() {
        assert_eq!(PorterStemmer::measure(b"tree"), 0);
        assert_eq!(PorterStemmer::measure(b"trees"), 1);
        assert_eq!(PorterStemmer::measure(b"trouble"), 1);
        assert_eq!(PorterStemmer::measure(b"troubles"), 2);
    }

    #[test]
    fn test_porter_consonant_detection() {
        let word = b"trouble";

        assert!(PorterStemmer::is_consonant(word, 0)); // t
        assert!(PorterStemmer::is_consonant(word, 1)); // r
        assert!(!PorterStemmer::is_consonant(word, 2)); // o
        assert!(!PorterStemmer::is_consonant(word, 3)); // u
        assert!(PorterStemmer::is_consonant(word, 4)); // b
        assert!(PorterStemmer::is_consonant(b"toy", 2)); // y after vowel
        assert!(!PorterStemmer::is_consonant(b"syzygy", 1)); // y after consonant
    }

    #[test]
    fn test_stemmer_name() {
        assert_eq!(PorterStemmer::new().name(), "porter");
    }
}
