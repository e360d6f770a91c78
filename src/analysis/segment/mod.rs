//! Dictionary-driven word segmentation.
//!
//! Splits run-together text such as `"darkmode"` into dictionary words
//! (`["dark", "mode"]`) by picking the most probable sequence of unigrams.
//! Probabilities come from a [`SegmentDictionary`] of word counts; words
//! missing from the dictionary are penalised by their length so that known
//! words are preferred.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::Result;

/// Longest candidate word considered during segmentation.
pub const MAX_WORD_LENGTH: usize = 24;

/// Ranked word list backing [`SegmentDictionary::builtin`], most frequent first.
const BUILTIN_WORDS: &str = include_str!("words.txt");

/// Count assigned to the top-ranked built-in word; lower ranks follow Zipf's law.
const BUILTIN_TOP_COUNT: f64 = 1e9;

/// Unigram counts used to score candidate words.
#[derive(Clone, Debug, Default)]
pub struct SegmentDictionary {
    words: AHashMap<String, u64>,
    total: u64,
}

impl SegmentDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Common English and software vocabulary with Zipf-distributed counts.
    pub fn builtin() -> Self {
        let mut dictionary = Self::new();
        for (rank, word) in BUILTIN_WORDS.split_whitespace().enumerate() {
            let count = (BUILTIN_TOP_COUNT / (rank + 1) as f64).round() as u64;
            dictionary.add_word(word, count.max(1));
        }
        dictionary
    }

    /// Build a dictionary from `(word, count)` pairs.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        for (word, count) in counts {
            dictionary.add_word(word.as_ref(), count);
        }
        dictionary
    }

    /// Add `count` occurrences of `word`. Words are lowercased; empty words
    /// and zero counts are ignored.
    pub fn add_word(&mut self, word: &str, count: u64) {
        let word = word.trim().to_lowercase();
        if word.is_empty() || count == 0 {
            return;
        }
        *self.words.entry(word).or_insert(0) += count;
        self.total += count;
    }

    /// Load `word count` lines (whitespace separated). Lines that do not
    /// parse are skipped.
    pub fn load_from_frequency_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dictionary = Self::new();
        let reader = BufReader::new(File::open(path)?);

        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            if let (Some(word), Some(count)) = (parts.next(), parts.next())
                && let Ok(count) = count.parse::<u64>()
                && word.chars().all(|c| c.is_ascii_alphanumeric())
            {
                dictionary.add_word(word, count);
            }
        }

        Ok(dictionary)
    }

    /// Occurrence count of `word`, zero when unknown.
    pub fn count(&self, word: &str) -> u64 {
        self.words.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Unigram Viterbi segmenter.
///
/// # Examples
///
/// ```
/// use tfcat::analysis::segment::{SegmentDictionary, WordSegmenter};
///
/// let dictionary = SegmentDictionary::from_counts([("dark", 50u64), ("mode", 40), ("darkroom", 1)]);
/// let segmenter = WordSegmenter::with_dictionary(dictionary);
/// assert_eq!(segmenter.segment("darkmode"), vec!["dark", "mode"]);
/// ```
#[derive(Clone, Debug)]
pub struct WordSegmenter {
    dictionary: SegmentDictionary,
    max_word_length: usize,
}

impl WordSegmenter {
    /// Create a segmenter over the built-in dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(SegmentDictionary::builtin())
    }

    /// Create a segmenter over a custom dictionary.
    pub fn with_dictionary(dictionary: SegmentDictionary) -> Self {
        WordSegmenter {
            dictionary,
            max_word_length: MAX_WORD_LENGTH,
        }
    }

    pub fn dictionary(&self) -> &SegmentDictionary {
        &self.dictionary
    }

    /// Split `text` into its most probable word sequence.
    ///
    /// The text is lowercased and stripped of everything outside `[a-z0-9]`
    /// first. Returns an empty vector when nothing is left. With an empty
    /// dictionary the cleaned text comes back as a single word.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let cleaned = clean(text);
        if cleaned.is_empty() {
            return Vec::new();
        }
        if self.dictionary.is_empty() {
            return vec![cleaned];
        }

        let n = cleaned.len();
        // best[i]: log10 probability of the best split of cleaned[..i]
        let mut best = vec![f64::NEG_INFINITY; n + 1];
        let mut split_at = vec![0usize; n + 1];
        best[0] = 0.0;

        for end in 1..=n {
            let start_min = end.saturating_sub(self.max_word_length);
            for start in start_min..end {
                let candidate = best[start] + self.log_probability(&cleaned[start..end]);
                if candidate > best[end] {
                    best[end] = candidate;
                    split_at[end] = start;
                }
            }
        }

        let mut words = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = split_at[end];
            words.push(cleaned[start..end].to_string());
            end = start;
        }
        words.reverse();
        words
    }

    fn log_probability(&self, word: &str) -> f64 {
        let total = self.dictionary.total() as f64;
        match self.dictionary.count(word) {
            0 => 1.0 - total.log10() - word.len() as f64,
            count => (count as f64).log10() - total.log10(),
        }
    }
}

impl Default for WordSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn clean(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn small_segmenter() -> WordSegmenter {
        WordSegmenter::with_dictionary(SegmentDictionary::from_counts([
            ("dark", 500u64),
            ("mode", 400),
            ("crash", 300),
            ("on", 5000),
            ("startup", 200),
            ("start", 600),
            ("up", 3000),
        ]))
    }

    #[test]
    fn test_segment_concatenated_words() {
        let segmenter = small_segmenter();
        assert_eq!(segmenter.segment("darkmode"), vec!["dark", "mode"]);
        assert_eq!(segmenter.segment("crashonstartup"), vec!["crash", "on", "startup"]);
    }

    #[test]
    fn test_known_word_stays_whole() {
        let segmenter = small_segmenter();
        assert_eq!(segmenter.segment("startup"), vec!["startup"]);
        assert_eq!(segmenter.segment("dark"), vec!["dark"]);
    }

    #[test]
    fn test_clean_input() {
        let segmenter = small_segmenter();
        assert_eq!(segmenter.segment("Dark-Mode!"), vec!["dark", "mode"]);
        assert!(segmenter.segment("!!!").is_empty());
        assert!(segmenter.segment("").is_empty());
    }

    #[test]
    fn test_empty_dictionary_returns_cleaned_text() {
        let segmenter = WordSegmenter::with_dictionary(SegmentDictionary::new());
        assert_eq!(segmenter.segment("DarkMode"), vec!["darkmode"]);
    }

    #[test]
    fn test_builtin_dictionary() {
        let dictionary = SegmentDictionary::builtin();
        assert!(dictionary.len() > 5000);
        assert!(dictionary.count("the") > dictionary.count("crash"));
        assert!(dictionary.contains("startup"));

        let segmenter = WordSegmenter::new();
        assert_eq!(segmenter.segment("darkmode"), vec!["dark", "mode"]);
        assert_eq!(segmenter.segment("startup"), vec!["startup"]);
    }

    #[test]
    fn test_add_word_accumulates() {
        let mut dictionary = SegmentDictionary::new();
        dictionary.add_word("Crash", 2);
        dictionary.add_word("crash", 3);
        dictionary.add_word("", 10);
        dictionary.add_word("ignored", 0);

        assert_eq!(dictionary.count("crash"), 5);
        assert_eq!(dictionary.total(), 5);
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn test_load_from_frequency_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "dark 120")?;
        writeln!(file, "mode 80")?;
        writeln!(file, "broken-line")?;
        writeln!(file, "not a-number")?;
        file.flush()?;

        let dictionary = SegmentDictionary::load_from_frequency_file(file.path())?;
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.count("dark"), 120);
        assert_eq!(dictionary.total(), 200);
        Ok(())
    }
}
