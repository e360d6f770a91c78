//! Removal of function words that carry no category signal.
//!
//! The built-in list is the 179-word English list used by NLTK. It includes
//! the fragments a word tokenizer leaves from contractions (`"don"`, `"t"`).
//! A project can replace it with its own file, see [`StopFilter::load_from_file`].
//!
//! ```
//! use tfcat::analysis::token::Token;
//! use tfcat::analysis::token_filter::{Filter, StopFilter};
//!
//! let tokens = ["it", "crashed", "again"].into_iter().enumerate().map(|(i, w)| Token::new(w, i));
//! let kept: Vec<String> = StopFilter::new()
//!     .filter(Box::new(tokens))
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//! assert_eq!(kept, ["crashed"]);
//! ```

use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use ahash::AHashSet;
use log::debug;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

pub const ENGLISH_STOP_WORDS: &[&str] = &[
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

static ENGLISH: LazyLock<Arc<AHashSet<String>>> = LazyLock::new(|| {
    Arc::new(ENGLISH_STOP_WORDS.iter().map(|word| word.to_string()).collect())
});

/// Drops tokens whose text is in the stopword set. Matching is exact, so
/// the filter runs after lowercasing.
#[derive(Clone, Debug)]
pub struct StopFilter {
    words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Filter with the built-in English list.
    pub fn new() -> Self {
        StopFilter {
            words: Arc::clone(&ENGLISH),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Reads one stopword per line. Blank lines and `#` comments are skipped
    /// and words are lowercased.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filter = Self::from_words(
            fs::read_to_string(path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_lowercase),
        );
        debug!("loaded {} stopwords from {}", filter.len(), path.display());
        Ok(filter)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words = Arc::clone(&self.words);
        Ok(Box::new(tokens.filter(move |token| !words.contains(token.text.as_str()))))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
