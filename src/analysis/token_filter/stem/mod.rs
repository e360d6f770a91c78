//! Reduction of inflected words to a shared stem.
//!
//! Stemming is what lets a model trained on "crashes" match "crashed". Only
//! [`PorterStemmer`] ships with the crate; other algorithms plug in through
//! [`Stemmer`] and [`TextContextBuilder::stemmer`](crate::analysis::TextContextBuilder::stemmer).

use std::fmt;
use std::sync::Arc;

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod porter;

pub use porter::PorterStemmer;

pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Rewrites each token's text with the configured stemmer.
#[derive(Clone)]
pub struct StemFilter {
    stemmer: Arc<dyn Stemmer>,
}

impl StemFilter {
    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }

    pub fn stemmer(&self) -> &dyn Stemmer {
        self.stemmer.as_ref()
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::with_stemmer(Arc::new(PorterStemmer::new()))
    }
}

impl fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StemFilter").field(&self.stemmer.name()).finish()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stemmer = Arc::clone(&self.stemmer);
        Ok(Box::new(tokens.map(move |token| {
            let stem = stemmer.stem(&token.text);
            token.with_text(stem)
        })))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    /// Strips a trailing "s" and nothing else.
    struct PluralStemmer;

    impl Stemmer for PluralStemmer {
        fn stem(&self, word: &str) -> String {
            word.strip_suffix('s').unwrap_or(word).to_string()
        }

        fn name(&self) -> &'static str {
            "plural"
        }
    }

    fn stems(filter: &StemFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> =
            words.iter().enumerate().map(|(i, word)| Token::new(*word, i)).collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_porter_by_default() {
        let filter = StemFilter::default();

        assert_eq!(filter.stemmer().name(), "porter");
        assert_eq!(
            stems(&filter, &["crashes", "crashed", "saving", "proxy", "theme"]),
            ["crash", "crash", "save", "proxi", "theme"]
        );
    }

    #[test]
    fn test_pluggable_stemmer() {
        let filter = StemFilter::with_stemmer(Arc::new(PluralStemmer));

        assert_eq!(stems(&filter, &["hangs", "crashed"]), ["hang", "crashed"]);
        assert_eq!(format!("{filter:?}"), "StemFilter(\"plural\")");
    }
}
