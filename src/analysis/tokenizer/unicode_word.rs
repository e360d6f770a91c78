//! Tokenizer following Unicode word boundaries (UAX #29).
//!
//! Punctuation runs come out as tokens of their own and whitespace is
//! skipped. Apostrophes inside a word stay attached, so `"don't"` is a
//! single token.
//!
//! ```
//! use tfcat::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
//!
//! let texts: Vec<String> = UnicodeWordTokenizer
//!     .tokenize("Crash on startup, again")
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//! assert_eq!(texts, ["Crash", "on", "startup", ",", "again"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

fn classify_segment(segment: &str) -> TokenType {
    if segment.chars().all(char::is_numeric) {
        TokenType::Num
    } else if segment.chars().any(char::is_alphanumeric) {
        TokenType::Alphanum
    } else {
        TokenType::Punctuation
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        for (start, segment) in text.split_word_bound_indices() {
            if segment.trim().is_empty() {
                continue;
            }
            let token = Token::with_offsets(segment, tokens.len(), start, start + segment.len())
                .with_token_type(classify_segment(segment));
            tokens.push(token);
        }
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        UnicodeWordTokenizer::new().tokenize(text).unwrap().collect()
    }

    #[test]
    fn test_punctuation_is_kept_separately() {
        let tokens = tokens("App crashed! Why?");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, ["App", "crashed", "!", "Why", "?"]);
        assert_eq!(tokens[2].token_type, TokenType::Punctuation);
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn test_byte_offsets_skip_whitespace() {
        let tokens = tokens("add  dark\tmode");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "dark");
        assert_eq!(tokens[1].position, 1);
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (5, 9));
        assert_eq!(tokens[2].start_offset, 10);
    }

    #[test]
    fn test_token_types() {
        let tokens = tokens("export v2 in 2024");

        assert_eq!(tokens[1].token_type, TokenType::Alphanum);
        assert_eq!(tokens[3].token_type, TokenType::Num);
    }

    #[test]
    fn test_contraction_stays_whole() {
        let tokens = tokens("it doesn't start");
        assert_eq!(tokens[1].text, "doesn't");
    }

    #[test]
    fn test_blank_input() {
        assert!(tokens("").is_empty());
        assert!(tokens(" \n\t ").is_empty());
    }
}
