//! Tokens passed between the tokenizer and the term filters.
//!
//! Positions count tokens left by the tokenizer, so a segment inherits the
//! position and byte span of the word it was split from.
//!
//! ```
//! use tfcat::analysis::token::{Token, TokenType};
//!
//! let word = Token::with_offsets("darkmode", 3, 12, 20).with_token_type(TokenType::Alphanum);
//! let piece = word.with_text("dark").with_token_type(TokenType::Segment);
//! assert_eq!((piece.position, piece.start_offset), (3, 12));
//! ```

/// One unit of a message on its way to becoming a term.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    /// Index among the tokens produced for the message.
    pub position: usize,
    /// Byte span in the original message.
    pub start_offset: usize,
    pub end_offset: usize,
    pub token_type: TokenType,
}

/// Coarse content class, assigned by the tokenizer and refined by filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    Alphanum,
    Num,
    Punctuation,
    /// Dictionary piece of a longer run-together word.
    Segment,
    Other,
}

impl Token {
    /// A token with no span, mostly useful when feeding filters directly.
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    pub fn with_offsets(
        text: impl Into<String>,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            token_type: TokenType::Other,
        }
    }

    pub fn with_token_type(self, token_type: TokenType) -> Self {
        Token { token_type, ..self }
    }

    /// Copy of this token carrying different text (a stem, a lowercased form, a segment).
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            position: self.position,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            token_type: self.token_type,
        }
    }

    pub fn has_alphanumeric(&self) -> bool {
        self.text.chars().any(char::is_alphanumeric)
    }
}

/// Boxed token iterator threaded through the analysis stages.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
