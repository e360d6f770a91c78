//! Splitting raw message text into tokens.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// First stage of analysis. Implementations are shared across threads
/// through [`TextContext`](crate::analysis::TextContext).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

pub mod unicode_word;

pub use unicode_word::UnicodeWordTokenizer;
