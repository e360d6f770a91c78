//! Filter dropping tokens that carry no alphanumeric character.
//!
//! Tokenizers keep punctuation and symbol runs (`"..."`, `"->"`, `"?"`) as
//! tokens of their own; this filter removes them before they can be counted
//! as terms. Mixed tokens such as `"c++"` or `"v2.0"` survive.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Drops tokens without at least one alphanumeric character.
#[derive(Clone, Debug, Default)]
pub struct AlphanumericFilter;

impl AlphanumericFilter {
    /// Create a new alphanumeric filter.
    pub fn new() -> Self {
        AlphanumericFilter
    }
}

impl Filter for AlphanumericFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| token.has_alphanumeric())))
    }

    fn name(&self) -> &'static str {
        "alphanumeric"
    }
}
