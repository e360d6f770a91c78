//! Case folding so that `"Crash"` and `"crash"` count as the same term.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

fn fold(text: &mut String) {
    if text.is_ascii() {
        text.make_ascii_lowercase();
    } else {
        *text = text.to_lowercase();
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            fold(&mut token.text);
            token
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_ascii_and_unicode() {
        let tokens = vec![
            Token::new("PDF", 0),
            Token::new("DarkMode", 1),
            Token::new("Ünïcode", 2),
            Token::new("v2", 3),
        ];

        let texts: Vec<String> = LowercaseFilter::new()
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|token| token.text)
            .collect();

        assert_eq!(texts, ["pdf", "darkmode", "ünïcode", "v2"]);
    }
}
