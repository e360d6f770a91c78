//! Filter appending dictionary sub-words of concatenated tokens.
//!
//! Each token is passed through unchanged. When the segmenter splits it into
//! more than one word, the pieces follow the original token in the stream as
//! [`TokenType::Segment`] tokens sharing its position and offsets.

use std::sync::Arc;

use crate::analysis::segment::WordSegmenter;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Keeps every token and appends its sub-words when segmentation splits it.
#[derive(Clone, Debug)]
pub struct SegmentFilter {
    segmenter: Arc<WordSegmenter>,
}

impl SegmentFilter {
    /// Create a segment filter over the built-in dictionary.
    pub fn new() -> Self {
        Self::with_segmenter(Arc::new(WordSegmenter::new()))
    }

    /// Create a segment filter sharing an existing segmenter.
    pub fn with_segmenter(segmenter: Arc<WordSegmenter>) -> Self {
        SegmentFilter { segmenter }
    }

    pub fn segmenter(&self) -> &Arc<WordSegmenter> {
        &self.segmenter
    }
}

impl Default for SegmentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for SegmentFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let segmenter = Arc::clone(&self.segmenter);
        Ok(Box::new(tokens.flat_map(move |token| {
            let pieces = segmenter.segment(&token.text);
            let mut expanded: Vec<Token> = Vec::with_capacity(pieces.len() + 1);
            if pieces.len() > 1 {
                let segments: Vec<Token> = pieces
                    .into_iter()
                    .map(|piece| token.with_text(piece).with_token_type(TokenType::Segment))
                    .collect();
                expanded.push(token);
                expanded.extend(segments);
            } else {
                expanded.push(token);
            }
            expanded
        })))
    }

    fn name(&self) -> &'static str {
        "segment"
    }
}
