//! Text analysis for model building and classification.
//!
//! Messages are turned into terms by a tokenizer followed by a chain of
//! token filters. The resources involved (stopword list, stemmer,
//! segmentation dictionary) are owned by an explicit [`TextContext`].

pub mod context;
pub mod segment;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use context::{AnalysisOptions, TextContext, TextContextBuilder};
pub use segment::{SegmentDictionary, WordSegmenter};
pub use token::{Token, TokenStream, TokenType};
