//! Stages that rewrite or drop tokens after tokenization.
//!
//! [`TextContext`](crate::analysis::TextContext) chains them as lowercase,
//! segment, stop, alphanumeric, stem. Segment and stem are skipped when the
//! matching [`AnalysisOptions`](crate::analysis::AnalysisOptions) flag is off.

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub trait Filter: Send + Sync {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

pub mod alphanumeric;
pub mod lowercase;
pub mod segment;
pub mod stem;
pub mod stop;

pub use alphanumeric::AlphanumericFilter;
pub use lowercase::LowercaseFilter;
pub use segment::SegmentFilter;
pub use stem::{PorterStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
