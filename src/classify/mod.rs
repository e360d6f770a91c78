//! Document classification with optional similarity expansion.

pub mod classifier;
pub mod oracle;

pub use classifier::{Classification, ClassifyOptions, UNKNOWN_CATEGORY, classify};
pub use oracle::{FnOracle, SimilarTerms, SimilarityOracle};
