//! # tfcat
//!
//! A term-frequency message categorizer for short free text.
//!
//! ## Features
//!
//! - Per-category term frequency model with frequency-based pruning
//! - Porter stemming, stopword removal and dictionary word segmentation
//! - Pluggable word-similarity expansion (similarity tables, word vectors)
//! - JSON model persistence and CSV training data
//! - Background loading and a session with swappable models and oracles
//! - Parameter sweeps for evaluation
//!
//! ```
//! use tfcat::prelude::*;
//!
//! let ctx = TextContext::builder().without_segmentation().build();
//! let documents = vec![
//!     LabeledDocument::new("Bug", "crash on startup"),
//!     LabeledDocument::new("Bug", "crash again"),
//!     LabeledDocument::new("Feature", "add dark mode"),
//! ];
//! let model = build_model(&ctx, documents.into_iter().map(Ok), 0.03).unwrap();
//!
//! let result = classify(&ctx, &model, "the app crashed", None, &ClassifyOptions::default()).unwrap();
//! assert_eq!(result.category, "bug");
//! ```

pub mod analysis;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod loader;
pub mod model;
pub mod session;
pub mod similarity;

pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, TextContext};
    pub use crate::classify::{
        Classification, ClassifyOptions, FnOracle, SimilarityOracle, UNKNOWN_CATEGORY, classify,
    };
    pub use crate::config::TfcatConfig;
    pub use crate::error::{Result, TfcatError};
    pub use crate::model::{LabeledDocument, TfIdfModel, build_model, load_model, save_model};
    pub use crate::session::Session;
    pub use crate::similarity::{CachedOracle, OracleSpec, SimilarityTable, WordVectors};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
