//! Term-frequency model: data types, building, persistence and training input.

pub mod builder;
pub mod labeled;
pub mod persist;
pub mod types;

pub use builder::{
    DEFAULT_FILTER_THRESHOLD, build_model, generate_frequencies, generate_frequencies_parallel,
};
pub use labeled::{LabeledCsvReader, LabeledRecords, load_labeled_csv};
pub use persist::{load_model, model_exists, save_model};
pub use types::{
    CategoryStats, DocumentFrequencyTable, LabeledDocument, TermFrequencyTable, TfIdfModel,
};
