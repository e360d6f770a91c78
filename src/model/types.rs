//! Data model for the term-frequency classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfcatError};

/// Per-category statistics gathered during model building.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Raw occurrence count of each term within the category.
    #[serde(rename = "counts")]
    pub term_counts: BTreeMap<String, u64>,

    /// Number of training documents labeled with the category.
    pub num_docs: u64,
}

impl CategoryStats {
    pub fn new(num_docs: u64, term_counts: BTreeMap<String, u64>) -> Self {
        CategoryStats {
            term_counts,
            num_docs,
        }
    }

    /// Within-category frequency `count / num_docs`, if the term is present.
    pub fn frequency(&self, term: &str) -> Option<f64> {
        if self.num_docs == 0 {
            return None;
        }
        self.term_counts
            .get(term)
            .map(|&count| count as f64 / self.num_docs as f64)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.term_counts.contains_key(term)
    }
}

/// Category name to pruned statistics, ordered by category name.
pub type TermFrequencyTable = BTreeMap<String, CategoryStats>;

/// Term to the number of categories containing it before pruning.
pub type DocumentFrequencyTable = BTreeMap<String, u64>;

/// A labeled training record.
///
/// Both fields are optional so that incomplete records can be reported with
/// their position instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDocument {
    #[serde(rename = "Category")]
    pub category: Option<String>,
    pub message: Option<String>,
}

impl LabeledDocument {
    pub fn new<C: Into<String>, M: Into<String>>(category: C, message: M) -> Self {
        LabeledDocument {
            category: Some(category.into()),
            message: Some(message.into()),
        }
    }
}

/// The pair of frequency tables consumed by the classifier.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use tfcat::model::{CategoryStats, TfIdfModel};
///
/// let mut tf = BTreeMap::new();
/// tf.insert(
///     "bug".to_string(),
///     CategoryStats::new(2, BTreeMap::from([("crash".to_string(), 2)])),
/// );
/// let df = BTreeMap::from([("crash".to_string(), 1)]);
///
/// let model = TfIdfModel::new(tf, df).unwrap();
/// assert_eq!(model.num_categories(), 1);
/// assert_eq!(model.tf("crash", "bug"), Some(1.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TfIdfModel {
    term_frequencies: TermFrequencyTable,
    doc_frequencies: DocumentFrequencyTable,
}

impl TfIdfModel {
    /// Create a model, checking that the tables are consistent: every
    /// category has at least one document, every document frequency is at
    /// least one and every counted term has a document frequency.
    pub fn new(
        term_frequencies: TermFrequencyTable,
        doc_frequencies: DocumentFrequencyTable,
    ) -> Result<Self> {
        for (category, stats) in &term_frequencies {
            if stats.num_docs == 0 {
                return Err(TfcatError::malformed(format!(
                    "category '{category}' has num_docs = 0"
                )));
            }
            if let Some(term) = stats
                .term_counts
                .keys()
                .find(|term| !doc_frequencies.contains_key(*term))
            {
                return Err(TfcatError::malformed(format!(
                    "term '{term}' of category '{category}' has no document frequency"
                )));
            }
        }
        if let Some((term, _)) = doc_frequencies.iter().find(|(_, df)| **df == 0) {
            return Err(TfcatError::malformed(format!(
                "document frequency of '{term}' is 0"
            )));
        }

        Ok(TfIdfModel {
            term_frequencies,
            doc_frequencies,
        })
    }

    pub fn term_frequencies(&self) -> &TermFrequencyTable {
        &self.term_frequencies
    }

    pub fn doc_frequencies(&self) -> &DocumentFrequencyTable {
        &self.doc_frequencies
    }

    pub fn into_parts(self) -> (TermFrequencyTable, DocumentFrequencyTable) {
        (self.term_frequencies, self.doc_frequencies)
    }

    pub fn num_categories(&self) -> usize {
        self.term_frequencies.len()
    }

    /// Category names in lexicographic order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.term_frequencies.keys().map(String::as_str)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryStats> {
        self.term_frequencies.get(name)
    }

    /// `count / num_docs` of `term` in `category`.
    pub fn tf(&self, term: &str, category: &str) -> Option<f64> {
        self.term_frequencies.get(category)?.frequency(term)
    }

    /// Smoothed inverse document frequency `ln((1 + N) / (1 + df)) + 1`,
    /// where `N` is the number of categories.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let df = *self.doc_frequencies.get(term)? as f64;
        let n = self.num_categories() as f64;
        Some(((1.0 + n) / (1.0 + df)).ln() + 1.0)
    }
}
