//! Building pruned frequency tables from labeled documents.
//!
//! Messages are normalized with the training pipeline of a
//! [`TextContext`] (segmentation and stemming on), counted per category, and
//! pruned: a term whose within-category frequency `count / num_docs` is below
//! the filter threshold is dropped from that category. Document frequencies
//! are counted before pruning.

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::{debug, info};
use rayon::prelude::*;

use crate::analysis::{AnalysisOptions, TextContext};
use crate::error::{Result, TfcatError};
use crate::model::types::{
    CategoryStats, DocumentFrequencyTable, LabeledDocument, TermFrequencyTable, TfIdfModel,
};

/// Default minimum within-category frequency for a term to be kept.
pub const DEFAULT_FILTER_THRESHOLD: f64 = 0.03;

const TRAINING_ANALYSIS: AnalysisOptions = AnalysisOptions {
    segment: true,
    stem: true,
};

#[derive(Debug, Default)]
struct CategoryCounter {
    num_docs: u64,
    counts: AHashMap<String, u64>,
}

impl CategoryCounter {
    fn add_document(&mut self, terms: Vec<String>) {
        self.num_docs += 1;
        for term in terms {
            *self.counts.entry(term).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: CategoryCounter) {
        self.num_docs += other.num_docs;
        for (term, count) in other.counts {
            *self.counts.entry(term).or_insert(0) += count;
        }
    }
}

type Counters = AHashMap<String, CategoryCounter>;

/// Build the pruned term-frequency table and the document-frequency table.
///
/// Fails with `MissingField` when a record lacks `Category` or `message`,
/// with `MalformedInput` when there are no records, and with
/// `InvalidParameter` when `filter_threshold` is negative or NaN. The first
/// error yielded by `documents` aborts the build.
pub fn generate_frequencies<I>(
    ctx: &TextContext,
    documents: I,
    filter_threshold: f64,
) -> Result<(TermFrequencyTable, DocumentFrequencyTable)>
where
    I: IntoIterator<Item = Result<LabeledDocument>>,
{
    validate_threshold(filter_threshold)?;

    let mut counters = Counters::default();
    let mut num_documents = 0usize;
    for (index, document) in documents.into_iter().enumerate() {
        let (category, terms) = analyze_document(ctx, &document?, index)?;
        counters.entry(category).or_default().add_document(terms);
        num_documents += 1;
    }

    if num_documents == 0 {
        return Err(TfcatError::malformed("no training documents"));
    }
    debug!(
        "analyzed {} documents into {} categories",
        num_documents,
        counters.len()
    );

    prune(counters, filter_threshold)
}

/// Parallel variant of [`generate_frequencies`] over an in-memory slice.
///
/// Produces the same tables. When several records are malformed, which of
/// their errors is reported is unspecified.
pub fn generate_frequencies_parallel(
    ctx: &TextContext,
    documents: &[LabeledDocument],
    filter_threshold: f64,
) -> Result<(TermFrequencyTable, DocumentFrequencyTable)> {
    validate_threshold(filter_threshold)?;
    if documents.is_empty() {
        return Err(TfcatError::malformed("no training documents"));
    }

    let counters = documents
        .par_iter()
        .enumerate()
        .map(|(index, document)| analyze_document(ctx, document, index))
        .try_fold(Counters::default, |mut counters, analyzed| {
            let (category, terms) = analyzed?;
            counters.entry(category).or_default().add_document(terms);
            Ok::<_, TfcatError>(counters)
        })
        .try_reduce(Counters::default, |mut left, right| {
            for (category, counter) in right {
                left.entry(category).or_default().merge(counter);
            }
            Ok(left)
        })?;

    debug!(
        "analyzed {} documents into {} categories using {} threads",
        documents.len(),
        counters.len(),
        rayon::current_num_threads()
    );

    prune(counters, filter_threshold)
}

/// Build the tables and wrap them in a [`TfIdfModel`].
pub fn build_model<I>(ctx: &TextContext, documents: I, filter_threshold: f64) -> Result<TfIdfModel>
where
    I: IntoIterator<Item = Result<LabeledDocument>>,
{
    let (tf, df) = generate_frequencies(ctx, documents, filter_threshold)?;
    TfIdfModel::new(tf, df)
}

fn validate_threshold(filter_threshold: f64) -> Result<()> {
    if filter_threshold.is_nan() || filter_threshold < 0.0 {
        return Err(TfcatError::invalid_parameter(format!(
            "filter_threshold must be a non-negative number, got {filter_threshold}"
        )));
    }
    Ok(())
}

fn analyze_document(
    ctx: &TextContext,
    document: &LabeledDocument,
    index: usize,
) -> Result<(String, Vec<String>)> {
    let category = document
        .category
        .as_deref()
        .ok_or_else(|| TfcatError::missing_field("Category", index))?;
    let message = document
        .message
        .as_deref()
        .ok_or_else(|| TfcatError::missing_field("message", index))?;

    let terms = ctx.terms(&message.to_lowercase(), TRAINING_ANALYSIS)?;
    Ok((category.to_lowercase(), terms))
}

fn prune(
    counters: Counters,
    filter_threshold: f64,
) -> Result<(TermFrequencyTable, DocumentFrequencyTable)> {
    let mut term_frequencies = TermFrequencyTable::new();
    let mut doc_frequencies = DocumentFrequencyTable::new();
    let mut kept = 0usize;
    let mut pruned = 0usize;

    for (category, counter) in counters {
        if counter.num_docs == 0 {
            return Err(TfcatError::divide_by_zero(format!(
                "category '{category}' has no documents"
            )));
        }

        let num_docs = counter.num_docs as f64;
        let mut term_counts = BTreeMap::new();
        for (term, count) in counter.counts {
            *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            if count as f64 / num_docs >= filter_threshold {
                term_counts.insert(term, count);
                kept += 1;
            } else {
                pruned += 1;
            }
        }

        term_frequencies.insert(category, CategoryStats::new(counter.num_docs, term_counts));
    }

    info!(
        "built {} categories over {} distinct terms: kept {} category terms, pruned {}",
        term_frequencies.len(),
        doc_frequencies.len(),
        kept,
        pruned
    );

    Ok((term_frequencies, doc_frequencies))
}
