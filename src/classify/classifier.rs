//! Scoring a document against a [`TfIdfModel`].
//!
//! For every document term and every category the score gains
//! `tf(term, category) * idf(term)` when the category contains the term.
//! When it does not, and a similarity oracle is available, the first
//! `num_similar` neighbours of the term scoring at least `min_similarity`
//! stand in for it, each weighted by its similarity. The best category wins;
//! ties go to the category that sorts first.

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, TextContext};
use crate::classify::oracle::SimilarityOracle;
use crate::error::{Result, TfcatError};
use crate::model::TfIdfModel;

/// Category returned when no category scores above zero.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Knobs for a single classification call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Maximum number of similar terms consulted per unmatched term.
    pub num_similar: usize,
    /// Minimum similarity for a neighbour to contribute, in `[0, 1]`.
    pub min_similarity: f64,
    /// Whether the similarity backend's vocabulary is stemmed. When false the
    /// document terms are left unstemmed so the backend can find them; the
    /// model itself is still looked up with those same terms.
    pub stemmed_database: bool,
    /// Whether to append dictionary sub-words of concatenated tokens.
    pub segment: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            num_similar: 3,
            min_similarity: 0.2,
            stemmed_database: true,
            segment: false,
        }
    }
}

impl ClassifyOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(TfcatError::invalid_parameter(format!(
                "min_similarity must be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }

    fn analysis(&self) -> AnalysisOptions {
        AnalysisOptions {
            segment: self.segment,
            stem: self.stemmed_database,
        }
    }
}

/// Winning category and its score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub score: f64,
}

impl Classification {
    pub fn new<S: Into<String>>(category: S, score: f64) -> Self {
        Classification {
            category: category.into(),
            score,
        }
    }

    /// The `("unknown", 0.0)` result.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CATEGORY, 0.0)
    }

    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY && self.score == 0.0
    }
}

impl From<Classification> for (String, f64) {
    fn from(classification: Classification) -> Self {
        (classification.category, classification.score)
    }
}

/// Classify `text` against `model`.
///
/// Returns [`Classification::unknown`] when the text yields no terms or no
/// category scores above zero. Fails with `InvalidParameter` when
/// `min_similarity` is outside `[0, 1]`; oracle errors abort the call.
///
/// Only the first `num_similar` neighbours from the oracle are considered
/// before `min_similarity` is applied, so oracles must yield neighbours most
/// similar first. Similarities above 1 are capped at 1, which keeps an
/// expanded match from outweighing an exact one of the same base weight.
///
/// # Examples
///
/// ```
/// use tfcat::analysis::TextContext;
/// use tfcat::classify::{ClassifyOptions, classify};
/// use tfcat::model::{LabeledDocument, build_model};
///
/// let ctx = TextContext::builder().without_segmentation().build();
/// let documents = vec![
///     LabeledDocument::new("Bug", "crash on startup"),
///     LabeledDocument::new("Feature", "add dark mode"),
/// ];
/// let model = build_model(&ctx, documents.into_iter().map(Ok), 0.03).unwrap();
///
/// let result = classify(&ctx, &model, "it crashes", None, &ClassifyOptions::default()).unwrap();
/// assert_eq!(result.category, "bug");
/// ```
pub fn classify(
    ctx: &TextContext,
    model: &TfIdfModel,
    text: &str,
    oracle: Option<&dyn SimilarityOracle>,
    options: &ClassifyOptions,
) -> Result<Classification> {
    options.validate()?;

    let terms = ctx.terms(&text.to_lowercase(), options.analysis())?;
    if terms.is_empty() {
        return Ok(Classification::unknown());
    }

    let oracle = oracle.filter(|_| options.num_similar > 0);
    let mut neighbours: AHashMap<&str, Vec<(String, f64)>> = AHashMap::new();
    let mut scores: BTreeMap<&str, f64> = model.categories().map(|c| (c, 0.0)).collect();

    for term in &terms {
        for (category, stats) in model.term_frequencies() {
            let score = scores.entry(category.as_str()).or_insert(0.0);

            if let (Some(tf), Some(idf)) = (stats.frequency(term), model.idf(term)) {
                *score += tf * idf;
                continue;
            }

            let Some(oracle) = oracle else {
                continue;
            };
            if !neighbours.contains_key(term.as_str()) {
                let similar = nearest(oracle, term, options)?;
                neighbours.insert(term.as_str(), similar);
            }
            for (similar_term, similarity) in &neighbours[term.as_str()] {
                if let (Some(tf), Some(idf)) = (stats.frequency(similar_term), model.idf(similar_term)) {
                    *score += tf * idf * similarity;
                }
            }
        }
    }

    trace!("scores for {:?}: {:?}", text, scores);

    let mut best: Option<(&str, f64)> = None;
    for (category, score) in scores {
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((category, score));
        }
    }

    Ok(match best {
        Some((category, score)) if score > 0.0 => Classification::new(category, score),
        _ => Classification::unknown(),
    })
}

fn nearest(
    oracle: &dyn SimilarityOracle,
    term: &str,
    options: &ClassifyOptions,
) -> Result<Vec<(String, f64)>> {
    let similar = match oracle.similar(term)? {
        Some(similar) => similar
            .take(options.num_similar)
            .filter(|(_, similarity)| *similarity >= options.min_similarity)
            .map(|(term, similarity)| (term, similarity.min(1.0)))
            .collect(),
        None => Vec::new(),
    };
    trace!("{} neighbours of {:?}: {:?}", oracle.name(), term, similar);
    Ok(similar)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::classify::oracle::FnOracle;
    use crate::model::{LabeledDocument, build_model};

    fn ctx() -> TextContext {
        TextContext::builder().without_segmentation().build()
    }

    fn model() -> TfIdfModel {
        let documents = vec![
            LabeledDocument::new("Bug", "crash on startup"),
            LabeledDocument::new("Bug", "crash again"),
            LabeledDocument::new("Feature", "add dark mode"),
        ];
        build_model(&ctx(), documents.into_iter().map(Ok), 0.03).unwrap()
    }

    fn synonyms() -> FnOracle<impl Fn(&str) -> Result<Option<Vec<(String, f64)>>> + Send + Sync> {
        FnOracle::new("synonyms", |term: &str| {
            Ok(match term {
                "freez" => Some(vec![
                    ("hang".to_string(), 0.95),
                    ("crash".to_string(), 0.8),
                    ("startup".to_string(), 0.3),
                ]),
                "theme" => Some(vec![("mode".to_string(), 0.6), ("dark".to_string(), 0.5)]),
                _ => None,
            })
        })
    }

    #[test]
    fn test_direct_match() {
        let result = classify(&ctx(), &model(), "the app crashed", None, &ClassifyOptions::default())
            .unwrap();
        assert_eq!(result.category, "bug");
        assert!(result.score > 0.0);

        // tf(crash, bug) = 1.0, idf(crash) = ln(3/2) + 1
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((result.score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_terms_accumulate() {
        let model = model();
        let once = classify(&ctx(), &model, "crash", None, &ClassifyOptions::default()).unwrap();
        let twice = classify(&ctx(), &model, "crash crash", None, &ClassifyOptions::default()).unwrap();
        assert!((twice.score - 2.0 * once.score).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_stopword_text() {
        let model = model();
        let options = ClassifyOptions::default();
        for text in ["", "   ", "the and of", "?!"] {
            let result = classify(&ctx(), &model, text, None, &options).unwrap();
            assert!(result.is_unknown(), "{text:?} gave {result:?}");
        }
    }

    #[test]
    fn test_unmatched_terms_give_unknown() {
        let result = classify(&ctx(), &model(), "printer paper", None, &ClassifyOptions::default())
            .unwrap();
        assert_eq!(<(String, f64)>::from(result), (UNKNOWN_CATEGORY.to_string(), 0.0));
    }

    #[test]
    fn test_similarity_expansion() {
        let oracle = synonyms();
        let result = classify(
            &ctx(),
            &model(),
            "screen freezes",
            Some(&oracle),
            &ClassifyOptions::default(),
        )
        .unwrap();
        assert_eq!(result.category, "bug");

        // only "crash" (0.8) and "startup" (0.3) exist in bug; startup has tf 0.5
        let idf = (3.0f64 / 2.0).ln() + 1.0;
        let expected = 1.0 * idf * 0.8 + 0.5 * idf * 0.3;
        assert!((result.score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_num_similar_limits_neighbours() {
        let oracle = synonyms();
        let options = ClassifyOptions {
            num_similar: 1,
            ..ClassifyOptions::default()
        };
        // the single allowed neighbour "hang" is unknown to the model
        let result = classify(&ctx(), &model(), "freezes", Some(&oracle), &options).unwrap();
        assert!(result.is_unknown());
    }

    #[test]
    fn test_min_similarity_filters_neighbours() {
        let oracle = synonyms();
        let model = model();
        let mut previous = f64::INFINITY;
        for min_similarity in [0.0, 0.3, 0.5, 0.8, 0.9, 1.0] {
            let options = ClassifyOptions {
                min_similarity,
                ..ClassifyOptions::default()
            };
            let score = classify(&ctx(), &model, "freezes", Some(&oracle), &options)
                .unwrap()
                .score;
            assert!(score <= previous);
            previous = score;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_no_oracle_equals_zero_neighbours() {
        let oracle = synonyms();
        let model = model();
        let zero = ClassifyOptions {
            num_similar: 0,
            ..ClassifyOptions::default()
        };
        for text in ["screen freezes", "dark theme", "crash", ""] {
            let without = classify(&ctx(), &model, text, None, &ClassifyOptions::default()).unwrap();
            let disabled = classify(&ctx(), &model, text, Some(&oracle), &zero).unwrap();
            assert_eq!(without, disabled);
        }
    }

    #[test]
    fn test_oracle_queried_once_per_term() {
        let calls = AtomicUsize::new(0);
        let oracle = FnOracle::new("counting", |_: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });
        classify(&ctx(), &model(), "printer printer paper", Some(&oracle), &ClassifyOptions::default())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_oracle_skipped_when_every_category_matches() {
        let documents = vec![
            LabeledDocument::new("bug", "crash"),
            LabeledDocument::new("feature", "crash"),
        ];
        let model = build_model(&ctx(), documents.into_iter().map(Ok), 0.03).unwrap();
        let touched = AtomicUsize::new(0);
        let oracle = FnOracle::new("counting", |_: &str| {
            touched.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });
        classify(&ctx(), &model, "crash", Some(&oracle), &ClassifyOptions::default()).unwrap();
        assert_eq!(touched.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_oracle_error_aborts() {
        let oracle = FnOracle::new("down", |_: &str| {
            Err(TfcatError::resource_unavailable("no vectors"))
        });
        let err = classify(&ctx(), &model(), "printer", Some(&oracle), &ClassifyOptions::default())
            .unwrap_err();
        assert!(matches!(err, TfcatError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_invalid_min_similarity() {
        for min_similarity in [-0.1, 1.5, f64::NAN] {
            let options = ClassifyOptions {
                min_similarity,
                ..ClassifyOptions::default()
            };
            let err = classify(&ctx(), &model(), "crash", None, &options).unwrap_err();
            assert!(matches!(err, TfcatError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_ties_resolve_to_first_category() {
        let documents = vec![
            LabeledDocument::new("zeta", "crash"),
            LabeledDocument::new("alpha", "crash"),
        ];
        let model = build_model(&ctx(), documents.into_iter().map(Ok), 0.03).unwrap();
        let result = classify(&ctx(), &model, "crash", None, &ClassifyOptions::default()).unwrap();
        assert_eq!(result.category, "alpha");
    }

    #[test]
    fn test_unstemmed_database() {
        let unstemmed = ctx();
        let tf = BTreeMap::from([
            (
                "bug".to_string(),
                crate::model::CategoryStats::new(1, BTreeMap::from([("crashed".to_string(), 1)])),
            ),
            (
                "feature".to_string(),
                crate::model::CategoryStats::new(1, BTreeMap::from([("crash".to_string(), 1)])),
            ),
        ]);
        let df = BTreeMap::from([("crashed".to_string(), 1), ("crash".to_string(), 1)]);
        let model = TfIdfModel::new(tf, df).unwrap();

        let options = ClassifyOptions {
            stemmed_database: false,
            ..ClassifyOptions::default()
        };
        let result = classify(&unstemmed, &model, "crashed", None, &options).unwrap();
        assert_eq!(result.category, "bug");

        let stemmed = classify(&unstemmed, &model, "crashed", None, &ClassifyOptions::default()).unwrap();
        assert_eq!(stemmed.category, "feature");
    }

    #[test]
    fn test_similarity_capped_at_one() {
        let oracle = FnOracle::new("inflated", |term: &str| {
            Ok((term == "boom").then(|| vec![("add".to_string(), 5.0)]))
        });
        let model = model();
        let idf = (3.0f64 / 2.0).ln() + 1.0;

        let expanded =
            classify(&ctx(), &model, "boom", Some(&oracle), &ClassifyOptions::default()).unwrap();
        assert_eq!(expanded.category, "feature");
        assert!((expanded.score - idf).abs() < 1e-12);

        // the exact match on "crash" is not outweighed; the tie goes to bug
        let mixed = classify(&ctx(), &model, "boom crash", Some(&oracle), &ClassifyOptions::default())
            .unwrap();
        assert_eq!(mixed.category, "bug");
        assert!((mixed.score - idf).abs() < 1e-12);
    }

    #[test]
    fn test_unstemmed_terms_reach_vector_vocabulary() {
        // word vectors know inflected forms only
        let oracle = FnOracle::new("vectors", |term: &str| {
            Ok((term == "crashes").then(|| vec![("crash".to_string(), 0.9)]))
        });
        let options = ClassifyOptions {
            stemmed_database: false,
            ..ClassifyOptions::default()
        };
        let model = model();

        let result = classify(&ctx(), &model, "crashes", Some(&oracle), &options).unwrap();
        assert_eq!(result.category, "bug");
        let idf = (3.0f64 / 2.0).ln() + 1.0;
        assert!((result.score - 0.9 * idf).abs() < 1e-12);

        // stemmed, the term matches the model directly
        let stemmed =
            classify(&ctx(), &model, "crashes", Some(&oracle), &ClassifyOptions::default()).unwrap();
        assert!((stemmed.score - idf).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let oracle = synonyms();
        let model = model();
        let first = classify(&ctx(), &model, "dark theme freezes", Some(&oracle), &ClassifyOptions::default())
            .unwrap();
        for _ in 0..5 {
            let again = classify(&ctx(), &model, "dark theme freezes", Some(&oracle), &ClassifyOptions::default())
                .unwrap();
            assert_eq!(first, again);
        }
    }
}
