//! The word-similarity capability used to expand classification matches.

use std::sync::Arc;

use crate::error::Result;

/// Similar terms with their similarity scores, most similar first.
pub type SimilarTerms<'a> = Box<dyn Iterator<Item = (String, f64)> + 'a>;

/// Source of word similarity.
///
/// `similar` returns `Ok(None)` when the oracle has nothing to offer for a
/// term (for example an out-of-vocabulary word). The returned sequence must
/// be finite and ordered by descending score; the classifier only consumes
/// as many items as it needs. Scores are similarities in `[0, 1]`.
pub trait SimilarityOracle: Send + Sync {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>>;

    /// Get the name of this oracle for debugging and logging.
    fn name(&self) -> &str;
}

impl<O: SimilarityOracle + ?Sized> SimilarityOracle for Box<O> {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        (**self).similar(term)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<O: SimilarityOracle + ?Sized> SimilarityOracle for Arc<O> {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        (**self).similar(term)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapts a closure into a [`SimilarityOracle`].
///
/// # Examples
///
/// ```
/// use tfcat::classify::{FnOracle, SimilarityOracle};
///
/// let oracle = FnOracle::new("fixed", |term: &str| {
///     Ok((term == "crashed").then(|| vec![("crash".to_string(), 0.9)]))
/// });
/// let similar: Vec<_> = oracle.similar("crashed").unwrap().unwrap().collect();
/// assert_eq!(similar, vec![("crash".to_string(), 0.9)]);
/// assert!(oracle.similar("mode").unwrap().is_none());
/// ```
pub struct FnOracle<F> {
    name: String,
    func: F,
}

impl<F> FnOracle<F>
where
    F: Fn(&str) -> Result<Option<Vec<(String, f64)>>> + Send + Sync,
{
    pub fn new<S: Into<String>>(name: S, func: F) -> Self {
        FnOracle {
            name: name.into(),
            func,
        }
    }
}

impl<F> SimilarityOracle for FnOracle<F>
where
    F: Fn(&str) -> Result<Option<Vec<(String, f64)>>> + Send + Sync,
{
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        Ok((self.func)(term)?.map(|pairs| Box::new(pairs.into_iter()) as SimilarTerms<'_>))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnOracle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOracle").field("name", &self.name).finish()
    }
}
