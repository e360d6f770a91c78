//! Memoizing wrapper around a similarity oracle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::classify::{SimilarTerms, SimilarityOracle};
use crate::error::Result;

type Neighbours = Option<Arc<[(String, f64)]>>;

/// Caches `similar()` answers per term.
///
/// Errors are never cached. With a limit set, only the first `limit`
/// neighbours of each term are kept, which bounds memory for oracles that
/// return their whole vocabulary.
pub struct CachedOracle<O> {
    inner: O,
    limit: Option<usize>,
    cache: Mutex<AHashMap<String, Neighbours>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<O: SimilarityOracle> CachedOracle<O> {
    pub fn new(inner: O) -> Self {
        CachedOracle {
            inner,
            limit: None,
            cache: Mutex::new(AHashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Keep at most `limit` neighbours per cached term.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }

    /// Number of cached terms.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

impl<O: SimilarityOracle> SimilarityOracle for CachedOracle<O> {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        let cached = self.cache.lock().get(term).cloned();
        let neighbours = match cached {
            Some(neighbours) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                neighbours
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let neighbours: Neighbours = self.inner.similar(term)?.map(|similar| {
                    match self.limit {
                        Some(limit) => similar.take(limit).collect(),
                        None => similar.collect(),
                    }
                });
                self.cache
                    .lock()
                    .insert(term.to_string(), neighbours.clone());
                neighbours
            }
        };

        Ok(neighbours.map(|pairs| {
            Box::new((0..pairs.len()).map(move |i| pairs[i].clone())) as SimilarTerms<'_>
        }))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<O: SimilarityOracle> std::fmt::Debug for CachedOracle<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedOracle")
            .field("inner", &self.inner.name())
            .field("limit", &self.limit)
            .field("cached_terms", &self.len())
            .finish()
    }
}
