//! Word vectors with brute-force cosine nearest neighbours.
//!
//! Reads the word2vec text format: an optional `<count> <dimension>` header
//! followed by one `word v1 v2 ...` line per word. Vectors are normalized to
//! unit length at load time, so cosine similarity is a dot product.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::{debug, warn};
use rayon::prelude::*;

use crate::classify::{SimilarTerms, SimilarityOracle};
use crate::error::{Result, TfcatError};

/// Vocabulary size above which neighbour scans run on the rayon pool.
const PARALLEL_SCAN_THRESHOLD: usize = 10_000;

/// In-memory embedding table.
#[derive(Clone, Debug, Default)]
pub struct WordVectors {
    words: Vec<String>,
    index: AHashMap<String, usize>,
    /// Row-major unit vectors, `dimension` values per word.
    data: Vec<f32>,
    dimension: usize,
}

impl WordVectors {
    /// Load a word2vec text file.
    pub fn load_word2vec_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let vectors = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(
            "loaded {} word vectors of dimension {} from {}",
            vectors.len(),
            vectors.dimension(),
            path.display()
        );
        Ok(vectors)
    }

    /// Parse word2vec text from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vectors = WordVectors::default();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let values: Vec<&str> = fields.collect();

            if line_number == 0 && values.len() == 1 && is_header(word, values[0]) {
                continue;
            }

            let vector = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    TfcatError::malformed(format!("line {}: invalid vector value: {e}", line_number + 1))
                })?;
            vectors
                .insert(word, vector)
                .map_err(|e| TfcatError::malformed(format!("line {}: {e}", line_number + 1)))?;
        }

        Ok(vectors)
    }

    /// Build from `(word, vector)` pairs.
    pub fn from_vectors<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: AsRef<str>,
    {
        let mut vectors = WordVectors::default();
        for (word, vector) in entries {
            vectors.insert(word.as_ref(), vector)?;
        }
        Ok(vectors)
    }

    /// Add a word. The first vector fixes the dimension; later vectors must
    /// match it. Duplicate words keep their first vector.
    pub fn insert(&mut self, word: &str, mut vector: Vec<f32>) -> Result<()> {
        if vector.is_empty() {
            return Err(TfcatError::malformed(format!("word {word:?} has no vector")));
        }
        if self.words.is_empty() {
            self.dimension = vector.len();
        } else if vector.len() != self.dimension {
            return Err(TfcatError::malformed(format!(
                "word {word:?} has dimension {}, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        if !vector.iter().all(|x| x.is_finite()) {
            return Err(TfcatError::malformed(format!(
                "word {word:?} contains invalid values (NaN or infinity)"
            )));
        }
        if self.index.contains_key(word) {
            warn!("duplicate word vector for {word:?} ignored");
            return Ok(());
        }

        normalize(&mut vector);
        self.index.insert(word.to_string(), self.words.len());
        self.words.push(word.to_string());
        self.data.extend_from_slice(&vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// The unit vector of `word`.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&i| self.row(i))
    }

    /// Cosine similarity of two known words.
    pub fn similarity(&self, left: &str, right: &str) -> Option<f64> {
        Some(dot(self.vector(left)?, self.vector(right)?) as f64)
    }

    /// All other words ordered by descending cosine similarity, ties by word.
    pub fn most_similar(&self, word: &str) -> Option<Vec<(String, f64)>> {
        let &target = self.index.get(word)?;
        let query = self.row(target);
        let score = |i: usize| (i, dot(query, self.row(i)));

        let mut scored: Vec<(usize, f32)> = if self.len() > PARALLEL_SCAN_THRESHOLD {
            (0..self.len())
                .into_par_iter()
                .filter(|&i| i != target)
                .map(score)
                .collect()
        } else {
            (0..self.len()).filter(|&i| i != target).map(score).collect()
        };
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| self.words[a.0].cmp(&self.words[b.0]))
        });

        Some(
            scored
                .into_iter()
                .map(|(i, s)| (self.words[i].clone(), s as f64))
                .collect(),
        )
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }
}

impl SimilarityOracle for WordVectors {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        Ok(self
            .most_similar(term)
            .map(|similar| Box::new(similar.into_iter()) as SimilarTerms<'_>))
    }

    fn name(&self) -> &str {
        "word_vectors"
    }
}

fn is_header(count: &str, dimension: &str) -> bool {
    count.parse::<usize>().is_ok() && dimension.parse::<usize>().is_ok()
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "4 2\ncrash 1.0 0.0\nhang 0.8 0.6\nfreez 0.6 0.8\nmode 0.0 3.0\n";

    #[test]
    fn test_load_with_header() {
        let vectors = WordVectors::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(vectors.len(), 4);
        assert_eq!(vectors.dimension(), 2);

        let mode = vectors.vector("mode").unwrap();
        assert!((mode[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_without_header() {
        let vectors = WordVectors::from_reader("crash 1 0 0\nhang 0 1 0\n".as_bytes()).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.dimension(), 3);
    }

    #[test]
    fn test_most_similar_order() {
        let vectors = WordVectors::from_reader(SAMPLE.as_bytes()).unwrap();
        let similar = vectors.most_similar("crash").unwrap();
        let words: Vec<&str> = similar.iter().map(|(w, _)| w.as_str()).collect();

        assert_eq!(words, vec!["hang", "freez", "mode"]);
        assert!((similar[0].1 - 0.8).abs() < 1e-6);
        assert!(similar[2].1.abs() < 1e-6);
    }

    #[test]
    fn test_oracle_unknown_word() {
        let vectors = WordVectors::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(vectors.similar("printer").unwrap().is_none());
        assert_eq!(vectors.similar("hang").unwrap().unwrap().count(), 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = WordVectors::from_reader("crash 1 0\nhang 1 0 0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_invalid_value() {
        assert!(WordVectors::from_reader("crash 1 x\n".as_bytes()).is_err());
        assert!(WordVectors::from_reader("crash inf 0\n".as_bytes()).is_err());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let vectors =
            WordVectors::from_vectors([("crash", vec![1.0, 0.0]), ("crash", vec![0.0, 1.0])]).unwrap();
        assert_eq!(vectors.len(), 1);
        assert!((vectors.vector("crash").unwrap()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity() {
        let vectors = WordVectors::from_reader(SAMPLE.as_bytes()).unwrap();
        let s = vectors.similarity("hang", "freez").unwrap();
        assert!((s - 0.96).abs() < 1e-6);
        assert!(vectors.similarity("hang", "printer").is_none());
    }
}
