//! Precomputed term-pair similarities.
//!
//! Pairs are read from CSV rows `word1,word2,score` and stored in both
//! directions. A header row is allowed when its score column is not a number.
//! Scores must lie in `[0, 1]`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::AHashMap;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};

use crate::classify::{SimilarTerms, SimilarityOracle};
use crate::error::{Result, TfcatError};

/// Symmetric lookup table of term similarities.
///
/// # Examples
///
/// ```
/// use tfcat::classify::SimilarityOracle;
/// use tfcat::similarity::SimilarityTable;
///
/// let mut table = SimilarityTable::new();
/// table.insert("crash", "freez", 0.7).unwrap();
/// table.insert("crash", "hang", 0.9).unwrap();
/// assert!(table.insert("crash", "boom", 1.5).is_err());
///
/// let similar: Vec<_> = table.similar("crash").unwrap().unwrap().collect();
/// assert_eq!(similar[0], ("hang".to_string(), 0.9));
/// assert_eq!(table.score("freez", "crash"), Some(0.7));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimilarityTable {
    /// Partners of each term, most similar first.
    neighbours: AHashMap<String, Vec<(String, f64)>>,
}

impl SimilarityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pairs from a CSV file.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(File::open(path)?)?;
        debug!(
            "loaded {} terms with similarities from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Read pairs from any CSV source.
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .from_reader(input);

        let mut table = Self::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let (Some(left), Some(right), Some(score)) = (record.get(0), record.get(1), record.get(2))
            else {
                return Err(TfcatError::malformed(format!(
                    "similarity row {} needs word1,word2,score",
                    line + 1
                )));
            };

            let score = match score.parse::<f64>() {
                Ok(score) if is_similarity(score) => score,
                Err(_) if line == 0 => continue,
                _ => {
                    return Err(TfcatError::malformed(format!(
                        "similarity row {} has invalid score {:?}",
                        line + 1,
                        score
                    )));
                }
            };
            table.insert(left, right, score)?;
        }
        Ok(table)
    }

    /// Record the similarity of a pair in both directions, replacing any
    /// previous score. Self-pairs are ignored.
    ///
    /// Fails with `InvalidParameter` when `score` is outside `[0, 1]`.
    pub fn insert(&mut self, left: &str, right: &str, score: f64) -> Result<()> {
        if !is_similarity(score) {
            return Err(TfcatError::invalid_parameter(format!(
                "similarity of {left:?} and {right:?} must be within [0, 1], got {score}"
            )));
        }
        let left = left.to_lowercase();
        let right = right.to_lowercase();
        if left == right {
            warn!("ignoring self similarity for {left:?}");
            return Ok(());
        }
        self.insert_directed(&left, &right, score);
        self.insert_directed(&right, &left, score);
        Ok(())
    }

    fn insert_directed(&mut self, term: &str, partner: &str, score: f64) {
        let partners = self.neighbours.entry(term.to_string()).or_default();
        partners.retain(|(existing, _)| existing != partner);
        let position = partners
            .iter()
            .position(|(existing, existing_score)| {
                score > *existing_score || (score == *existing_score && partner < existing.as_str())
            })
            .unwrap_or(partners.len());
        partners.insert(position, (partner.to_string(), score));
    }

    /// Similarity of a pair, if recorded.
    pub fn score(&self, left: &str, right: &str) -> Option<f64> {
        self.neighbours
            .get(left)?
            .iter()
            .find(|(partner, _)| partner == right)
            .map(|(_, score)| *score)
    }

    /// Number of terms with at least one partner.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }
}

fn is_similarity(score: f64) -> bool {
    (0.0..=1.0).contains(&score)
}

impl SimilarityOracle for SimilarityTable {
    fn similar(&self, term: &str) -> Result<Option<SimilarTerms<'_>>> {
        Ok(self
            .neighbours
            .get(term)
            .map(|partners| Box::new(partners.iter().cloned()) as SimilarTerms<'_>))
    }

    fn name(&self) -> &str {
        "similarity_table"
    }
}
