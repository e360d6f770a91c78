//! Batch evaluation over a grid of classification parameters.
//!
//! Every labeled document is classified once per `(num_similar,
//! min_similarity)` grid point. Each point yields an [`EvaluationRow`] with
//! the share of documents whose predicted category matches the label, the
//! share that matched nothing at all, and the mean score.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::TextContext;
use crate::classify::{Classification, ClassifyOptions, SimilarityOracle, classify};
use crate::error::{Result, TfcatError};
use crate::model::{LabeledDocument, TfIdfModel};

/// Parameter grid swept by [`sweep`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub num_similar: Vec<usize>,
    pub min_similarity: Vec<f64>,
}

impl Default for SweepGrid {
    /// `num_similar` 1 to 10, `min_similarity` 0.70 to 0.90 by 0.01.
    fn default() -> Self {
        SweepGrid {
            num_similar: (1..=10).collect(),
            min_similarity: (70..=90).map(|p| p as f64 / 100.0).collect(),
        }
    }
}

impl SweepGrid {
    /// A grid with a single point.
    pub fn single(num_similar: usize, min_similarity: f64) -> Self {
        SweepGrid {
            num_similar: vec![num_similar],
            min_similarity: vec![min_similarity],
        }
    }

    /// Build a grid from an inclusive `num_similar` range and an inclusive
    /// `min_similarity` range walked by `step`.
    pub fn from_ranges(
        num_similar: RangeInclusive<usize>,
        min_similarity: RangeInclusive<f64>,
        step: f64,
    ) -> Result<Self> {
        if num_similar.is_empty() {
            return Err(TfcatError::invalid_parameter(format!(
                "num_similar range {}..{} is empty",
                num_similar.start(),
                num_similar.end()
            )));
        }
        let grid = SweepGrid {
            num_similar: num_similar.collect(),
            min_similarity: float_steps(*min_similarity.start(), *min_similarity.end(), step)?,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Parse `A..B` (inclusive) for `num_similar`.
    pub fn parse_num_similar(s: &str) -> Result<RangeInclusive<usize>> {
        let (start, end) = split_range(s)?;
        let parse = |v: &str| {
            v.trim().parse::<usize>().map_err(|e| {
                TfcatError::invalid_parameter(format!("invalid num_similar bound {v:?}: {e}"))
            })
        };
        Ok(parse(start)?..=parse(end)?)
    }

    /// Parse `A..B:STEP` (inclusive, step defaults to 0.01) for
    /// `min_similarity`.
    pub fn parse_min_similarity(s: &str) -> Result<(RangeInclusive<f64>, f64)> {
        let (range, step) = match s.rsplit_once(':') {
            Some((range, step)) => (range, Some(step)),
            None => (s, None),
        };
        let (start, end) = split_range(range)?;
        let parse = |v: &str| {
            v.trim().parse::<f64>().map_err(|e| {
                TfcatError::invalid_parameter(format!("invalid min_similarity value {v:?}: {e}"))
            })
        };
        let step = step.map(parse).transpose()?.unwrap_or(0.01);
        Ok((parse(start)?..=parse(end)?, step))
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.num_similar.len() * self.min_similarity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TfcatError::invalid_parameter("sweep grid has no points"));
        }
        for &min_similarity in &self.min_similarity {
            if !(0.0..=1.0).contains(&min_similarity) {
                return Err(TfcatError::invalid_parameter(format!(
                    "min_similarity must be within [0, 1], got {min_similarity}"
                )));
            }
        }
        Ok(())
    }

    /// Grid points in sweep order, `min_similarity` varying fastest.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.num_similar
            .iter()
            .flat_map(|&n| self.min_similarity.iter().map(move |&m| (n, m)))
    }
}

/// Outcome of one grid point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub num_similar: usize,
    pub min_similarity: f64,
    /// Percentage of documents classified into their labeled category.
    pub match_percent: f64,
    /// Percentage of documents that scored zero.
    pub zeros_percent: f64,
    pub average_score: f64,
    pub documents: usize,
    pub elapsed_ms: u64,
}

impl fmt::Display for EvaluationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}, {:.2}, {:.4}, {}, {:.2}",
            self.match_percent,
            self.zeros_percent,
            self.average_score,
            self.num_similar,
            self.min_similarity
        )
    }
}

/// Expected category and message of a test document.
#[derive(Clone, Debug, PartialEq)]
struct TestCase {
    expected: String,
    message: String,
}

/// Classify `documents` at every grid point.
///
/// Labels are compared case-insensitively. Fails with `MalformedInput` when
/// `documents` is empty or a document lacks a field.
pub fn sweep(
    ctx: &TextContext,
    model: &TfIdfModel,
    documents: &[LabeledDocument],
    oracle: Option<&dyn SimilarityOracle>,
    stemmed_database: bool,
    segment: bool,
    grid: &SweepGrid,
) -> Result<Vec<EvaluationRow>> {
    grid.validate()?;
    let cases = prepare(documents)?;
    info!(
        "evaluating {} documents at {} grid points",
        cases.len(),
        grid.len()
    );

    grid.points()
        .map(|(num_similar, min_similarity)| {
            let options = ClassifyOptions {
                num_similar,
                min_similarity,
                stemmed_database,
                segment,
            };
            evaluate_cases(ctx, model, &cases, oracle, &options)
        })
        .collect()
}

/// Classify `documents` once with `options`.
pub fn evaluate(
    ctx: &TextContext,
    model: &TfIdfModel,
    documents: &[LabeledDocument],
    oracle: Option<&dyn SimilarityOracle>,
    options: &ClassifyOptions,
) -> Result<EvaluationRow> {
    let cases = prepare(documents)?;
    evaluate_cases(ctx, model, &cases, oracle, options)
}

fn prepare(documents: &[LabeledDocument]) -> Result<Vec<TestCase>> {
    if documents.is_empty() {
        return Err(TfcatError::malformed("no test documents to evaluate"));
    }
    documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            let expected = document
                .category
                .as_deref()
                .ok_or_else(|| TfcatError::missing_field("Category", index))?;
            let message = document
                .message
                .as_deref()
                .ok_or_else(|| TfcatError::missing_field("message", index))?;
            Ok(TestCase {
                expected: expected.to_lowercase(),
                message: message.to_string(),
            })
        })
        .collect()
}

fn evaluate_cases(
    ctx: &TextContext,
    model: &TfIdfModel,
    cases: &[TestCase],
    oracle: Option<&dyn SimilarityOracle>,
    options: &ClassifyOptions,
) -> Result<EvaluationRow> {
    options.validate()?;
    let started = Instant::now();

    let results: Vec<Classification> = cases
        .par_iter()
        .map(|case| classify(ctx, model, &case.message, oracle, options))
        .collect::<Result<_>>()?;

    let documents = cases.len();
    let matches = cases
        .iter()
        .zip(&results)
        .filter(|(case, result)| result.category == case.expected)
        .count();
    let zeros = results.iter().filter(|r| r.score == 0.0).count();
    let total_score: f64 = results.iter().map(|r| r.score).sum();

    let row = EvaluationRow {
        num_similar: options.num_similar,
        min_similarity: options.min_similarity,
        match_percent: 100.0 * matches as f64 / documents as f64,
        zeros_percent: 100.0 * zeros as f64 / documents as f64,
        average_score: total_score / documents as f64,
        documents,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    debug!("evaluated {row}");
    Ok(row)
}

fn split_range(s: &str) -> Result<(&str, &str)> {
    s.split_once("..").ok_or_else(|| {
        TfcatError::invalid_parameter(format!("expected a range like A..B, got {s:?}"))
    })
}

fn float_steps(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(TfcatError::invalid_parameter(format!(
            "step must be positive, got {step}"
        )));
    }
    if start.is_nan() || end.is_nan() || start > end {
        return Err(TfcatError::invalid_parameter(format!(
            "min_similarity range {start}..{end} is empty"
        )));
    }
    // Tolerate rounding at the upper bound.
    let count = ((end - start) / step + 1e-9).floor() as usize;
    Ok((0..=count).map(|i| start + i as f64 * step).collect())
}
