//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TfcatArgs};
use crate::error::Result;
use crate::evaluate::EvaluationRow;

/// Result of `tfcat build`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildSummary {
    pub input: String,
    pub model_dir: String,
    pub documents: u64,
    pub categories: usize,
    pub terms: usize,
    pub kept_terms: usize,
    pub filter_threshold: f64,
    pub duration_ms: u64,
}

/// Result of `tfcat classify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationOutput {
    pub text: String,
    pub category: String,
    pub score: f64,
    pub similarity: Option<String>,
}

/// Result of `tfcat evaluate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub input: String,
    pub documents: usize,
    pub filter_threshold: f64,
    pub similarity: String,
    pub stemmed_database: bool,
    pub rows: Vec<EvaluationRow>,
}

/// Human-readable rendering of a command result.
pub trait HumanReadable {
    fn render_human(&self) -> String;
}

impl HumanReadable for BuildSummary {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model written to {}", self.model_dir);
        let _ = writeln!(out, "Documents: {}", self.documents);
        let _ = writeln!(out, "Categories: {}", self.categories);
        let _ = writeln!(
            out,
            "Terms: {} ({} kept at threshold {})",
            self.terms, self.kept_terms, self.filter_threshold
        );
        let _ = write!(out, "Build time: {}ms", self.duration_ms);
        out
    }
}

impl HumanReadable for ClassificationOutput {
    fn render_human(&self) -> String {
        format!("{} ({:.4})", self.category, self.score)
    }
}

impl HumanReadable for EvaluationReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} documents, filter threshold {}, similarity {} ({})",
            self.documents,
            self.filter_threshold,
            self.similarity,
            if self.stemmed_database { "stemmed" } else { "unstemmed" }
        );
        let _ = writeln!(
            out,
            "Match %, Zeros %, Average score, Num similar, Min similarity"
        );
        for row in &self.rows {
            let _ = writeln!(out, "{row}");
        }
        out.trim_end().to_string()
    }
}

/// Output a result in the selected format.
pub fn output_result<T>(message: &str, result: &T, args: &TfcatArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: HumanReadable>(message: &str, result: &T, args: &TfcatArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    println!("{}", result.render_human());
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &TfcatArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_human() {
        let output = ClassificationOutput {
            text: "the app crashed".to_string(),
            category: "bug".to_string(),
            score: 1.2876820724517808,
            similarity: None,
        };
        assert_eq!(output.render_human(), "bug (1.2877)");
    }

    #[test]
    fn test_classification_json() {
        let output = ClassificationOutput {
            text: "hi".to_string(),
            category: "unknown".to_string(),
            score: 0.0,
            similarity: Some("word_vectors".to_string()),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["category"], "unknown");
        assert_eq!(value["similarity"], "word_vectors");
    }

    #[test]
    fn test_evaluation_human() {
        let report = EvaluationReport {
            input: "labeled.csv".to_string(),
            documents: 4,
            filter_threshold: 0.03,
            similarity: "none".to_string(),
            stemmed_database: true,
            rows: vec![EvaluationRow {
                num_similar: 1,
                min_similarity: 0.7,
                match_percent: 75.0,
                zeros_percent: 25.0,
                average_score: 0.5,
                documents: 4,
                elapsed_ms: 1,
            }],
        };
        let rendered = report.render_human();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "4 documents, filter threshold 0.03, similarity none (stemmed)");
        assert_eq!(lines[2], "75.00, 25.00, 0.5000, 1, 0.70");
    }
}
