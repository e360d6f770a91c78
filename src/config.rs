//! Configuration file support.
//!
//! A configuration file is a JSON object whose fields all have defaults, so
//! `{}` is a valid configuration. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::segment::{SegmentDictionary, WordSegmenter};
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::TextContext;
use crate::classify::ClassifyOptions;
use crate::error::{Result, TfcatError};
use crate::model::DEFAULT_FILTER_THRESHOLD;
use crate::similarity::OracleSpec;

/// Settings shared by the `build`, `classify` and `evaluate` commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfcatConfig {
    /// Minimum within-category term frequency kept by the model builder.
    pub filter_threshold: f64,
    pub num_similar: usize,
    pub min_similarity: f64,
    /// Append dictionary sub-words of concatenated tokens when classifying.
    pub segment: bool,
    /// Whether the similarity backend's vocabulary is stemmed. Unset follows
    /// the backend, see [`OracleSpec::stemmed_vocabulary`].
    pub stemmed_database: Option<bool>,
    /// `word count` frequency file replacing the built-in segmentation
    /// dictionary.
    pub segment_dictionary: Option<PathBuf>,
    /// One-word-per-line stopword file replacing the built-in list.
    pub stopwords: Option<PathBuf>,
    /// Similarity backend: `none`, `table:PATH` or `vectors:PATH`.
    pub similarity: String,
    /// Directory holding the persisted model.
    pub model_dir: PathBuf,
}

impl Default for TfcatConfig {
    fn default() -> Self {
        let classify = ClassifyOptions::default();
        TfcatConfig {
            filter_threshold: DEFAULT_FILTER_THRESHOLD,
            num_similar: classify.num_similar,
            min_similarity: classify.min_similarity,
            segment: classify.segment,
            stemmed_database: None,
            segment_dictionary: None,
            stopwords: None,
            similarity: OracleSpec::None.to_string(),
            model_dir: PathBuf::from("model"),
        }
    }
}

impl TfcatConfig {
    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: TfcatConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.filter_threshold.is_nan() || self.filter_threshold < 0.0 {
            return Err(TfcatError::invalid_parameter(format!(
                "filter_threshold must be non-negative, got {}",
                self.filter_threshold
            )));
        }
        self.classify_options().validate()?;
        self.oracle_spec()?;
        Ok(())
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            num_similar: self.num_similar,
            min_similarity: self.min_similarity,
            stemmed_database: self.stemmed_database(),
            segment: self.segment,
        }
    }

    /// The explicit `stemmed_database` setting, or the backend's default.
    pub fn stemmed_database(&self) -> bool {
        self.stemmed_database.unwrap_or_else(|| {
            self.oracle_spec()
                .map_or(true, |spec| spec.stemmed_vocabulary())
        })
    }

    pub fn oracle_spec(&self) -> Result<OracleSpec> {
        self.similarity.parse()
    }

    /// Build the text context described by this configuration.
    pub fn text_context(&self) -> Result<TextContext> {
        let mut builder = TextContext::builder();
        if let Some(path) = &self.segment_dictionary {
            let dictionary = SegmentDictionary::load_from_frequency_file(path)?;
            builder = builder.segmenter(Arc::new(WordSegmenter::with_dictionary(dictionary)));
        }
        if let Some(path) = &self.stopwords {
            builder = builder.stop_filter(StopFilter::load_from_file(path)?);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::analysis::AnalysisOptions;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = TfcatConfig::default();
        assert_eq!(config.filter_threshold, 0.03);
        assert_eq!(config.classify_options(), ClassifyOptions::default());
        assert_eq!(config.oracle_spec().unwrap(), OracleSpec::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(r#"{"num_similar": 5, "similarity": "table:sims.csv"}"#);
        let config = TfcatConfig::load(file.path()).unwrap();

        assert_eq!(config.num_similar, 5);
        assert_eq!(config.min_similarity, 0.2);
        assert_eq!(
            config.oracle_spec().unwrap(),
            OracleSpec::Table(PathBuf::from("sims.csv"))
        );
    }

    #[test]
    fn test_stemmed_database_follows_backend() {
        let vectors = TfcatConfig {
            similarity: "vectors:so.txt".to_string(),
            ..TfcatConfig::default()
        };
        assert!(!vectors.classify_options().stemmed_database);

        let table = TfcatConfig {
            similarity: "table:sims.csv".to_string(),
            ..TfcatConfig::default()
        };
        assert!(table.classify_options().stemmed_database);

        let file = write_config(r#"{"similarity": "vectors:so.txt", "stemmed_database": true}"#);
        let config = TfcatConfig::load(file.path()).unwrap();
        assert_eq!(config.stemmed_database, Some(true));
        assert!(config.classify_options().stemmed_database);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_config(r#"{"min_similarity": 1.5}"#);
        assert!(matches!(
            TfcatConfig::load(file.path()),
            Err(TfcatError::InvalidParameter(_))
        ));

        let file = write_config(r#"{"filter_threshold": -0.1}"#);
        assert!(TfcatConfig::load(file.path()).is_err());

        let file = write_config(r#"{"similarity": "sqlite:words.db"}"#);
        assert!(TfcatConfig::load(file.path()).is_err());

        let file = write_config("{not json");
        assert!(matches!(TfcatConfig::load(file.path()), Err(TfcatError::Json(_))));
    }

    #[test]
    fn test_text_context_with_custom_resources() {
        let dictionary = write_config("dark 100\nmode 100\n");
        let stopwords = write_config("please\n");
        let config = TfcatConfig {
            segment_dictionary: Some(dictionary.path().to_path_buf()),
            stopwords: Some(stopwords.path().to_path_buf()),
            ..TfcatConfig::default()
        };

        let ctx = config.text_context().unwrap();
        let options = AnalysisOptions {
            segment: true,
            stem: false,
        };
        assert_eq!(
            ctx.terms("please darkmode", options).unwrap(),
            vec!["darkmode", "dark", "mode"]
        );
    }

    #[test]
    fn test_text_context_missing_dictionary() {
        let config = TfcatConfig {
            segment_dictionary: Some(PathBuf::from("/nonexistent/words.txt")),
            ..TfcatConfig::default()
        };
        assert!(matches!(config.text_context(), Err(TfcatError::Io(_))));
    }
}
