//! Similarity oracle backends.
//!
//! - [`SimilarityTable`]: precomputed term pairs from CSV.
//! - [`WordVectors`]: word2vec text vectors with cosine nearest neighbours.
//! - [`CachedOracle`]: per-term memoization for any oracle.
//!
//! [`OracleSpec`] names a backend and its resource path in the textual form
//! used by the command line and the configuration file: `none`,
//! `table:PATH` or `vectors:PATH`.

pub mod cache;
pub mod table;
pub mod vectors;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::classify::SimilarityOracle;
use crate::error::{Result, TfcatError};

pub use cache::CachedOracle;
pub use table::SimilarityTable;
pub use vectors::WordVectors;

/// A similarity backend and where to load it from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OracleSpec {
    #[default]
    None,
    Table(PathBuf),
    Vectors(PathBuf),
}

impl OracleSpec {
    /// Load the described oracle. `None` loads nothing.
    ///
    /// Loaded backends are wrapped in a [`CachedOracle`].
    pub fn load(&self) -> Result<Option<Box<dyn SimilarityOracle>>> {
        let oracle: Box<dyn SimilarityOracle> = match self {
            OracleSpec::None => return Ok(None),
            OracleSpec::Table(path) => Box::new(CachedOracle::new(SimilarityTable::load_csv(path)?)),
            OracleSpec::Vectors(path) => {
                Box::new(CachedOracle::new(WordVectors::load_word2vec_text(path)?))
            }
        };
        Ok(Some(oracle))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OracleSpec::None)
    }

    /// Whether the backend's vocabulary holds stemmed terms. Similarity
    /// tables are built over model stems; word vectors are trained on
    /// surface forms.
    pub fn stemmed_vocabulary(&self) -> bool {
        !matches!(self, OracleSpec::Vectors(_))
    }
}

impl FromStr for OracleSpec {
    type Err = TfcatError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s.is_empty() {
            return Ok(OracleSpec::None);
        }
        match s.split_once(':') {
            Some((kind, path)) if !path.is_empty() => match kind.to_ascii_lowercase().as_str() {
                "table" => Ok(OracleSpec::Table(PathBuf::from(path))),
                "vectors" => Ok(OracleSpec::Vectors(PathBuf::from(path))),
                other => Err(TfcatError::invalid_parameter(format!(
                    "unknown similarity backend {other:?} (expected table or vectors)"
                ))),
            },
            _ => Err(TfcatError::invalid_parameter(format!(
                "similarity must be none, table:PATH or vectors:PATH, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for OracleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleSpec::None => write!(f, "none"),
            OracleSpec::Table(path) => write!(f, "table:{}", path.display()),
            OracleSpec::Vectors(path) => write!(f, "vectors:{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_spec() {
        assert_eq!("none".parse::<OracleSpec>().unwrap(), OracleSpec::None);
        assert_eq!(
            "table:sims.csv".parse::<OracleSpec>().unwrap(),
            OracleSpec::Table(PathBuf::from("sims.csv"))
        );
        assert_eq!(
            "Vectors:/data/vec.txt".parse::<OracleSpec>().unwrap(),
            OracleSpec::Vectors(PathBuf::from("/data/vec.txt"))
        );
        assert!("fasttext:model.bin".parse::<OracleSpec>().is_err());
        assert!("table:".parse::<OracleSpec>().is_err());
        assert!("vectors".parse::<OracleSpec>().is_err());
    }

    #[test]
    fn test_stemmed_vocabulary() {
        assert!(OracleSpec::None.stemmed_vocabulary());
        assert!(OracleSpec::Table(PathBuf::from("sims.csv")).stemmed_vocabulary());
        assert!(!OracleSpec::Vectors(PathBuf::from("vec.txt")).stemmed_vocabulary());
    }

    #[test]
    fn test_display_round_trip() {
        let spec = OracleSpec::Table(PathBuf::from("sims.csv"));
        assert_eq!(spec.to_string().parse::<OracleSpec>().unwrap(), spec);
    }

    #[test]
    fn test_load_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "crash,hang,0.9").unwrap();
        file.flush().unwrap();

        let oracle = OracleSpec::Table(file.path().to_path_buf())
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(oracle.name(), "similarity_table");
        assert_eq!(oracle.similar("hang").unwrap().unwrap().count(), 1);

        assert!(OracleSpec::None.load().unwrap().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let spec = OracleSpec::Vectors(PathBuf::from("/nonexistent/vectors.txt"));
        assert!(matches!(spec.load(), Err(TfcatError::Io(_))));
    }
}
