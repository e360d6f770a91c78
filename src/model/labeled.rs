//! Reading labeled training data from CSV.
//!
//! The first row names the columns; `Category` and `message` are picked out
//! by name (case-insensitively) and all other columns are ignored:
//!
//! ```csv
//! id,Category,message
//! 1,Bug,crash on startup
//! 2,Feature,add dark mode
//! ```
//!
//! A missing column is not an error here. Each record then lacks the field
//! and the model builder reports it with the record's index.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::error::{Result, TfcatError};
use crate::model::types::LabeledDocument;

const CATEGORY_COLUMN: &str = "Category";
const MESSAGE_COLUMN: &str = "message";

/// Configurable CSV reader producing [`LabeledDocument`]s.
#[derive(Clone, Debug)]
pub struct LabeledCsvReader {
    delimiter: u8,
    trim: bool,
    flexible: bool,
}

impl Default for LabeledCsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LabeledCsvReader {
    /// Comma-delimited, trimmed, strict field counts.
    pub fn new() -> Self {
        LabeledCsvReader {
            delimiter: b',',
            trim: true,
            flexible: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Open `path` and read its header row.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<LabeledRecords<File>> {
        self.read(File::open(path)?)
    }

    /// Read labeled records from any reader.
    pub fn read<R: Read>(&self, input: R) -> Result<LabeledRecords<R>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(self.flexible)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(TfcatError::malformed("CSV header is empty"));
        }

        Ok(LabeledRecords {
            category: column(&headers, CATEGORY_COLUMN),
            message: column(&headers, MESSAGE_COLUMN),
            records: reader.into_records(),
        })
    }
}

/// Streaming iterator over the records of a labeled CSV file.
pub struct LabeledRecords<R> {
    records: StringRecordsIntoIter<R>,
    category: Option<usize>,
    message: Option<usize>,
}

impl<R: Read> Iterator for LabeledRecords<R> {
    type Item = Result<LabeledDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).map(str::to_string);
        Some(Ok(LabeledDocument {
            category: field(self.category),
            message: field(self.message),
        }))
    }
}

/// Open a comma-delimited labeled CSV file with default settings.
pub fn load_labeled_csv<P: AsRef<Path>>(path: P) -> Result<LabeledRecords<File>> {
    LabeledCsvReader::new().read_path(path)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .or_else(|| headers.iter().position(|header| header.eq_ignore_ascii_case(name)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn read_all(input: &str) -> Result<Vec<LabeledDocument>> {
        LabeledCsvReader::new().read(input.as_bytes())?.collect()
    }

    #[test]
    fn test_reads_named_columns() {
        let docs = read_all("id,Category,message\n1,Bug,crash on startup\n2,Feature, add dark mode \n")
            .unwrap();
        assert_eq!(
            docs,
            vec![
                LabeledDocument::new("Bug", "crash on startup"),
                LabeledDocument::new("Feature", "add dark mode"),
            ]
        );
    }

    #[test]
    fn test_case_insensitive_headers() {
        let docs = read_all("MESSAGE,category\nhello,Greeting\n").unwrap();
        assert_eq!(docs, vec![LabeledDocument::new("Greeting", "hello")]);
    }

    #[test]
    fn test_missing_column_yields_missing_field() {
        let docs = read_all("Category,text\nBug,crash\n").unwrap();
        assert_eq!(docs[0].category.as_deref(), Some("Bug"));
        assert!(docs[0].message.is_none());
    }

    #[test]
    fn test_empty_message_is_present() {
        let docs = read_all("Category,message\nBug,\n").unwrap();
        assert_eq!(docs[0].message.as_deref(), Some(""));
    }

    #[test]
    fn test_quoted_fields() {
        let docs = read_all("Category,message\nBug,\"crash, then freeze\"\n").unwrap();
        assert_eq!(docs[0].message.as_deref(), Some("crash, then freeze"));
    }

    #[test]
    fn test_ragged_row_is_error() {
        let result = read_all("Category,message\nBug,crash,extra\n");
        assert!(matches!(result, Err(TfcatError::Csv(_))));
    }

    #[test]
    fn test_custom_delimiter() {
        let docs = LabeledCsvReader::new()
            .with_delimiter(b';')
            .read("Category;message\nBug;crash, freeze\n".as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(docs[0].message.as_deref(), Some("crash, freeze"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Category,message").unwrap();
        writeln!(file, "Question,how do I configure the proxy").unwrap();
        file.flush().unwrap();

        let docs: Vec<_> = load_labeled_csv(file.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].category.as_deref(), Some("Question"));
    }
}
