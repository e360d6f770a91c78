//! Saving and loading models as JSON.
//!
//! A model directory holds `term_frequencies.json` and
//! `doc_frequencies.json`, pretty-printed with four-space indentation. Keys
//! come out sorted because both tables are ordered maps.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::model::types::{DocumentFrequencyTable, TermFrequencyTable, TfIdfModel};

pub const TERM_FREQUENCIES_FILE: &str = "term_frequencies.json";
pub const DOC_FREQUENCIES_FILE: &str = "doc_frequencies.json";

/// Write both tables into `dir`, creating it if needed.
pub fn save_model<P: AsRef<Path>>(model: &TfIdfModel, dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_json(&dir.join(TERM_FREQUENCIES_FILE), model.term_frequencies())?;
    write_json(&dir.join(DOC_FREQUENCIES_FILE), model.doc_frequencies())?;

    info!(
        "saved model with {} categories and {} terms to {}",
        model.num_categories(),
        model.doc_frequencies().len(),
        dir.display()
    );
    Ok(())
}

/// Read both tables from `dir` and validate them.
///
/// A missing file surfaces as an I/O error of kind `NotFound`; inconsistent
/// tables fail with `MalformedInput`.
pub fn load_model<P: AsRef<Path>>(dir: P) -> Result<TfIdfModel> {
    let dir = dir.as_ref();
    let term_frequencies: TermFrequencyTable = read_json(&dir.join(TERM_FREQUENCIES_FILE))?;
    let doc_frequencies: DocumentFrequencyTable = read_json(&dir.join(DOC_FREQUENCIES_FILE))?;

    debug!(
        "loaded {} categories and {} terms from {}",
        term_frequencies.len(),
        doc_frequencies.len(),
        dir.display()
    );
    TfIdfModel::new(term_frequencies, doc_frequencies)
}

/// Whether `dir` contains both model files.
pub fn model_exists<P: AsRef<Path>>(dir: P) -> bool {
    let dir = dir.as_ref();
    dir.join(TERM_FREQUENCIES_FILE).is_file() && dir.join(DOC_FREQUENCIES_FILE).is_file()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
