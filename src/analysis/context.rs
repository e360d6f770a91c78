//! Explicit handle owning the text normalization resources.
//!
//! A [`TextContext`] is created once and passed by reference to the model
//! builder and the classifier. It chains a tokenizer with the lowercase,
//! segment, stop, alphanumeric and stem filters, in that order.
//!
//! # Examples
//!
//! ```
//! use tfcat::analysis::{AnalysisOptions, TextContext};
//!
//! let ctx = TextContext::builder().without_segmentation().build();
//! let terms = ctx.terms("The app crashed again!", AnalysisOptions::default()).unwrap();
//! assert_eq!(terms, vec!["app", "crash"]);
//! ```

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::analysis::segment::WordSegmenter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{
    AlphanumericFilter, Filter, LowercaseFilter, PorterStemmer, SegmentFilter, StemFilter,
    Stemmer, StopFilter,
};
use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;

/// Per-call switches for the optional pipeline stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Append dictionary sub-words of concatenated tokens.
    pub segment: bool,
    /// Reduce terms to their stems.
    pub stem: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            segment: true,
            stem: true,
        }
    }
}

/// Tokenizer, stopword list, stemmer and segmenter shared by builder and classifier.
#[derive(Clone)]
pub struct TextContext {
    tokenizer: Arc<dyn Tokenizer>,
    lowercase: LowercaseFilter,
    segment: Option<SegmentFilter>,
    stop: StopFilter,
    alphanumeric: AlphanumericFilter,
    stem: StemFilter,
}

impl TextContext {
    /// Context with the default resources: Unicode word tokenizer, English
    /// stopwords, Porter stemmer and the built-in segmentation dictionary.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TextContextBuilder {
        TextContextBuilder::default()
    }

    /// Normalize `text` into the terms counted by the model.
    ///
    /// The text is trimmed, tokenized and lowercased; then, depending on
    /// `options`, segmented, filtered and stemmed. Returns an empty vector
    /// for empty or stopword-only text.
    pub fn terms(&self, text: &str, options: AnalysisOptions) -> Result<Vec<String>> {
        let tokens = self.analyze(text, options)?;
        let terms: Vec<String> = tokens.map(|token| token.text).collect();
        trace!("analyzed {:?} into {} terms", text, terms.len());
        Ok(terms)
    }

    /// Run the pipeline and return the resulting token stream.
    pub fn analyze(&self, text: &str, options: AnalysisOptions) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text.trim())?;
        tokens = self.lowercase.filter(tokens)?;
        if options.segment
            && let Some(segment) = &self.segment
        {
            tokens = segment.filter(tokens)?;
        }
        tokens = self.stop.filter(tokens)?;
        tokens = self.alphanumeric.filter(tokens)?;
        if options.stem {
            tokens = self.stem.filter(tokens)?;
        }
        Ok(tokens)
    }

    /// Whether a segmenter is configured.
    pub fn can_segment(&self) -> bool {
        self.segment.is_some()
    }

    pub fn stop_filter(&self) -> &StopFilter {
        &self.stop
    }
}

impl Default for TextContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextContext")
            .field("tokenizer", &self.tokenizer.name())
            .field("segment", &self.segment.is_some())
            .field("stop_words", &self.stop.len())
            .field("stemmer", &self.stem.stemmer().name())
            .finish()
    }
}

/// Builder for [`TextContext`].
pub struct TextContextBuilder {
    tokenizer: Arc<dyn Tokenizer>,
    segmenter: Option<Arc<WordSegmenter>>,
    stop: StopFilter,
    stemmer: Arc<dyn Stemmer>,
}

impl Default for TextContextBuilder {
    fn default() -> Self {
        TextContextBuilder {
            tokenizer: Arc::new(UnicodeWordTokenizer::new()),
            segmenter: Some(Arc::new(WordSegmenter::new())),
            stop: StopFilter::new(),
            stemmer: Arc::new(PorterStemmer::new()),
        }
    }
}

impl TextContextBuilder {
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn segmenter(mut self, segmenter: Arc<WordSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Disable segmentation regardless of [`AnalysisOptions::segment`].
    pub fn without_segmentation(mut self) -> Self {
        self.segmenter = None;
        self
    }

    pub fn stop_filter(mut self, stop: StopFilter) -> Self {
        self.stop = stop;
        self
    }

    pub fn stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
        self.stemmer = stemmer;
        self
    }

    pub fn build(self) -> TextContext {
        TextContext {
            tokenizer: self.tokenizer,
            lowercase: LowercaseFilter::new(),
            segment: self.segmenter.map(SegmentFilter::with_segmenter),
            stop: self.stop,
            alphanumeric: AlphanumericFilter::new(),
            stem: StemFilter::with_stemmer(self.stemmer),
        }
    }
}
