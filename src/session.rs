//! Long-lived classification state for interactive callers.
//!
//! A [`Session`] owns the text context, the current model, the current
//! similarity oracle and the classification knobs. Models and oracles are
//! swapped by moving new values in; a failed load or classification leaves
//! the previous state untouched.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::analysis::TextContext;
use crate::classify::{Classification, ClassifyOptions, SimilarityOracle, classify};
use crate::error::{Result, TfcatError};
use crate::loader::{LoadHandle, spawn_load};
use crate::model::{TfIdfModel, build_model, load_labeled_csv, load_model};
use crate::similarity::OracleSpec;

/// Boxed oracle as produced by background loads.
pub type BoxedOracle = Box<dyn SimilarityOracle>;

/// Owned model, oracle and options.
pub struct Session {
    ctx: TextContext,
    model: Option<TfIdfModel>,
    oracle: Option<BoxedOracle>,
    options: ClassifyOptions,
}

impl Session {
    /// Session without a model or oracle.
    pub fn new(ctx: TextContext) -> Self {
        Session {
            ctx,
            model: None,
            oracle: None,
            options: ClassifyOptions::default(),
        }
    }

    /// Session around an already built model.
    pub fn with_model(ctx: TextContext, model: TfIdfModel) -> Self {
        let mut session = Self::new(ctx);
        session.model = Some(model);
        session
    }

    pub fn context(&self) -> &TextContext {
        &self.ctx
    }

    pub fn model(&self) -> Option<&TfIdfModel> {
        self.model.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn oracle(&self) -> Option<&dyn SimilarityOracle> {
        self.oracle.as_deref()
    }

    pub fn oracle_name(&self) -> Option<&str> {
        self.oracle.as_ref().map(|oracle| oracle.name())
    }

    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Replace the classification options after validating them.
    pub fn set_options(&mut self, options: ClassifyOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Install `model`, returning the one it replaces.
    pub fn replace_model(&mut self, model: TfIdfModel) -> Option<TfIdfModel> {
        info!("installing model with {} categories", model.num_categories());
        self.model.replace(model)
    }

    /// Install `oracle` (or none), returning the one it replaces.
    pub fn replace_oracle(&mut self, oracle: Option<BoxedOracle>) -> Option<BoxedOracle> {
        match &oracle {
            Some(new) => info!("switching similarity oracle to {}", new.name()),
            None => info!("disabling similarity expansion"),
        }
        std::mem::replace(&mut self.oracle, oracle)
    }

    /// Load a persisted model from `dir` on the calling thread.
    pub fn load_model<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let model = load_model(dir)?;
        self.replace_model(model);
        Ok(())
    }

    /// Start loading a persisted model in the background.
    pub fn spawn_model_load<P: Into<PathBuf>>(dir: P) -> Result<LoadHandle<TfIdfModel>> {
        let dir = dir.into();
        spawn_load(format!("model {}", dir.display()), move || load_model(&dir))
    }

    /// Start building a model from a labeled CSV file in the background,
    /// analyzing with a copy of this session's text context. Install the
    /// result with [`Session::finish_model_load`].
    pub fn spawn_model_build<P: Into<PathBuf>>(
        &self,
        path: P,
        filter_threshold: f64,
    ) -> Result<LoadHandle<TfIdfModel>> {
        let path = path.into();
        let ctx = self.ctx.clone();
        spawn_load(format!("model build {}", path.display()), move || {
            let model = build_model(&ctx, load_labeled_csv(&path)?, filter_threshold)?;
            info!(
                "built model with {} categories from {}",
                model.num_categories(),
                path.display()
            );
            Ok(model)
        })
    }

    /// Start loading a similarity backend in the background.
    pub fn spawn_oracle_load(spec: OracleSpec) -> Result<LoadHandle<Option<BoxedOracle>>> {
        spawn_load(format!("oracle {spec}"), move || spec.load())
    }

    /// Wait for a background model load and install its result.
    pub fn finish_model_load(&mut self, handle: LoadHandle<TfIdfModel>) -> Result<()> {
        let model = handle.wait().inspect_err(|e| warn!("keeping previous model: {e}"))?;
        self.replace_model(model);
        Ok(())
    }

    /// Wait for a background oracle load and install its result.
    pub fn finish_oracle_load(&mut self, handle: LoadHandle<Option<BoxedOracle>>) -> Result<()> {
        let oracle = handle
            .wait()
            .inspect_err(|e| warn!("keeping previous oracle: {e}"))?;
        self.replace_oracle(oracle);
        Ok(())
    }

    /// Install a background oracle load if it has finished.
    ///
    /// Returns `None` while the load is still running.
    pub fn poll_oracle_load(
        &mut self,
        handle: &mut LoadHandle<Option<BoxedOracle>>,
    ) -> Option<Result<()>> {
        let result = handle.try_take()?;
        Some(match result {
            Ok(oracle) => {
                self.replace_oracle(oracle);
                Ok(())
            }
            Err(e) => {
                warn!("keeping previous oracle: {e}");
                Err(e)
            }
        })
    }

    /// Classify with the session's options.
    pub fn classify(&self, text: &str) -> Result<Classification> {
        self.classify_with(text, &self.options)
    }

    /// Classify with explicit options.
    pub fn classify_with(&self, text: &str, options: &ClassifyOptions) -> Result<Classification> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| TfcatError::resource_unavailable("no model loaded"))?;
        classify(&self.ctx, model, text, self.oracle.as_deref(), options)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ctx", &self.ctx)
            .field("categories", &self.model.as_ref().map(|m| m.num_categories()))
            .field("oracle", &self.oracle_name())
            .field("options", &self.options)
            .finish()
    }
}
