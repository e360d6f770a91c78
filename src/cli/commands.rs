//! Command implementations for the tfcat CLI.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TfcatConfig;
use crate::error::Result;
use crate::evaluate::{SweepGrid, sweep};
use crate::model::{
    LabeledDocument, TfIdfModel, generate_frequencies, generate_frequencies_parallel,
    load_labeled_csv, save_model,
};
use crate::session::Session;

/// Execute a CLI command.
pub fn execute_command(args: TfcatArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Build(build_args) => build(build_args, config, &args),
        Command::Classify(classify_args) => classify_text(classify_args, config, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, config, &args),
    }
}

fn load_config(args: &TfcatArgs) -> Result<TfcatConfig> {
    match &args.config {
        Some(path) => TfcatConfig::load(path),
        None => Ok(TfcatConfig::default()),
    }
}

/// Build a model from labeled CSV data and persist it.
fn build(args: &BuildArgs, mut config: TfcatConfig, cli_args: &TfcatArgs) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.filter_threshold = threshold;
    }
    if let Some(out) = &args.out {
        config.model_dir = out.clone();
    }
    config.validate()?;

    let ctx = config.text_context()?;
    let started = Instant::now();
    info!("building model from {}", args.input.display());

    let model = if args.parallel {
        let documents = read_documents(&args.input)?;
        let (tf, df) = generate_frequencies_parallel(&ctx, &documents, config.filter_threshold)?;
        TfIdfModel::new(tf, df)?
    } else {
        let (tf, df) =
            generate_frequencies(&ctx, load_labeled_csv(&args.input)?, config.filter_threshold)?;
        TfIdfModel::new(tf, df)?
    };

    std::fs::create_dir_all(&config.model_dir)?;
    save_model(&model, &config.model_dir)?;

    let summary = BuildSummary {
        input: args.input.display().to_string(),
        model_dir: config.model_dir.display().to_string(),
        documents: model.term_frequencies().values().map(|c| c.num_docs).sum(),
        categories: model.num_categories(),
        terms: model.doc_frequencies().len(),
        kept_terms: model
            .term_frequencies()
            .values()
            .map(|c| c.term_counts.len())
            .sum(),
        filter_threshold: config.filter_threshold,
        duration_ms: started.elapsed().as_millis() as u64,
    };
    output_result("Model built", &summary, cli_args)
}

/// Classify a single message against a persisted model.
fn classify_text(args: &ClassifyArgs, mut config: TfcatConfig, cli_args: &TfcatArgs) -> Result<()> {
    if let Some(model) = &args.model {
        config.model_dir = model.clone();
    }
    if let Some(similarity) = &args.similarity {
        config.similarity = similarity.clone();
    }
    if let Some(num_similar) = args.num_similar {
        config.num_similar = num_similar;
    }
    if let Some(min_similarity) = args.min_similarity {
        config.min_similarity = min_similarity;
    }
    config.segment |= args.segment;
    apply_stemming_flags(&mut config, args.stemmed, args.unstemmed);
    config.validate()?;

    // Model and oracle load side by side.
    let model_load = Session::spawn_model_load(&config.model_dir)?;
    let oracle_load = Session::spawn_oracle_load(config.oracle_spec()?)?;

    let mut session = Session::new(config.text_context()?);
    session.set_options(config.classify_options())?;
    session.finish_model_load(model_load)?;
    session.finish_oracle_load(oracle_load)?;
    debug!("{session:?}");

    let result = session.classify(&args.text)?;
    let output = ClassificationOutput {
        text: args.text.clone(),
        category: result.category,
        score: result.score,
        similarity: session.oracle_name().map(str::to_string),
    };
    output_result("Classification", &output, cli_args)
}

fn evaluate(args: &EvaluateArgs, config: TfcatConfig, cli_args: &TfcatArgs) -> Result<()> {
    let report = run_evaluation(args, config)?;
    output_result("Evaluation", &report, cli_args)
}

/// Build a model from labeled data and sweep classification parameters
/// over the same data.
fn run_evaluation(args: &EvaluateArgs, mut config: TfcatConfig) -> Result<EvaluationReport> {
    if let Some(similarity) = &args.similarity {
        config.similarity = similarity.clone();
    }
    if let Some(threshold) = args.threshold {
        config.filter_threshold = threshold;
    }
    config.segment |= args.segment;
    apply_stemming_flags(&mut config, args.stemmed, args.unstemmed);
    config.validate()?;
    let stemmed_database = config.stemmed_database();

    let num_similar = SweepGrid::parse_num_similar(&args.num_similar_range)?;
    let (min_similarity, step) = SweepGrid::parse_min_similarity(&args.min_similarity_range)?;
    let grid = SweepGrid::from_ranges(num_similar, min_similarity, step)?;

    let spec = config.oracle_spec()?;
    let oracle_load = Session::spawn_oracle_load(spec.clone())?;

    let ctx = config.text_context()?;
    let documents = read_documents(&args.input)?;
    let (tf, df) = generate_frequencies_parallel(&ctx, &documents, config.filter_threshold)?;
    let model = TfIdfModel::new(tf, df)?;
    let oracle = oracle_load.wait()?;

    let rows = sweep(
        &ctx,
        &model,
        &documents,
        oracle.as_deref(),
        stemmed_database,
        config.segment,
        &grid,
    )?;

    Ok(EvaluationReport {
        input: args.input.display().to_string(),
        documents: documents.len(),
        filter_threshold: config.filter_threshold,
        similarity: spec.to_string(),
        stemmed_database,
        rows,
    })
}

fn apply_stemming_flags(config: &mut TfcatConfig, stemmed: bool, unstemmed: bool) {
    if unstemmed {
        config.stemmed_database = Some(false);
    } else if stemmed {
        config.stemmed_database = Some(true);
    }
}

fn read_documents(path: &Path) -> Result<Vec<LabeledDocument>> {
    load_labeled_csv(path)?.collect()
}
