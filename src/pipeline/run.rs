// End-to-end run: load → fit → summarize → emit.
//
// Loading and fitting are shared by the `summarize` and `topics` commands.
// A cluster that cannot be summarized is logged and left out; the rest of
// the run continues.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::corpus::loader::load_corpus;
use crate::corpus::vocab::Vocabulary;
use crate::corpus::Corpus;
use crate::model::sampler::{EstimateReport, Hyperparameters, LikelihoodPoint, Sampler};
use crate::model::traits::SeededSource;
use crate::output::{files, terminal};
use crate::summarize::{summarize_cluster, ClusterSummary, SummaryOptions};

/// A corpus with its fitted topic assignments.
pub struct FittedModel {
    pub corpus: Corpus,
    pub vocab: Vocabulary,
    pub sampler: Sampler,
    pub estimate: EstimateReport,
    pub seed: u64,
}

/// Everything a `summarize` run produced, for the optional JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub corpus: PathBuf,
    pub seed: u64,
    pub iterations: usize,
    pub hyperparameters: Hyperparameters,
    pub trace: Vec<LikelihoodPoint>,
    pub final_loglikelihood: f64,
    pub clusters: Vec<ClusterSummary>,
}

/// Load a corpus and its vocabulary, refusing an empty corpus.
pub fn load(corpus_path: &Path) -> Result<(Corpus, Vocabulary)> {
    let mut vocab = Vocabulary::new();
    let corpus = load_corpus(corpus_path, &mut vocab)?;
    if corpus.is_empty() {
        anyhow::bail!(
            "No sentences found under {}.\n\
             Expected one subdirectory per cluster, each holding one text file per document.",
            corpus_path.display()
        );
    }
    Ok((corpus, vocab))
}

/// Load `corpus_path` and run the sampler for `iterations` sweeps plus the decoding sweep.
pub fn fit(corpus_path: &Path, iterations: usize, config: &Config) -> Result<FittedModel> {
    let (mut corpus, vocab) = load(corpus_path)?;

    let mut rng = match config.seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    let seed = rng.seed();
    info!(seed, iterations, "Fitting topic model");

    println!("Building the model...");
    let mut sampler = Sampler::initialize(
        &mut corpus,
        vocab.type_count(),
        config.hyperparameters,
        &mut rng,
    );

    let pb = ProgressBar::new(iterations as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Sampling [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let mut stdout = io::stdout();
    if config.log_every > 0 {
        print_above(&pb, &mut stdout, &terminal::likelihood_header());
    }

    let estimate = sampler.estimate(&mut corpus, &mut rng, iterations, config.log_every, |progress| {
        pb.inc(1);
        if let Some(row) = terminal::sweep_row(progress) {
            print_above(&pb, &mut stdout, &row);
        }
    });
    pb.finish_and_clear();
    terminal::display_estimate(&estimate);

    Ok(FittedModel {
        corpus,
        vocab,
        sampler,
        estimate,
        seed,
    })
}

/// Write `line` to `out` with the progress bar cleared around it.
///
/// Goes through `suspend` rather than `ProgressBar::println`, which prints
/// nothing while the bar is hidden (stderr not a terminal).
fn print_above<W: Write>(pb: &ProgressBar, out: &mut W, line: &str) {
    if let Err(e) = pb.suspend(|| writeln!(out, "{line}")) {
        warn!(error = %e, "Failed to print likelihood row");
    }
}

/// Summarize every cluster. Clusters that cannot be summarized are skipped.
pub fn summarize_all(model: &FittedModel, options: &SummaryOptions) -> Vec<ClusterSummary> {
    let mut summaries = Vec::with_capacity(model.corpus.clusters().len());
    for ci in 0..model.corpus.clusters().len() {
        match summarize_cluster(&model.corpus, &model.sampler, ci, options) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                warn!(cluster = ci, error = %e, "Summarization aborted for cluster");
                println!("Error: {e}");
            }
        }
    }
    summaries
}

/// The `summarize` command: fit, select, print, and optionally write files.
pub fn run(
    corpus_path: &Path,
    iterations: usize,
    output_dir: Option<&Path>,
    report_path: Option<&Path>,
    config: &Config,
) -> Result<RunReport> {
    // Settle the output folder before the (long) sampling run
    let output_dir = output_dir.and_then(files::prepare_output_dir);

    let model = fit(corpus_path, iterations, config)?;

    println!("Writing summaries");
    let summaries = summarize_all(&model, &config.summary);
    for summary in &summaries {
        if let Some(dir) = &output_dir {
            if let Err(e) = files::write_summary(dir, summary) {
                warn!(cluster = %summary.name, error = %e, "Failed to write summary file");
            }
        }
        terminal::display_summary(summary);
    }

    let report = RunReport {
        corpus: corpus_path.to_path_buf(),
        seed: model.seed,
        iterations,
        hyperparameters: *model.sampler.hyperparameters(),
        trace: model.estimate.trace.clone(),
        final_loglikelihood: model.estimate.final_loglikelihood,
        clusters: summaries,
    };

    if let Some(path) = report_path {
        files::write_report(path, &report)
            .with_context(|| format!("Failed to save run report to {}", path.display()))?;
        info!(path = %path.display(), "Saved run report");
    }

    Ok(report)
}
