use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topicsum::config::Config;
use topicsum::corpus::loader::load_corpus;
use topicsum::corpus::vocab::Vocabulary;
use topicsum::corpus::DocId;
use topicsum::output::terminal;
use topicsum::pipeline::run;

/// TopicSum: multi-document extractive summarization.
///
/// Fits a background / content / document topic model to a corpus of
/// document clusters, then picks the sentences that best match each
/// cluster's content topic.
#[derive(Parser)]
#[command(name = "topicsum", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and write one summary per cluster
    Summarize {
        /// Corpus root: one subdirectory per cluster, one file per document
        corpus: PathBuf,

        /// Number of Gibbs sampling sweeps (25-50 is usually enough)
        iterations: usize,

        /// Folder to write summaries into (summaries are always printed too)
        output_dir: Option<PathBuf>,

        /// Also save a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// RNG seed (overrides TOPICSUM_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Fit the model and show the most probable words of each topic
    Topics {
        corpus: PathBuf,

        iterations: usize,

        /// How many words to show per topic
        #[arg(long, default_value = "25")]
        top: usize,

        /// Which cluster's content and first-document topics to show
        #[arg(long, default_value = "0")]
        cluster: usize,

        /// RNG seed (overrides TOPICSUM_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show corpus statistics without fitting anything
    Stats {
        corpus: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicsum=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            corpus,
            iterations,
            output_dir,
            report,
            seed,
        } => {
            let config = load_config(seed)?;
            let result = run::run(
                &corpus,
                iterations,
                output_dir.as_deref(),
                report.as_deref(),
                &config,
            )?;

            println!();
            println!("{}", "done".bold());
            println!("  Clusters summarized: {}", result.clusters.len());
            println!("  Seed: {}", result.seed);
            if let Some(path) = &report {
                println!("  Report: {}", path.display());
            }
        }

        Commands::Topics {
            corpus,
            iterations,
            top,
            cluster,
            seed,
        } => {
            let config = load_config(seed)?;
            let model = run::fit(&corpus, iterations, &config)?;
            let h = *model.sampler.hyperparameters();

            let Some(cluster_name) = model.corpus.cluster(cluster).map(|c| c.name().to_string())
            else {
                anyhow::bail!(
                    "Cluster index {cluster} out of range (corpus has {} clusters)",
                    model.corpus.clusters().len()
                );
            };

            terminal::display_top_words(
                &format!("Top {top} background words:"),
                &model.sampler.background_distribution(h.beta_background),
                &model.vocab,
                top,
            );
            if let Some(dist) = model.sampler.content_distribution(cluster, h.beta_content) {
                terminal::display_top_words(
                    &format!("Top {top} content words for {cluster_name}:"),
                    &dist,
                    &model.vocab,
                    top,
                );
            }
            let first_doc = DocId {
                cluster,
                document: 0,
            };
            if let (Some(dist), Some(doc)) = (
                model.sampler.document_distribution(first_doc, h.beta_document),
                model.corpus.document(first_doc),
            ) {
                terminal::display_top_words(
                    &format!("Top {top} words for {cluster_name}/{}:", doc.name()),
                    &dist,
                    &model.vocab,
                    top,
                );
            }
        }

        Commands::Stats { corpus } => {
            let mut vocab = Vocabulary::new();
            let loaded = load_corpus(&corpus, &mut vocab)?;
            topicsum::status::show(&loaded, &vocab, &corpus.display().to_string());
        }
    }

    Ok(())
}

/// Load and validate configuration, letting a CLI seed override the environment.
fn load_config(seed: Option<u64>) -> Result<Config> {
    let mut config = Config::load()?;
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    info!(
        strategy = ?config.summary.strategy,
        summary_words = config.summary.summary_words,
        log_every = config.log_every,
        "Loaded configuration"
    );
    Ok(config)
}
