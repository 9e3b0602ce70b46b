// Summarization — turns a fitted sampler into one ordered summary per cluster.

pub mod divergence;
pub mod ordering;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, DocId};
use crate::model::distribution::Distribution;
use crate::model::sampler::Sampler;
use divergence::{
    BackgroundBackoff, ConstantBackoff, DivergenceScorer, DocumentContrast, ScoringStrategy,
};
use ordering::order_by_position;
use selector::{SentenceSelector, SummarizeError, DEFAULT_SUMMARY_WORDS};

/// Knobs for building the scoring distributions and the selector.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub strategy: ScoringStrategy,
    /// Smoothing for the cluster content distribution (kept tiny so unseen words stay near zero)
    pub content_beta: f64,
    pub background_beta: f64,
    /// Smoothing for document distributions, used by document-contrast scoring
    pub document_beta: f64,
    /// Probability assumed for content words missing from the candidate summary
    pub backoff: f64,
    pub summary_words: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            strategy: ScoringStrategy::ConstantBackoff,
            content_beta: 0.001,
            background_beta: 1.0,
            document_beta: 1.0,
            backoff: 0.001,
            summary_words: DEFAULT_SUMMARY_WORDS,
        }
    }
}

/// A finished summary: sentence texts in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub name: String,
    pub word_count: usize,
    pub sentences: Vec<String>,
}

impl ClusterSummary {
    /// Sentences one per line.
    pub fn text(&self) -> String {
        self.sentences.join("\n")
    }
}

/// Select and order the summary for cluster `cluster_index`.
pub fn summarize_cluster(
    corpus: &Corpus,
    sampler: &Sampler,
    cluster_index: usize,
    options: &SummaryOptions,
) -> Result<ClusterSummary, SummarizeError> {
    let cluster = corpus
        .cluster(cluster_index)
        .ok_or(SummarizeError::UnknownCluster(cluster_index))?;
    let content = sampler
        .content_distribution(cluster_index, options.content_beta)
        .ok_or(SummarizeError::UnknownCluster(cluster_index))?;
    let background = sampler.background_distribution(options.background_beta);

    let documents: Vec<Distribution> = match options.strategy {
        ScoringStrategy::DocumentContrast => (0..cluster.documents().len())
            .filter_map(|document| {
                sampler.document_distribution(
                    DocId {
                        cluster: cluster_index,
                        document,
                    },
                    options.document_beta,
                )
            })
            .collect(),
        _ => Vec::new(),
    };

    let scorer: Box<dyn DivergenceScorer + '_> = match options.strategy {
        ScoringStrategy::ConstantBackoff => Box::new(ConstantBackoff {
            content: &content,
            backoff: options.backoff,
        }),
        ScoringStrategy::BackgroundBackoff => Box::new(BackgroundBackoff {
            content: &content,
            background: &background,
        }),
        ScoringStrategy::DocumentContrast => Box::new(DocumentContrast {
            content: &content,
            documents: &documents,
            backoff: options.backoff,
        }),
    };

    let selection = SentenceSelector::new(options.summary_words).select(
        cluster,
        scorer.as_ref(),
        sampler.type_count(),
    );
    let ordered = order_by_position(selection.sentences, cluster);

    Ok(ClusterSummary {
        name: cluster.name().to_string(),
        word_count: selection.word_count,
        sentences: ordered.iter().map(|s| s.text().to_string()).collect(),
    })
}
