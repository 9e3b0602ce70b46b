// Corpus statistics display — cluster, document, sentence, and token counts.

use colored::Colorize;

use crate::corpus::vocab::Vocabulary;
use crate::corpus::Corpus;
use crate::output::truncate_chars;

/// Per-cluster counts shown by `topicsum stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub name: String,
    pub documents: usize,
    pub sentences: usize,
    pub tokens: usize,
}

/// Count documents, sentences, and tokens for every cluster.
pub fn cluster_stats(corpus: &Corpus) -> Vec<ClusterStats> {
    corpus
        .clusters()
        .iter()
        .map(|c| ClusterStats {
            name: c.name().to_string(),
            documents: c.documents().len(),
            sentences: c.sentences().count(),
            tokens: c.sentences().map(|s| s.len()).sum(),
        })
        .collect()
}

/// Display corpus statistics to the terminal.
pub fn show(corpus: &Corpus, vocab: &Vocabulary, corpus_display_path: &str) {
    println!("Corpus: {corpus_display_path}");

    if corpus.is_empty() {
        println!("  {}", "No sentences found.".yellow());
        println!("  Expected one subdirectory per cluster, one text file per document.");
        return;
    }

    println!(
        "  {} clusters, {} documents, {} sentences, {} tokens",
        corpus.clusters().len(),
        corpus.document_count(),
        corpus.sentence_count(),
        corpus.token_count()
    );
    println!("  Vocabulary: {} word types", vocab.type_count());
    println!();

    println!(
        "  {:<24} {:>6} {:>9} {:>8}  {}",
        "Cluster".dimmed(),
        "Docs".dimmed(),
        "Sentences".dimmed(),
        "Tokens".dimmed(),
        "First sentence".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for (stats, cluster) in cluster_stats(corpus).iter().zip(corpus.clusters()) {
        let preview = cluster
            .sentences()
            .next()
            .map(|s| truncate_chars(s.text(), 40))
            .unwrap_or_default();
        println!(
            "  {:<24} {:>6} {:>9} {:>8}  {}",
            truncate_chars(&stats.name, 24),
            stats.documents,
            stats.sentences,
            stats.tokens,
            preview.dimmed()
        );
    }
}
