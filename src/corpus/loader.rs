// Corpus loader — reads a directory tree of clusters and documents.
//
// Layout: <root>/<cluster>/<document>, one sentence per line, markup already
// stripped. Hidden entries (leading '.') and editor backups (trailing '~')
// are ignored. Entries are visited in name order so type ids and the
// sampler's traversal order are the same on every run.
//
// A missing or unreadable root is fatal. A single unreadable cluster
// directory or document file is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::vocab::Vocabulary;
use super::{Cluster, Corpus, DocId, Document};

/// Load every cluster under `root`, interning words into `vocab`.
pub fn load_corpus(root: &Path, vocab: &mut Vocabulary) -> Result<Corpus> {
    let cluster_dirs = sorted_entries(root)
        .with_context(|| format!("Failed to read corpus directory {}", root.display()))?;

    let mut clusters = Vec::new();
    for dir in cluster_dirs {
        if !dir.is_dir() {
            debug!(path = %dir.display(), "Skipping non-directory entry in corpus root");
            continue;
        }
        let cluster_index = clusters.len();
        match load_cluster(&dir, cluster_index, vocab) {
            Ok(cluster) => clusters.push(cluster),
            Err(e) => warn!(path = %dir.display(), error = %e, "Skipping unreadable cluster"),
        }
    }

    let corpus = Corpus::new(clusters);
    info!(
        clusters = corpus.clusters().len(),
        documents = corpus.document_count(),
        sentences = corpus.sentence_count(),
        types = vocab.type_count(),
        "Loaded corpus"
    );
    Ok(corpus)
}

/// Load one cluster directory. Documents that cannot be read are skipped.
pub fn load_cluster(dir: &Path, cluster_index: usize, vocab: &mut Vocabulary) -> Result<Cluster> {
    let files = sorted_entries(dir)
        .with_context(|| format!("Failed to read cluster directory {}", dir.display()))?;

    let mut documents = Vec::new();
    for file in files {
        if !file.is_file() {
            continue;
        }
        let id = DocId {
            cluster: cluster_index,
            document: documents.len(),
        };
        match load_document(&file, id, vocab) {
            Ok(doc) => documents.push(doc),
            Err(e) => warn!(path = %file.display(), error = %e, "Skipping unreadable document"),
        }
    }

    Ok(Cluster::new(file_name(dir), documents))
}

/// Read a single document file. Invalid UTF-8 is replaced rather than rejected.
pub fn load_document(path: &Path, id: DocId, vocab: &mut Vocabulary) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(Document::from_text(file_name(path), id, &text, vocab))
}

/// Whether the loader should ignore an entry with this file name.
pub fn is_ignored(name: &str) -> bool {
    name.is_empty() || name.starts_with('.') || name.ends_with('~')
}

/// Non-ignored entries of `dir`, sorted by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if is_ignored(&name.to_string_lossy()) {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
