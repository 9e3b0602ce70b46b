// Corpus model — Cluster → Document → Sentence → tokens.
//
// Built once from the loader (or from in-memory text) before any topic counts
// exist. After construction the only mutable state is each sentence's
// per-token topic labels, which the sampler rewrites on every sweep.

pub mod loader;
pub mod vocab;

use crate::model::topic::TopicLabel;
use vocab::Vocabulary;

/// Stable handle for a document: its cluster index and its index within the cluster.
///
/// Sentences carry one of these instead of a pointer back to their document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId {
    pub cluster: usize,
    pub document: usize,
}

/// A sentence: original text plus parallel word-type and topic-label arrays.
#[derive(Debug, Clone)]
pub struct Sentence {
    text: String,
    /// Ordinal of this sentence within its document
    position: usize,
    doc: DocId,
    tokens: Vec<usize>,
    labels: Vec<TopicLabel>,
    /// How many tokens currently carry each label, indexed by `TopicLabel::index`
    label_counts: [usize; TopicLabel::COUNT],
}

impl Sentence {
    /// Create a sentence with every token labeled BACKGROUND.
    pub fn new(text: impl Into<String>, position: usize, doc: DocId, tokens: Vec<usize>) -> Self {
        let mut label_counts = [0; TopicLabel::COUNT];
        label_counts[TopicLabel::Background.index()] = tokens.len();
        Self {
            text: text.into(),
            position,
            doc,
            labels: vec![TopicLabel::Background; tokens.len()],
            tokens,
            label_counts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn doc(&self) -> DocId {
        self.doc
    }

    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    /// Word type of token `i`.
    pub fn word(&self, i: usize) -> usize {
        self.tokens[i]
    }

    pub fn label(&self, i: usize) -> TopicLabel {
        self.labels[i]
    }

    pub fn labels(&self) -> &[TopicLabel] {
        &self.labels
    }

    /// Relabel token `i`, keeping the per-label counts in step.
    pub fn set_label(&mut self, i: usize, label: TopicLabel) {
        let previous = self.labels[i];
        self.label_counts[previous.index()] -= 1;
        self.labels[i] = label;
        self.label_counts[label.index()] += 1;
    }

    /// Number of tokens currently labeled `label`.
    pub fn label_count(&self, label: TopicLabel) -> usize {
        self.label_counts[label.index()]
    }

    /// Number of word tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One source document, identified by its file name.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(name: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        Self {
            name: name.into(),
            sentences,
        }
    }

    /// Build a document from raw text, one sentence per line.
    ///
    /// Blank lines and lines with no surviving words are skipped and do not
    /// consume a sentence position.
    pub fn from_text(name: impl Into<String>, doc: DocId, text: &str, vocab: &mut Vocabulary) -> Self {
        let mut sentences = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let tokens = vocab.tokenize(line);
            if tokens.is_empty() {
                continue;
            }
            let position = sentences.len();
            sentences.push(Sentence::new(line, position, doc, tokens));
        }
        Self::new(name, sentences)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentences_mut(&mut self) -> &mut [Sentence] {
        &mut self.sentences
    }

    pub fn sentence(&self, i: usize) -> Option<&Sentence> {
        self.sentences.get(i)
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// A named group of documents to be summarized together.
#[derive(Debug, Clone)]
pub struct Cluster {
    name: String,
    documents: Vec<Document>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    pub fn document(&self, i: usize) -> Option<&Document> {
        self.documents.get(i)
    }

    /// Every sentence in the cluster, in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.documents.iter().flat_map(|d| d.sentences.iter())
    }
}

/// The full corpus: an ordered list of clusters.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    clusters: Vec<Cluster>,
}

impl Corpus {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Build a corpus from in-memory `(cluster, [(document, text)])` pairs.
    pub fn from_texts<C, D>(clusters: C, vocab: &mut Vocabulary) -> Self
    where
        C: IntoIterator<Item = (String, D)>,
        D: IntoIterator<Item = (String, String)>,
    {
        let clusters = clusters
            .into_iter()
            .enumerate()
            .map(|(ci, (cluster_name, docs))| {
                let documents = docs
                    .into_iter()
                    .enumerate()
                    .map(|(di, (doc_name, text))| {
                        let id = DocId {
                            cluster: ci,
                            document: di,
                        };
                        Document::from_text(doc_name, id, &text, vocab)
                    })
                    .collect();
                Cluster::new(cluster_name, documents)
            })
            .collect();
        Self::new(clusters)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn clusters_mut(&mut self) -> &mut [Cluster] {
        &mut self.clusters
    }

    pub fn cluster(&self, i: usize) -> Option<&Cluster> {
        self.clusters.get(i)
    }

    /// Resolve a document handle.
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.clusters.get(id.cluster)?.document(id.document)
    }

    pub fn document_count(&self) -> usize {
        self.clusters.iter().map(|c| c.documents.len()).sum()
    }

    pub fn sentence_count(&self) -> usize {
        self.clusters.iter().map(|c| c.sentences().count()).sum()
    }

    pub fn token_count(&self) -> usize {
        self.clusters
            .iter()
            .flat_map(|c| c.sentences())
            .map(Sentence::len)
            .sum()
    }

    /// True when the corpus holds no sentences at all.
    pub fn is_empty(&self) -> bool {
        self.sentence_count() == 0
    }
}
