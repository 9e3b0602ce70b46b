// Collapsed Gibbs sampler for the three-level TopicSum model.
//
// Every word token is explained by one of three topics: the corpus-wide
// background, its cluster's content topic, or its document's own topic.
// Each sentence has a Dirichlet-multinomial mixture over the three labels
// (concentrations alpha), and each scope has a Dirichlet-smoothed word
// distribution (pseudocounts beta). Both are integrated out, so the state is
// just the token labels plus the count vectors they imply.
//
// Traversal order is fixed (cluster, document, sentence, token) and one
// uniform draw is consumed per token on sampling sweeps, so a seeded run is
// reproducible exactly. The final decoding sweep draws nothing.

use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;
use tracing::{debug, info};

use super::distribution::Distribution;
use super::topic::{TopicCounts, TopicLabel};
use super::traits::UniformSource;
use crate::corpus::{Corpus, DocId, Sentence};

/// Dirichlet hyperparameters of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Prior weight of BACKGROUND in every sentence's topic mixture
    pub alpha_background: f64,
    /// Prior weight of CONTENT in every sentence's topic mixture
    pub alpha_content: f64,
    /// Prior weight of DOCUMENT in every sentence's topic mixture
    pub alpha_document: f64,
    /// Word pseudocount for the background topic
    pub beta_background: f64,
    /// Word pseudocount for each cluster's content topic
    pub beta_content: f64,
    /// Word pseudocount for each document's topic
    pub beta_document: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha_background: 10.0,
            alpha_content: 1.0,
            alpha_document: 5.0,
            beta_background: 1.0,
            beta_content: 0.1,
            beta_document: 1.0,
        }
    }
}

impl Hyperparameters {
    pub fn alpha(&self, label: TopicLabel) -> f64 {
        match label {
            TopicLabel::Background => self.alpha_background,
            TopicLabel::Content => self.alpha_content,
            TopicLabel::Document => self.alpha_document,
        }
    }

    pub fn beta(&self, label: TopicLabel) -> f64 {
        match label {
            TopicLabel::Background => self.beta_background,
            TopicLabel::Content => self.beta_content,
            TopicLabel::Document => self.beta_document,
        }
    }

    pub fn alpha_sum(&self) -> f64 {
        self.alpha_background + self.alpha_content + self.alpha_document
    }
}

/// How a sweep chooses each token's new label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Draw from the full conditional (one uniform per token)
    Sample,
    /// Take the most probable label; no randomness consumed
    Decode,
}

/// Reported to the estimate observer after every sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepProgress {
    /// Zero-based sampling sweep, or the requested iteration count for the decoding sweep
    pub iteration: usize,
    pub mode: SweepMode,
    /// Present on sweeps where the log-likelihood was evaluated
    pub loglikelihood: Option<f64>,
}

/// One periodic log-likelihood reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodPoint {
    pub iteration: usize,
    pub loglikelihood: f64,
}

/// Outcome of `Sampler::estimate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateReport {
    pub trace: Vec<LikelihoodPoint>,
    /// Log-likelihood after the decoding sweep
    pub final_loglikelihood: f64,
}

/// Owner of all three scopes of topic counts.
#[derive(Debug, Clone)]
pub struct Sampler {
    hyper: Hyperparameters,
    type_count: usize,
    background: TopicCounts,
    /// One per cluster
    content: Vec<TopicCounts>,
    /// `documents[cluster][document]`
    documents: Vec<Vec<TopicCounts>>,
}

impl Sampler {
    /// Allocate empty scopes for `corpus` and give every token a uniformly random label.
    ///
    /// `type_count` must be the final vocabulary size.
    pub fn initialize<R>(
        corpus: &mut Corpus,
        type_count: usize,
        hyper: Hyperparameters,
        rng: &mut R,
    ) -> Self
    where
        R: UniformSource + ?Sized,
    {
        let mut sampler = Self::empty(corpus, type_count, hyper);

        for (ci, cluster) in corpus.clusters_mut().iter_mut().enumerate() {
            for (di, document) in cluster.documents_mut().iter_mut().enumerate() {
                let doc = DocId {
                    cluster: ci,
                    document: di,
                };
                for sentence in document.sentences_mut() {
                    for i in 0..sentence.len() {
                        let label = uniform_label(rng.next_uniform());
                        sentence.set_label(i, label);
                        sampler.scope_mut(label, doc).increment(sentence.word(i));
                    }
                }
            }
        }

        info!(
            clusters = sampler.content.len(),
            types = type_count,
            background_tokens = sampler.background.total(),
            "Initialized sampler with random labels"
        );
        sampler
    }

    /// Scopes sized for `corpus` with no counts and no labels touched.
    fn empty(corpus: &Corpus, type_count: usize, hyper: Hyperparameters) -> Self {
        let content = corpus
            .clusters()
            .iter()
            .map(|_| TopicCounts::new(type_count))
            .collect();
        let documents = corpus
            .clusters()
            .iter()
            .map(|c| c.documents().iter().map(|_| TopicCounts::new(type_count)).collect())
            .collect();
        Self {
            hyper,
            type_count,
            background: TopicCounts::new(type_count),
            content,
            documents,
        }
    }

    /// Run `iterations` sampling sweeps followed by one decoding sweep.
    ///
    /// The log-likelihood is evaluated after sweep `i` whenever
    /// `log_every > 0 && i % log_every == 0`, and always after the decoding
    /// sweep. `observer` is called after every sweep.
    pub fn estimate<R, F>(
        &mut self,
        corpus: &mut Corpus,
        rng: &mut R,
        iterations: usize,
        log_every: usize,
        mut observer: F,
    ) -> EstimateReport
    where
        R: UniformSource + ?Sized,
        F: FnMut(&SweepProgress),
    {
        let mut trace = Vec::new();

        for iteration in 0..iterations {
            self.sweep(corpus, rng, SweepMode::Sample);

            let loglikelihood = if log_every > 0 && iteration % log_every == 0 {
                let ll = self.checked_loglikelihood(corpus);
                info!(iteration, loglikelihood = ll, "Gibbs sweep");
                trace.push(LikelihoodPoint {
                    iteration,
                    loglikelihood: ll,
                });
                Some(ll)
            } else {
                debug!(iteration, "Gibbs sweep");
                None
            };

            observer(&SweepProgress {
                iteration,
                mode: SweepMode::Sample,
                loglikelihood,
            });
        }

        self.sweep(corpus, rng, SweepMode::Decode);
        let final_loglikelihood = self.checked_loglikelihood(corpus);
        info!(loglikelihood = final_loglikelihood, "Decoding sweep complete");
        observer(&SweepProgress {
            iteration: iterations,
            mode: SweepMode::Decode,
            loglikelihood: Some(final_loglikelihood),
        });

        EstimateReport {
            trace,
            final_loglikelihood,
        }
    }

    /// One pass over every token in corpus order.
    pub fn sweep<R>(&mut self, corpus: &mut Corpus, rng: &mut R, mode: SweepMode)
    where
        R: UniformSource + ?Sized,
    {
        for (ci, cluster) in corpus.clusters_mut().iter_mut().enumerate() {
            for (di, document) in cluster.documents_mut().iter_mut().enumerate() {
                let doc = DocId {
                    cluster: ci,
                    document: di,
                };
                for sentence in document.sentences_mut() {
                    self.resample_sentence(sentence, doc, rng, mode);
                }
            }
        }
    }

    fn resample_sentence<R>(&mut self, sentence: &mut Sentence, doc: DocId, rng: &mut R, mode: SweepMode)
    where
        R: UniformSource + ?Sized,
    {
        let hyper = self.hyper;
        let type_count = self.type_count as f64;
        let mut scopes = self.scopes_mut(doc);

        for i in 0..sentence.len() {
            let word = sentence.word(i);
            let current = sentence.label(i);
            scopes[current.index()].decrement(word);

            // Sentence-level counts with this token left out
            let prior_total = (sentence.len() - 1) as f64 + hyper.alpha_sum();
            let mut weights = [0.0; TopicLabel::COUNT];
            for label in TopicLabel::ALL {
                let mut in_sentence = sentence.label_count(label) as f64;
                if label == current {
                    in_sentence -= 1.0;
                }
                let scope = &scopes[label.index()];
                let beta = hyper.beta(label);
                let likelihood =
                    (scope.count(word) as f64 + beta) / (scope.total() as f64 + type_count * beta);
                let prior = (in_sentence + hyper.alpha(label)) / prior_total;
                weights[label.index()] = likelihood * prior;
            }

            let chosen = match mode {
                SweepMode::Sample => sample_label(&weights, rng.next_uniform()),
                SweepMode::Decode => argmax_label(&weights),
            };

            sentence.set_label(i, chosen);
            scopes[chosen.index()].increment(word);
        }
    }

    /// `[background, content, document]` counts touched by a token of `doc`.
    fn scopes_mut(&mut self, doc: DocId) -> [&mut TopicCounts; TopicLabel::COUNT] {
        [
            &mut self.background,
            &mut self.content[doc.cluster],
            &mut self.documents[doc.cluster][doc.document],
        ]
    }

    fn scope_mut(&mut self, label: TopicLabel, doc: DocId) -> &mut TopicCounts {
        match label {
            TopicLabel::Background => &mut self.background,
            TopicLabel::Content => &mut self.content[doc.cluster],
            TopicLabel::Document => &mut self.documents[doc.cluster][doc.document],
        }
    }

    /// Log marginal probability of the current labels and words.
    ///
    /// Topic part: a Dirichlet-multinomial per sentence. Word part: one
    /// Dirichlet-multinomial per topic kind, with content counts pooled over
    /// clusters and document counts pooled over documents.
    pub fn loglikelihood(&self, corpus: &Corpus) -> f64 {
        let h = &self.hyper;
        let alpha_sum = h.alpha_sum();
        let ln_alpha_sum = ln_gamma(alpha_sum);
        let ln_alpha_each: f64 = TopicLabel::ALL.iter().map(|&l| ln_gamma(h.alpha(l))).sum();

        let mut ll = 0.0;

        // P(z)
        for document in corpus.clusters().iter().flat_map(|c| c.documents()) {
            for sentence in document.sentences() {
                for label in TopicLabel::ALL {
                    ll += ln_gamma(h.alpha(label) + sentence.label_count(label) as f64);
                }
                ll -= ln_gamma(alpha_sum + sentence.len() as f64);
            }
            let sentences = document.len() as f64;
            ll += sentences * ln_alpha_sum;
            ll -= sentences * ln_alpha_each;
        }

        // P(w | z)
        let w = self.type_count as f64;
        let (bb, bc, bd) = (h.beta_background, h.beta_content, h.beta_document);
        ll += ln_gamma(w * bb) + ln_gamma(w * bc) + ln_gamma(w * bd);
        ll -= w * (ln_gamma(bb) + ln_gamma(bc) + ln_gamma(bd));

        let content_pooled = pooled_counts(self.content.iter(), self.type_count);
        let document_pooled = pooled_counts(self.documents.iter().flatten(), self.type_count);

        for word in 0..self.type_count {
            ll += ln_gamma(self.background.count(word) as f64 + bb);
            ll += ln_gamma(content_pooled[word] as f64 + bc);
            ll += ln_gamma(document_pooled[word] as f64 + bd);
        }

        let content_total: u64 = content_pooled.iter().sum();
        let document_total: u64 = document_pooled.iter().sum();
        ll -= ln_gamma(self.background.total() as f64 + w * bb);
        ll -= ln_gamma(content_total as f64 + w * bc);
        ll -= ln_gamma(document_total as f64 + w * bd);

        ll
    }

    fn checked_loglikelihood(&self, corpus: &Corpus) -> f64 {
        let ll = self.loglikelihood(corpus);
        assert!(
            ll.is_finite(),
            "log-likelihood is {ll}; topic counts are inconsistent with token labels"
        );
        ll
    }

    /// Recount every scope from the corpus labels and compare with the live counts.
    pub fn matches_labels(&self, corpus: &Corpus) -> bool {
        let mut expected = Self::empty(corpus, self.type_count, self.hyper);
        for (ci, cluster) in corpus.clusters().iter().enumerate() {
            for (di, document) in cluster.documents().iter().enumerate() {
                let doc = DocId {
                    cluster: ci,
                    document: di,
                };
                for sentence in document.sentences() {
                    for (&word, &label) in sentence.tokens().iter().zip(sentence.labels()) {
                        expected.scope_mut(label, doc).increment(word);
                    }
                }
            }
        }
        expected.background == self.background
            && expected.content == self.content
            && expected.documents == self.documents
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    pub fn type_count(&self) -> usize {
        self.type_count
    }

    pub fn background(&self) -> &TopicCounts {
        &self.background
    }

    pub fn content(&self, cluster: usize) -> Option<&TopicCounts> {
        self.content.get(cluster)
    }

    pub fn document(&self, doc: DocId) -> Option<&TopicCounts> {
        self.documents.get(doc.cluster)?.get(doc.document)
    }

    /// Smoothed background word distribution.
    pub fn background_distribution(&self, beta: f64) -> Distribution {
        Distribution::from_topic(&self.background, beta, self.type_count)
    }

    /// Smoothed content word distribution of one cluster.
    pub fn content_distribution(&self, cluster: usize, beta: f64) -> Option<Distribution> {
        self.content(cluster)
            .map(|t| Distribution::from_topic(t, beta, self.type_count))
    }

    /// Smoothed word distribution of one document.
    pub fn document_distribution(&self, doc: DocId, beta: f64) -> Option<Distribution> {
        self.document(doc)
            .map(|t| Distribution::from_topic(t, beta, self.type_count))
    }
}

/// Label for a uniform draw during initialization: each topic with probability 1/3.
pub fn uniform_label(u: f64) -> TopicLabel {
    if u > 2.0 / 3.0 {
        TopicLabel::Background
    } else if u > 1.0 / 3.0 {
        TopicLabel::Content
    } else {
        TopicLabel::Document
    }
}

/// Draw a label from unnormalized `weights` using uniform draw `u`.
///
/// `[0, 1)` is partitioned DOCUMENT, CONTENT, BACKGROUND from the bottom up.
pub fn sample_label(weights: &[f64; TopicLabel::COUNT], u: f64) -> TopicLabel {
    let b = weights[TopicLabel::Background.index()];
    let c = weights[TopicLabel::Content.index()];
    let d = weights[TopicLabel::Document.index()];
    let sum = b + c + d;

    if u > (c + d) / sum {
        TopicLabel::Background
    } else if u > d / sum {
        TopicLabel::Content
    } else {
        TopicLabel::Document
    }
}

/// Most probable label. CONTENT must strictly beat both others; DOCUMENT must
/// strictly beat BACKGROUND; otherwise BACKGROUND.
pub fn argmax_label(weights: &[f64; TopicLabel::COUNT]) -> TopicLabel {
    let b = weights[TopicLabel::Background.index()];
    let c = weights[TopicLabel::Content.index()];
    let d = weights[TopicLabel::Document.index()];

    if c > d && c > b {
        TopicLabel::Content
    } else if d > b {
        TopicLabel::Document
    } else {
        TopicLabel::Background
    }
}

fn pooled_counts<'a>(scopes: impl Iterator<Item = &'a TopicCounts>, type_count: usize) -> Vec<u64> {
    let mut pooled = vec![0u64; type_count];
    for scope in scopes {
        for (word, slot) in pooled.iter_mut().enumerate() {
            *slot += scope.count(word) as u64;
        }
    }
    pooled
}
