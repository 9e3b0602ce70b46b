// Greedy KL-divergence sentence selection.
//
// Starting from an empty candidate summary, repeatedly add the sentence whose
// words bring the candidate's word distribution closest to the cluster's
// content distribution, until the word budget is reached or the pool is empty.

use thiserror::Error;
use tracing::{debug, warn};

use super::divergence::DivergenceScorer;
use crate::corpus::{Cluster, Sentence};
use crate::model::distribution::Distribution;

/// Summary length budget in words.
pub const DEFAULT_SUMMARY_WORDS: usize = 250;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("no cluster with index {0}")]
    UnknownCluster(usize),
}

/// Sentences chosen for one cluster, in selection order.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub sentences: Vec<&'a Sentence>,
    /// Divergence of the candidate summary right after each pick
    pub divergences: Vec<f64>,
    pub word_count: usize,
    /// Selection ended because no remaining sentence had a usable score
    pub stopped_early: bool,
}

#[derive(Debug, Clone)]
pub struct SentenceSelector {
    summary_words: usize,
}

impl Default for SentenceSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_WORDS)
    }
}

impl SentenceSelector {
    pub fn new(summary_words: usize) -> Self {
        Self { summary_words }
    }

    /// Pick sentences from `cluster` greedily under `scorer`.
    ///
    /// The summary may overshoot the budget by the length of its last sentence.
    /// Ties in divergence go to the sentence met first in cluster order. If no
    /// remaining sentence scores below `f64::MAX` (all NaN, say), selection
    /// stops and the sentences picked so far are kept.
    pub fn select<'a>(
        &self,
        cluster: &'a Cluster,
        scorer: &dyn DivergenceScorer,
        type_count: usize,
    ) -> Selection<'a> {
        let mut pool: Vec<&'a Sentence> = cluster.sentences().collect();
        let mut candidate = Distribution::new(type_count);
        let mut selection = Selection {
            sentences: Vec::new(),
            divergences: Vec::new(),
            word_count: 0,
            stopped_early: false,
        };

        while selection.word_count < self.summary_words && !pool.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            let mut best_kl = f64::MAX;

            for (i, sentence) in pool.iter().enumerate() {
                add_sentence(&mut candidate, sentence);
                let kl = scorer.divergence(&candidate, sentence);
                remove_sentence(&mut candidate, sentence);

                if kl < best_kl {
                    best_kl = kl;
                    best = Some((i, kl));
                }
            }

            let Some((index, kl)) = best else {
                warn!(
                    cluster = cluster.name(),
                    selected = selection.sentences.len(),
                    remaining = pool.len(),
                    "No candidate sentence could be scored; keeping partial summary"
                );
                selection.stopped_early = true;
                break;
            };

            let chosen = pool.remove(index);
            add_sentence(&mut candidate, chosen);
            selection.word_count += chosen.len();
            selection.sentences.push(chosen);
            selection.divergences.push(kl);

            debug!(
                cluster = cluster.name(),
                divergence = kl,
                words = selection.word_count,
                "Selected sentence"
            );
        }

        selection
    }
}

/// Add one unit of weight per token of `sentence`.
pub fn add_sentence(dist: &mut Distribution, sentence: &Sentence) {
    for &word in sentence.tokens() {
        dist.add(word, 1.0);
    }
}

/// Undo `add_sentence`.
pub fn remove_sentence(dist: &mut Distribution, sentence: &Sentence) {
    for &word in sentence.tokens() {
        dist.subtract(word, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::vocab::Vocabulary;
    use crate::corpus::Corpus;
    use crate::summarize::divergence::ConstantBackoff;

    /// Scorer that returns NaN for everything.
    struct Unscorable;

    impl DivergenceScorer for Unscorable {
        fn divergence(&self, _candidate: &Distribution, _sentence: &Sentence) -> f64 {
            f64::NAN
        }
    }

    fn one_cluster(texts: &[&str]) -> (Corpus, Vocabulary) {
        let mut vocab = Vocabulary::new();
        let docs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("doc{i}"), t.to_string()))
            .collect::<Vec<_>>();
        let corpus = Corpus::from_texts(vec![("c".to_string(), docs)], &mut vocab);
        (corpus, vocab)
    }

    #[test]
    fn test_budget_stops_selection() {
        let (corpus, vocab) = one_cluster(&["a b c\nd e f\ng h i"]);
        let mut content = Distribution::new(vocab.type_count());
        for w in 0..vocab.type_count() {
            content.add(w, 1.0);
        }
        let scorer = ConstantBackoff {
            content: &content,
            backoff: 0.001,
        };
        let selection =
            SentenceSelector::new(6).select(corpus.cluster(0).unwrap(), &scorer, vocab.type_count());
        assert_eq!(selection.sentences.len(), 2);
        assert_eq!(selection.word_count, 6);
        assert!(!selection.stopped_early);
    }

    #[test]
    fn test_unscorable_pool_yields_empty_selection() {
        let (corpus, vocab) = one_cluster(&["a b c"]);
        let selection =
            SentenceSelector::default().select(corpus.cluster(0).unwrap(), &Unscorable, vocab.type_count());
        assert!(selection.sentences.is_empty());
        assert!(selection.stopped_early);
    }

    /// Scores a candidate 0 while it holds at most two words, NaN beyond that.
    struct ScorableOnce;

    impl DivergenceScorer for ScorableOnce {
        fn divergence(&self, candidate: &Distribution, _sentence: &Sentence) -> f64 {
            if candidate.total() <= 2.0 {
                0.0
            } else {
                f64::NAN
            }
        }
    }

    #[test]
    fn test_unscorable_step_keeps_partial_selection() {
        let (corpus, vocab) = one_cluster(&["a b\nc d\ne f"]);
        let selection =
            SentenceSelector::new(250).select(corpus.cluster(0).unwrap(), &ScorableOnce, vocab.type_count());
        assert_eq!(selection.sentences.len(), 1);
        assert_eq!(selection.sentences[0].text(), "a b");
        assert_eq!(selection.word_count, 2);
        assert!(selection.stopped_early);
    }
}
