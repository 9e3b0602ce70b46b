// Distribution — a normalized weight vector over word types.
//
// Built either as a Dirichlet-smoothed snapshot of a `TopicCounts`, or by
// hand (e.g. the evolving "candidate summary" during sentence selection).
// Weights are stored unnormalized; `probability` divides by the running total.

use tracing::warn;

use super::topic::TopicCounts;

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    weights: Vec<f64>,
    total: f64,
}

impl Distribution {
    /// All-zero distribution over `type_count` word types.
    pub fn new(type_count: usize) -> Self {
        Self {
            weights: vec![0.0; type_count],
            total: 0.0,
        }
    }

    /// Smoothed snapshot: `p(w) = (count(w) + beta) / (total + type_count * beta)`.
    pub fn from_topic(topic: &TopicCounts, beta: f64, type_count: usize) -> Self {
        let mut dist = Self::new(type_count);
        for word in 0..type_count {
            dist.add(word, topic.count(word) as f64 + beta);
        }
        dist
    }

    /// Normalized probability of `word`; zero if out of range or the distribution is empty.
    pub fn probability(&self, word: usize) -> f64 {
        match self.weights.get(word) {
            Some(&w) if self.total != 0.0 => w / self.total,
            _ => 0.0,
        }
    }

    /// Add `weight` to a word type. Out-of-range types are ignored.
    pub fn add(&mut self, word: usize, weight: f64) {
        match self.weights.get_mut(word) {
            Some(w) => {
                *w += weight;
                self.total += weight;
            }
            None => warn!(word, size = self.weights.len(), "Word type outside distribution"),
        }
    }

    /// Take `weight` back off a word type (inverse of `add`).
    pub fn subtract(&mut self, word: usize, weight: f64) {
        self.add(word, -weight);
    }

    /// Zero a word type's mass entirely.
    pub fn remove(&mut self, word: usize) {
        if let Some(w) = self.weights.get_mut(word) {
            self.total -= *w;
            *w = 0.0;
        }
    }

    /// Square a word type's share of the mass, shrinking the total to match.
    pub fn downweight(&mut self, word: usize) {
        if word >= self.weights.len() {
            return;
        }
        let old = self.probability(word);
        let new = old * old;
        self.total -= old - new;
        self.weights[word] = new * self.total;
    }

    /// Unnormalized total mass.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of word types covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Word types with positive probability, highest first. Ties keep id order.
    pub fn top_words(&self, n: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = (0..self.weights.len())
            .map(|w| (w, self.probability(w)))
            .filter(|(_, p)| *p > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}
