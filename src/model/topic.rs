// Topic labels and per-scope sufficient statistics.
//
// A `TopicCounts` is the count vector over word types for one scope: the
// corpus-wide background, one cluster's content, or one document's
// idiosyncratic words. The sampler is the only writer.

use serde::{Deserialize, Serialize};

/// The three latent categories a word token can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicLabel {
    /// Corpus-wide function and filler words
    Background,
    /// Words characteristic of a cluster's shared subject
    Content,
    /// Words specific to one document
    Document,
}

impl TopicLabel {
    pub const COUNT: usize = 3;
    pub const ALL: [TopicLabel; 3] = [TopicLabel::Background, TopicLabel::Content, TopicLabel::Document];

    pub fn index(self) -> usize {
        match self {
            TopicLabel::Background => 0,
            TopicLabel::Content => 1,
            TopicLabel::Document => 2,
        }
    }
}

/// Word-type counts plus a running total for one scope.
///
/// `total` always equals the sum of `counts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicCounts {
    counts: Vec<u32>,
    total: u64,
}

impl TopicCounts {
    /// Empty counts sized for a vocabulary of `type_count` words.
    pub fn new(type_count: usize) -> Self {
        Self {
            counts: vec![0; type_count],
            total: 0,
        }
    }

    pub fn increment(&mut self, word: usize) {
        if word >= self.counts.len() {
            self.counts.resize(word + 1, 0);
        }
        self.counts[word] += 1;
        self.total += 1;
    }

    /// Remove one occurrence of `word`.
    ///
    /// Panics if the word has no occurrences: that means the sampler's
    /// bookkeeping has diverged from the labels in the corpus.
    pub fn decrement(&mut self, word: usize) {
        let count = self.counts.get_mut(word).filter(|c| **c > 0);
        match count {
            Some(c) => {
                *c -= 1;
                self.total -= 1;
            }
            None => panic!("decrement of word type {word} with zero count in topic"),
        }
    }

    /// Occurrences of `word`; zero for types beyond the vector.
    pub fn count(&self, word: usize) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of word types the vector currently covers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
