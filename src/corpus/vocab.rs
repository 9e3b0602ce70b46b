// Vocabulary — maps normalized word strings to dense integer type ids.
//
// Ids are handed out monotonically in first-seen order and never change, so a
// type id is also an index into every count vector the sampler allocates.
// The vocabulary is owned by the run and threaded through explicitly; its size
// must be final (all documents loaded) before any topic counts are sized.

use lasso::{Key, Rodeo, Spur};

/// Tokens left behind by markup stripping in some corpora.
const MARKUP_RESIDUE: [&str; 3] = ["ql", "lr", "ur"];

/// Word-string ↔ type-id mapping. Type ids are the interner's dense `Spur` indices.
#[derive(Debug, Default)]
pub struct Vocabulary {
    interner: Rodeo<Spur>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the type id for `word`, assigning the next free id if unseen.
    ///
    /// The word is normalized first (lowercased, non-alphanumeric characters
    /// dropped). Returns `None` when nothing survives normalization.
    pub fn intern(&mut self, word: &str) -> Option<usize> {
        let normalized = normalize_word(word)?;
        Some(self.interner.get_or_intern(normalized).into_usize())
    }

    /// Number of distinct word types seen so far.
    pub fn type_count(&self) -> usize {
        self.interner.len()
    }

    /// Resolve a type id back to its normalized word.
    pub fn resolve(&self, id: usize) -> Option<&str> {
        let key = Spur::try_from_usize(id)?;
        self.interner.try_resolve(&key)
    }

    /// Look up a word's id without interning it.
    pub fn lookup(&self, word: &str) -> Option<usize> {
        let normalized = normalize_word(word)?;
        self.interner.get(normalized).map(|key| key.into_usize())
    }

    /// Split a raw sentence on whitespace and intern every surviving word.
    pub fn tokenize(&mut self, sentence: &str) -> Vec<usize> {
        sentence
            .split_whitespace()
            .filter_map(|raw| self.intern(raw))
            .collect()
    }
}

/// Lowercase a raw token and strip everything that is not a letter or digit.
pub fn normalize_word(raw: &str) -> Option<String> {
    let word: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if word.is_empty() || MARKUP_RESIDUE.contains(&word.as_str()) {
        None
    } else {
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable_and_case_insensitive() {
        let mut vocab = Vocabulary::new();
        let a = vocab.intern("Cat").unwrap();
        let b = vocab.intern("dog").unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(vocab.intern("CAT,"), Some(a));
        assert_eq!(vocab.type_count(), 2);
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_markup() {
        let mut vocab = Vocabulary::new();
        let tokens = vocab.tokenize("The cat -- sat; QL on the mat.");
        let words: Vec<&str> = tokens.iter().map(|&t| vocab.resolve(t).unwrap()).collect();
        assert_eq!(words, vec!["the", "cat", "sat", "on", "the", "mat"]);
        assert_eq!(vocab.type_count(), 5);
    }

    #[test]
    fn test_ids_are_dense_in_first_seen_order() {
        let mut vocab = Vocabulary::new();
        let tokens = vocab.tokenize("storm flood storm coast flood");
        assert_eq!(tokens, vec![0, 1, 0, 2, 1]);
        assert_eq!(vocab.type_count(), 3);
        assert_eq!(vocab.resolve(2), Some("coast"));
        assert_eq!(vocab.lookup("Flood!"), Some(1));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let vocab = Vocabulary::new();
        assert!(vocab.resolve(3).is_none());
        assert!(vocab.lookup("anything").is_none());
    }
}
