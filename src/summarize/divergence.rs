// KL-divergence scoring of a candidate summary against a cluster's content.
//
// Three interchangeable strategies, differing only in how words missing from
// the candidate summary are handled:
//
//   constant    — back off to a fixed probability (the default; smaller
//                 constants favor longer sentences)
//   background  — back off to the background distribution
//   document    — constant backoff, minus the divergence between the
//                 sentence's own document distribution and the candidate,
//                 steering selection away from document-specific sentences
//
// Terms with zero reference probability contribute nothing (0 log 0 = 0).

use std::str::FromStr;

use crate::corpus::Sentence;
use crate::model::distribution::Distribution;

/// Scores how far a candidate summary distribution is from the target content.
pub trait DivergenceScorer {
    /// Divergence after `sentence` has been added to `candidate`. Lower is better.
    fn divergence(&self, candidate: &Distribution, sentence: &Sentence) -> f64;
}

/// Which scorer the summarizer should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringStrategy {
    #[default]
    ConstantBackoff,
    BackgroundBackoff,
    DocumentContrast,
}

impl FromStr for ScoringStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::ConstantBackoff),
            "background" => Ok(Self::BackgroundBackoff),
            "document" => Ok(Self::DocumentContrast),
            other => anyhow::bail!(
                "Unknown scoring strategy '{other}' (expected constant, background, or document)"
            ),
        }
    }
}

/// KL(content ‖ candidate), backing off to `backoff` where the candidate is zero.
pub fn kl_constant_backoff(content: &Distribution, candidate: &Distribution, backoff: f64) -> f64 {
    (0..content.len())
        .map(|w| {
            let q = candidate.probability(w);
            let q = if q != 0.0 { q } else { backoff };
            term(content.probability(w), q)
        })
        .sum()
}

/// KL(content ‖ candidate), backing off to the background where the candidate is zero.
pub fn kl_background_backoff(
    content: &Distribution,
    candidate: &Distribution,
    background: &Distribution,
) -> f64 {
    (0..content.len())
        .map(|w| {
            let q = candidate.probability(w);
            let q = if q != 0.0 { q } else { background.probability(w) };
            term(content.probability(w), q)
        })
        .sum()
}

/// KL(content ‖ candidate) − KL(document ‖ candidate), both with constant backoff.
pub fn kl_document_contrast(
    content: &Distribution,
    document: &Distribution,
    candidate: &Distribution,
    backoff: f64,
) -> f64 {
    (0..content.len())
        .map(|w| {
            let q = candidate.probability(w);
            let q = if q != 0.0 { q } else { backoff };
            term(content.probability(w), q) - term(document.probability(w), q)
        })
        .sum()
}

fn term(p: f64, q: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        p * (p / q).ln()
    }
}

pub struct ConstantBackoff<'a> {
    pub content: &'a Distribution,
    pub backoff: f64,
}

impl DivergenceScorer for ConstantBackoff<'_> {
    fn divergence(&self, candidate: &Distribution, _sentence: &Sentence) -> f64 {
        kl_constant_backoff(self.content, candidate, self.backoff)
    }
}

pub struct BackgroundBackoff<'a> {
    pub content: &'a Distribution,
    pub background: &'a Distribution,
}

impl DivergenceScorer for BackgroundBackoff<'_> {
    fn divergence(&self, candidate: &Distribution, _sentence: &Sentence) -> f64 {
        kl_background_backoff(self.content, candidate, self.background)
    }
}

/// Penalizes sentences that look like their own document rather than the cluster.
pub struct DocumentContrast<'a> {
    pub content: &'a Distribution,
    /// Distributions of the cluster's documents, by document index
    pub documents: &'a [Distribution],
    pub backoff: f64,
}

impl DivergenceScorer for DocumentContrast<'_> {
    fn divergence(&self, candidate: &Distribution, sentence: &Sentence) -> f64 {
        match self.documents.get(sentence.doc().document) {
            Some(document) => kl_document_contrast(self.content, document, candidate, self.backoff),
            None => kl_constant_backoff(self.content, candidate, self.backoff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(weights: &[f64]) -> Distribution {
        let mut d = Distribution::new(weights.len());
        for (w, &x) in weights.iter().enumerate() {
            d.add(w, x);
        }
        d
    }

    #[test]
    fn test_kl_against_itself_is_zero() {
        let content = dist(&[1.0, 2.0, 3.0]);
        let kl = kl_constant_backoff(&content, &content.clone(), 0.001);
        assert!(kl.abs() < 1e-12, "got {kl}");
    }

    #[test]
    fn test_constant_backoff_for_missing_words() {
        let content = dist(&[1.0, 1.0]);
        let candidate = dist(&[1.0, 0.0]);
        let kl = kl_constant_backoff(&content, &candidate, 0.5);
        // 0.5 ln(0.5 / 1.0) + 0.5 ln(0.5 / 0.5)
        assert!((kl - 0.5 * 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_background_backoff_uses_background() {
        let content = dist(&[1.0, 1.0]);
        let candidate = dist(&[1.0, 0.0]);
        let background = dist(&[3.0, 1.0]);
        let kl = kl_background_backoff(&content, &candidate, &background);
        let expected = 0.5 * (0.5f64 / 1.0).ln() + 0.5 * (0.5f64 / 0.25).ln();
        assert!((kl - expected).abs() < 1e-12);
    }

    #[test]
    fn test_document_contrast_subtracts_document_term() {
        let content = dist(&[1.0, 1.0]);
        let candidate = dist(&[1.0, 1.0]);
        let document = dist(&[1.0, 0.0]);
        let kl = kl_document_contrast(&content, &document, &candidate, 0.001);
        // content term is 0; document term is 1.0 ln(1.0 / 0.5)
        assert!((kl + 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("constant".parse::<ScoringStrategy>().unwrap(), ScoringStrategy::ConstantBackoff);
        assert_eq!("Document".parse::<ScoringStrategy>().unwrap(), ScoringStrategy::DocumentContrast);
        assert!("nope".parse::<ScoringStrategy>().is_err());
    }
}
