use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::model::sampler::Hyperparameters;
use crate::summarize::divergence::ScoringStrategy;
use crate::summarize::SummaryOptions;

/// Central configuration loaded from environment variables.
///
/// Every setting has a default, so an empty environment is a valid run.
/// A `.env` file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// RNG seed; unset means a fresh random seed (logged so the run can be replayed)
    pub seed: Option<u64>,
    /// Print the log-likelihood every this many sweeps (0 disables)
    pub log_every: usize,
    pub hyperparameters: Hyperparameters,
    pub summary: SummaryOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            log_every: 10,
            hyperparameters: Hyperparameters::default(),
            summary: SummaryOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-malformed ones are errors.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let h = defaults.hyperparameters;
        let s = defaults.summary;

        Ok(Self {
            seed: env_opt("TOPICSUM_SEED")?,
            log_every: env_or("TOPICSUM_LOG_EVERY", defaults.log_every)?,
            hyperparameters: Hyperparameters {
                alpha_background: env_or("TOPICSUM_ALPHA_B", h.alpha_background)?,
                alpha_content: env_or("TOPICSUM_ALPHA_C", h.alpha_content)?,
                alpha_document: env_or("TOPICSUM_ALPHA_D", h.alpha_document)?,
                beta_background: env_or("TOPICSUM_BETA_B", h.beta_background)?,
                beta_content: env_or("TOPICSUM_BETA_C", h.beta_content)?,
                beta_document: env_or("TOPICSUM_BETA_D", h.beta_document)?,
            },
            summary: SummaryOptions {
                strategy: env_or::<ScoringStrategy>("TOPICSUM_SCORING", s.strategy)?,
                content_beta: env_or("TOPICSUM_CONTENT_BETA", s.content_beta)?,
                background_beta: env_or("TOPICSUM_BACKGROUND_BETA", s.background_beta)?,
                document_beta: env_or("TOPICSUM_DOCUMENT_BETA", s.document_beta)?,
                backoff: env_or("TOPICSUM_KL_BACKOFF", s.backoff)?,
                summary_words: env_or("TOPICSUM_SUMMARY_WORDS", s.summary_words)?,
            },
        })
    }

    /// Check that every smoothing weight is positive so likelihoods and
    /// divergences stay finite.
    pub fn validate(&self) -> Result<()> {
        let h = &self.hyperparameters;
        let all = [
            ("TOPICSUM_ALPHA_B", h.alpha_background),
            ("TOPICSUM_ALPHA_C", h.alpha_content),
            ("TOPICSUM_ALPHA_D", h.alpha_document),
            ("TOPICSUM_BETA_B", h.beta_background),
            ("TOPICSUM_BETA_C", h.beta_content),
            ("TOPICSUM_BETA_D", h.beta_document),
            ("TOPICSUM_CONTENT_BETA", self.summary.content_beta),
            ("TOPICSUM_BACKGROUND_BETA", self.summary.background_beta),
            ("TOPICSUM_DOCUMENT_BETA", self.summary.document_beta),
            ("TOPICSUM_KL_BACKOFF", self.summary.backoff),
        ];
        for (name, value) in all {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("{name} must be a positive number, got {value}");
            }
        }
        if self.summary.summary_words == 0 {
            anyhow::bail!("TOPICSUM_SUMMARY_WORDS must be at least 1");
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        _ => Ok(None),
    }
}
