// Colored terminal output for likelihood traces, summaries, and topic words.
//
// This module handles all terminal-specific formatting. The pipeline and
// main.rs delegate here.

use colored::Colorize;

use crate::corpus::vocab::Vocabulary;
use crate::model::distribution::Distribution;
use crate::model::sampler::{EstimateReport, SweepMode, SweepProgress};
use crate::summarize::ClusterSummary;

/// Header printed above the per-sweep likelihood rows.
pub fn likelihood_header() -> String {
    format!("{}", "Iteration \t Log-likelihood".bold())
}

/// One periodic likelihood row.
pub fn likelihood_row(iteration: usize, loglikelihood: f64) -> String {
    format!("{iteration}\t{loglikelihood:.4}")
}

/// The row for the final decoding sweep.
pub fn final_likelihood_row(loglikelihood: f64) -> String {
    format!("{}\t{loglikelihood:.4}", "Final Iteration:".bold())
}

/// The table row for a finished sweep, if that sweep reported a likelihood.
pub fn sweep_row(progress: &SweepProgress) -> Option<String> {
    let ll = progress.loglikelihood?;
    Some(match progress.mode {
        SweepMode::Sample => likelihood_row(progress.iteration, ll),
        SweepMode::Decode => final_likelihood_row(ll),
    })
}

/// Recap of a finished estimate.
pub fn display_estimate(report: &EstimateReport) {
    if let (Some(first), Some(last)) = (report.trace.first(), report.trace.last()) {
        let delta = report.final_loglikelihood - first.loglikelihood;
        println!(
            "  Log-likelihood {:.1} (sweep {}) → {:.1} (sweep {}) → {:.1} (decoded), {} {:+.1}",
            first.loglikelihood,
            first.iteration,
            last.loglikelihood,
            last.iteration,
            report.final_loglikelihood,
            "change".dimmed(),
            delta,
        );
    } else {
        println!("  Final log-likelihood: {:.1}", report.final_loglikelihood);
    }
}

/// Print one cluster's summary under a heading.
pub fn display_summary(summary: &ClusterSummary) {
    println!(
        "\n{}",
        format!(
            "=== {} ({} sentences, {} words) ===",
            summary.name,
            summary.sentences.len(),
            summary.word_count
        )
        .bold()
    );
    println!("{}", summary.text());
}

/// Print the `n` most probable words of a distribution.
pub fn display_top_words(title: &str, dist: &Distribution, vocab: &Vocabulary, n: usize) {
    println!("\n{}", title.bold());

    let top = dist.top_words(n);
    if top.is_empty() {
        println!("  {}", "Nothing is larger than 0.".dimmed());
        return;
    }

    let bar_width: usize = 20;
    let max_p = top[0].1;
    for (rank, (word, p)) in top.iter().enumerate() {
        let filled = ((p / max_p) * bar_width as f64).round() as usize;
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(bar_width.saturating_sub(filled)));
        let label = vocab.resolve(*word).unwrap_or("?");
        println!("  {:>3}. {:<24} {} {:.5}", rank + 1, label, bar.bright_blue(), p);
    }
}
