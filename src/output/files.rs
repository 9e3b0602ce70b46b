// Summary and report files.
//
// One plain-text file per cluster, named after the cluster, plus an optional
// JSON run report. Failing to create the output folder is not fatal: the run
// falls back to printing summaries only.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use crate::summarize::ClusterSummary;

/// Create the output folder. Returns `None` (after saying so) if that fails.
pub fn prepare_output_dir(dir: &Path) -> Option<PathBuf> {
    match fs::create_dir_all(dir) {
        Ok(()) => {
            println!("Creating output folder {}...", dir.display());
            Some(dir.to_path_buf())
        }
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Could not create output folder");
            println!("{}", "Failed to create output folder.".yellow());
            None
        }
    }
}

/// Write one cluster's summary as `<dir>/<cluster name>`, newline-terminated.
pub fn write_summary(dir: &Path, summary: &ClusterSummary) -> Result<PathBuf> {
    let path = dir.join(&summary.name);
    let mut text = summary.text();
    text.push('\n');
    fs::write(&path, text)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    info!(path = %path.display(), sentences = summary.sentences.len(), "Wrote summary");
    Ok(path)
}

/// Serialize `report` as pretty JSON to `path`, creating parent directories.
pub fn write_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for report: {}", path.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_summary_named_after_cluster() {
        let dir = tempfile::tempdir().unwrap();
        let summary = ClusterSummary {
            name: "d301i".to_string(),
            word_count: 4,
            sentences: vec!["One two.".to_string(), "Three four.".to_string()],
        };
        let path = write_summary(dir.path(), &summary).unwrap();
        assert_eq!(path.file_name().unwrap(), "d301i");
        assert_eq!(fs::read_to_string(path).unwrap(), "One two.\nThree four.\n");
    }

    #[test]
    fn test_prepare_output_dir_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        assert!(prepare_output_dir(&blocker.join("out")).is_none());
        assert!(prepare_output_dir(&dir.path().join("out")).is_some());
    }
}
