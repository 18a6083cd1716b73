//! Trend tracking - persist scores to .listing-qa-history.json

use crate::config::CONFIG_FILENAME;
use crate::{AuditedListing, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILENAME: &str = ".listing-qa-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub listings: BTreeMap<String, ListingScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingScore {
    pub marketplace: String,
    pub score: u8,
    pub errors: usize,
    pub warnings: usize,
}

/// Find project root (directory containing the history file, a config file or .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    loop {
        if dir.join(HISTORY_FILENAME).exists()
            || dir.join(CONFIG_FILENAME).exists()
            || dir.join(".git").exists()
        {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    if let Ok(content) = fs::read_to_string(&path) {
        if let Ok(history) = serde_json::from_str::<HistoryFile>(&content) {
            return history;
        }
    }
    HistoryFile::default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, content)
}

/// History key: the same file audited for another marketplace is tracked separately
fn listing_key(path: &Path, marketplace: &str) -> String {
    format!("{}#{}", path.to_string_lossy(), marketplace)
}

/// Get the previous score for a listing from the latest run
pub fn previous_score(history: &HistoryFile, path: &Path, marketplace: &str) -> Option<u8> {
    let run = history.runs.last()?;
    run.listings
        .get(&listing_key(path, marketplace))
        .map(|l| l.score)
}

/// Build a new run from audit results and append to history
pub fn append_run(history: &mut HistoryFile, audited: &[AuditedListing], commit: Option<String>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let listings = audited
        .iter()
        .map(|a| {
            (
                listing_key(&a.path, &a.result.marketplace),
                ListingScore {
                    marketplace: a.result.marketplace.clone(),
                    score: a.result.score,
                    errors: a.result.count(Severity::Error),
                    warnings: a.result.count(Severity::Warning),
                },
            )
        })
        .collect();
    history.runs.push(HistoryRun {
        timestamp,
        commit,
        listings,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: "[was 82, down 4]" or "[was 82, up 2]" or ""
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}]", current);
    }
    let diff = current as i16 - prev as i16;
    if diff > 0 {
        format!(" [was {}, up {}]", prev, diff)
    } else {
        format!(" [was {}, down {}]", prev, -diff)
    }
}
