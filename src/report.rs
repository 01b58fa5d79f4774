use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// A per-source failure that did not stop the run.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub source: String,
    pub message: String,
}

/// Counters and warnings for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub search_url: String,
    pub search_ok: bool,
    pub links_discovered: usize,
    pub links_processed: usize,
    pub records: usize,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn new(search_url: &str) -> Self {
        RunReport {
            started_at: Utc::now(),
            finished_at: None,
            search_url: search_url.to_string(),
            search_ok: false,
            links_discovered: 0,
            links_processed: 0,
            records: 0,
            warnings: Vec::new(),
        }
    }

    /// Log the failure and keep it for the summary.
    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", source, message);
        self.warnings.push(Warning {
            source: source.to_string(),
            message,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn print(&self) {
        println!(
            "Links: {} discovered, {} processed. Records: {}. Warnings: {}.",
            self.links_discovered,
            self.links_processed,
            self.records,
            self.warnings.len()
        );
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report {:?}", path))
    }
}
