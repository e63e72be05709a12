// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Session
//
// A session collects finished runs so they can be compared side by side and
// written out together.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::RunReport;

pub const DEFAULT_FILE_NAME: &str = "session_results";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session has no runs to save")]
    EmptySession,

    #[error("failed to write session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SessionFile<'a> {
    version: &'static str,
    runs: &'a [RunReport],
}

#[derive(Debug, Clone)]
pub struct Session {
    file_name: String,
    directory: PathBuf,
    runs: Vec<RunReport>,
}

impl Session {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            directory: directory.into(),
            runs: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Sets the base name of the saved file; `.json` is appended on save.
    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.file_name))
    }

    pub fn record(&mut self, report: RunReport) {
        self.runs.push(report);
    }

    pub fn runs(&self) -> &[RunReport] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Starts a new session, dropping every recorded run.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>8} {:>8} {:>4} {:>8} {:<9} {:>9} {:>10} {:>8} {:>12}",
            "N", "K", "I", "X", "Variant", "Success%", "Collision%", "Idle%", "Probes/trial"
        );
        let _ = writeln!(out, "{}", "-".repeat(84));
        for run in &self.runs {
            let c = &run.config;
            let p = &run.percentages;
            let _ = writeln!(
                out,
                "{:>8} {:>8} {:>4} {:>8} {:<9} {:>9.2} {:>10.2} {:>8.2} {:>12.2}",
                c.stations,
                c.ready_stations,
                run.start_level,
                c.scenarios,
                c.variant.to_string(),
                p.success,
                p.collision,
                p.idle,
                run.probes_per_trial.mean,
            );
        }
        out
    }

    /// Writes every run as pretty JSON to [`Session::path`].
    pub fn save(&self) -> Result<PathBuf, SessionError> {
        if self.runs.is_empty() {
            return Err(SessionError::EmptySession);
        }
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path();
        let file = SessionFile { version: env!("CARGO_PKG_VERSION"), runs: &self.runs };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), runs = self.runs.len(), "Session saved");
        Ok(path)
    }
}
