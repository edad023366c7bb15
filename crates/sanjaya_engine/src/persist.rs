use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::report_filename;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ArchivedReport<'a> {
    topic: &'a str,
    query: &'a str,
    saved_utc: String,
    results: &'a Value,
}

/// Writes completed-run results as pretty JSON, one file per topic and query.
/// Files are written to a temp file first and renamed into place.
#[derive(Clone)]
pub struct ReportArchive {
    dir: PathBuf,
    clock: Arc<dyn Fn() -> String + Send + Sync>,
}

impl ReportArchive {
    pub fn new(dir: PathBuf, clock: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        Self { dir, clock }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, topic: &str, query: &str, results: &Value) -> Result<PathBuf, PersistError> {
        let report = ArchivedReport {
            topic,
            query,
            saved_utc: (self.clock)(),
            results,
        };
        let content = serde_json::to_string_pretty(&report)?;
        self.write_atomic(&report_filename(topic, query), &content)
    }

    fn write_atomic(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
