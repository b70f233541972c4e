use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;

/// Why a plan could not be turned into a tested mutant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[error("unsupported file type")]
    UnsupportedFile,

    #[error("could not read source: {0}")]
    Unreadable(String),

    #[error("could not parse source: {0}")]
    Parse(String),

    #[error("no operator at index {0}")]
    UnknownOperator(usize),

    #[error("no matching node at offset {0}")]
    NodeNotFound(usize),

    #[error("operator produced no rewrite")]
    RewriteUnavailable,

    #[error("could not write mutant: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// At least one test failed.
    Killed { failures: Vec<String> },
    /// The report listed no failing test.
    Survived,
    /// No readable report; counted as zero failures.
    Unreported { detail: String },
    /// Debug mode: the mutant was saved for inspection, no tests ran.
    Inspected { path: PathBuf },
    Skipped { reason: SkipReason },
}

/// Log entry for a killed mutant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub filename: String,
    pub filepath: String,
    pub apx_line: usize,
    pub mutator: String,
    pub original_text: String,
    pub failures: Vec<String>,
}

/// Directory of per-mutant JSON records and debug copies.
#[derive(Debug, Clone)]
pub struct ResultLog {
    dir: PathBuf,
}

impl ResultLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResultLog { dir: dir.into() }
    }

    /// `{dir}/{filename}-{line}-{mutator}.json`
    pub fn record_path(&self, filename: &str, apx_line: usize, mutator: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}-{}.json", filename, apx_line, mutator))
    }

    /// `{dir}/DEBUG-{filename}-{line}-{mutator}{.ext}`
    pub fn debug_path(&self, source: &Path, apx_line: usize, mutator: &str) -> PathBuf {
        let filename = file_name(source);
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.dir
            .join(format!("DEBUG-{}-{}-{}{}", filename, apx_line, mutator, ext))
    }

    /// Records with the same file, line and mutator overwrite each other.
    pub fn write(&self, record: &MutationRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.record_path(&record.filename, record.apx_line, &record.mutator);
        std::fs::write(&path, serde_json::to_vec(record)?)?;
        Ok(path)
    }

    /// Copy the mutated file on disk for manual inspection.
    pub fn save_mutant(&self, source: &Path, apx_line: usize, mutator: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.debug_path(source, apx_line, mutator);
        std::fs::copy(source, &path)?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<MutationRecord> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
