//! File-backed progress store
//!
//! Every save reads the whole file, appends in memory and rewrites the whole
//! file. There is no locking: two overlapping saves race and the later
//! write wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::{Result, TutorError};
use crate::progress::{Entry, ProgressLog, ProgressRecord};

/// Progress store backed by one JSON file
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create store for `path`; the file is created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole log; a missing file is an empty log
    pub fn load(&self) -> Result<ProgressLog> {
        if !self.path.exists() {
            return Ok(ProgressLog::new());
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| TutorError::persistence(&self.path, format!("read failed: {}", e)))?;

        serde_json::from_str(&json)
            .map_err(|e| TutorError::persistence(&self.path, format!("invalid JSON: {}", e)))
    }

    /// Append `entry` under `module` and rewrite the file
    pub fn save(&self, module: &str, entry: Entry) -> Result<()> {
        let mut log = self.load()?;
        log.append(module, entry);
        self.write(&log)?;

        tracing::debug!(
            module,
            path = %self.path.display(),
            entries = log.entry_count(),
            "progress saved"
        );
        Ok(())
    }

    /// Replace the file contents with `log`
    ///
    /// The JSON is written to a temporary file next to the target and then
    /// persisted over it.
    pub fn write(&self, log: &ProgressLog) -> Result<()> {
        let json = serde_json::to_string_pretty(log)
            .map_err(|e| TutorError::persistence(&self.path, format!("serialize failed: {}", e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| TutorError::persistence(&self.path, format!("create dir failed: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| TutorError::persistence(&self.path, format!("temp file failed: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| TutorError::persistence(&self.path, format!("write failed: {}", e)))?;
        tmp.persist(&self.path)
            .map_err(|e| TutorError::persistence(&self.path, format!("replace failed: {}", e.error)))?;

        Ok(())
    }

    /// Entries of one module, if any were recorded
    pub fn record(&self, module: &str) -> Result<Option<ProgressRecord>> {
        Ok(self.load()?.record(module))
    }

    /// Module names with entry counts
    pub fn summary(&self) -> Result<Vec<(String, usize)>> {
        Ok(self.load()?.summary())
    }
}
