use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot directory unusable: {0}")]
    Directory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes rendered widget pages so a half-written file is never observed.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    target: PathBuf,
}

impl SnapshotWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Replaces the target with `html` via a sibling temp file and rename.
    pub fn write(&self, html: &str) -> Result<(), SnapshotError> {
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| SnapshotError::Directory(e.to_string()))?;
        } else if !dir.is_dir() {
            return Err(SnapshotError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(html.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.target).map_err(|e| SnapshotError::Io(e.error))?;
        Ok(())
    }
}
