//! Text stores: where file contents are read from and written back to

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Read/write access to whole text files
pub trait TextStore {
    fn read(&self, path: &Path) -> Result<String>;

    /// Overwrite `path` with `text`
    fn write(&mut self, path: &Path, text: &str) -> Result<()>;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl TextStore for FsStore {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }

    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text).map_err(|e| Error::io(path, e))
    }
}

/// In-memory store, records every write
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, String>,
    writes: Vec<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Paths written so far, in write order
    pub fn writes(&self) -> &[PathBuf] {
        &self.writes
    }
}

impl TextStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file in store"),
            )
        })
    }

    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), text.to_string());
        self.writes.push(path.to_path_buf());
        Ok(())
    }
}
