//! File discovery: lists candidate files under the scan root

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::{Error, Result};

/// Recursively list files under `config.root_dir` whose name ends in one of
/// the configured extensions
///
/// Entries are visited in file-name order so runs are reproducible.
/// Directories named in `config.exclude` are pruned (the root itself never
/// is).
///
/// # Errors
/// Returns `Error::Walk` if the root is missing or a directory cannot be
/// read.
pub fn discover(config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(&config.root_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.depth() > 0
                && e.file_type().is_dir()
                && config.is_excluded(&e.file_name().to_string_lossy()))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk {
            root: config.root_dir.clone(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && config.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %config.root_dir.display(), files = files.len(), "discovered files");
    Ok(files)
}
