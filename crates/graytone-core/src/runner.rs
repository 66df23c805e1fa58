//! Batch runner: normalizes every discovered file, one at a time
//!
//! Files are independent: each is read, normalized and, when changed,
//! written back before the next one is touched. The first I/O error aborts
//! the batch and is returned unchanged; no partial report is produced.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::ruleset::{Preset, RuleSet};
use crate::store::TextStore;
use crate::walk;
use crate::Result;

/// Whether changed files are written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Write,
    /// Report what would change, write nothing
    DryRun,
}

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub preset: Preset,
    pub dry_run: bool,
    pub scanned: usize,
    pub changed: Vec<PathBuf>,
}

impl Report {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Discover files per `config` and normalize each of them
///
/// `on_change` is called with each changed path right after it has been
/// handled, so callers can report progress as the batch runs.
///
/// # Errors
/// Any walk, read or write failure, as soon as it happens.
pub fn run<S, F>(
    config: &ScanConfig,
    preset: Preset,
    store: &mut S,
    mode: RunMode,
    on_change: F,
) -> Result<Report>
where
    S: TextStore,
    F: FnMut(&Path),
{
    let paths = walk::discover(config)?;
    process_paths(&paths, preset, store, mode, on_change)
}

/// Normalize an explicit list of files
pub fn process_paths<S, F>(
    paths: &[PathBuf],
    preset: Preset,
    store: &mut S,
    mode: RunMode,
    mut on_change: F,
) -> Result<Report>
where
    S: TextStore,
    F: FnMut(&Path),
{
    let rules = RuleSet::preset(preset);
    let mut changed = Vec::new();

    for path in paths {
        let original = store.read(path)?;
        let normalized = rules.apply(&original);
        if !normalized.changed {
            debug!(path = %path.display(), "unchanged");
            continue;
        }

        if mode == RunMode::Write {
            store.write(path, &normalized.text)?;
            info!(path = %path.display(), preset = %preset, "rewrote file");
        } else {
            info!(path = %path.display(), preset = %preset, "would rewrite file");
        }
        on_change(path);
        changed.push(path.clone());
    }

    Ok(Report {
        preset,
        dry_run: mode == RunMode::DryRun,
        scanned: paths.len(),
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FsStore, MemoryStore};
    use crate::Error;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn sample_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert("a.tsx", "<p className=\"text-gray-400\" />");
        store.insert("b.tsx", "<p className=\"text-gray-500 dark:text-gray-400\" />");
        store.insert("c.ts", "const c = 'text-gray-300 dark:text-gray-600';");
        store
    }

    #[test]
    fn test_write_mode_rewrites_only_changed_files() {
        let mut store = sample_store();
        let mut reported = Vec::new();
        let report = process_paths(
            &paths(&["a.tsx", "b.tsx", "c.ts"]),
            Preset::Standard,
            &mut store,
            RunMode::Write,
            |p| reported.push(p.to_path_buf()),
        )
        .unwrap();

        assert_eq!(report.scanned, 3);
        assert_eq!(report.changed, paths(&["a.tsx", "c.ts"]));
        assert_eq!(reported, report.changed);
        assert_eq!(store.writes(), paths(&["a.tsx", "c.ts"]).as_slice());
        assert_eq!(
            store.get(Path::new("c.ts")),
            Some("const c = 'text-gray-500 dark:text-gray-400';")
        );
        assert!(!report.dry_run);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut store = sample_store();
        let report = process_paths(
            &paths(&["a.tsx", "b.tsx"]),
            Preset::Standard,
            &mut store,
            RunMode::DryRun,
            |_| {},
        )
        .unwrap();

        assert!(report.dry_run);
        assert!(report.has_changes());
        assert!(store.writes().is_empty());
        assert_eq!(
            store.get(Path::new("a.tsx")),
            Some("<p className=\"text-gray-400\" />")
        );
    }

    #[test]
    fn test_second_run_reports_nothing() {
        let mut store = sample_store();
        let all = paths(&["a.tsx", "b.tsx", "c.ts"]);
        process_paths(&all, Preset::Standard, &mut store, RunMode::Write, |_| {}).unwrap();
        let again = process_paths(&all, Preset::Standard, &mut store, RunMode::Write, |_| {}).unwrap();
        assert!(!again.has_changes());
    }

    #[test]
    fn test_read_failure_aborts_batch() {
        let mut store = sample_store();
        let result = process_paths(
            &paths(&["a.tsx", "missing.tsx", "c.ts"]),
            Preset::Standard,
            &mut store,
            RunMode::Write,
            |_| {},
        );
        assert!(matches!(result, Err(Error::Io { .. })));
        // Files before the failure were already handled, later ones not
        assert_eq!(store.writes(), paths(&["a.tsx"]).as_slice());
    }

    #[test]
    fn test_run_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("App.tsx"), "<h1 className=\"text-gray-400\" />").unwrap();
        std::fs::write(dir.path().join("notes.md"), "text-gray-400").unwrap();
        let config = ScanConfig {
            root_dir: dir.path().to_path_buf(),
            ..ScanConfig::default()
        };

        let report = run(&config, Preset::Standard, &mut FsStore, RunMode::Write, |_| {}).unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.changed, vec![dir.path().join("App.tsx")]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("App.tsx")).unwrap(),
            "<h1 className=\"text-gray-500 dark:text-gray-400\" />"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.md")).unwrap(),
            "text-gray-400"
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = Report {
            preset: Preset::Cleanup,
            dry_run: true,
            scanned: 2,
            changed: paths(&["a.tsx"]),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["preset"], "cleanup");
        assert_eq!(json["scanned"], 2);
        assert_eq!(json["changed"][0], "a.tsx");
    }
}
