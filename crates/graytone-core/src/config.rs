//! Scan configuration: which files a run visits
//!
//! ```toml
//! # graytone.toml
//! root_dir = "src"
//! extensions = [".tsx", ".ts"]
//! exclude = ["node_modules"]
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "graytone.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory scanned recursively
    pub root_dir: PathBuf,
    /// File name suffixes to include, e.g. `.tsx`
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("src"),
            extensions: vec![".tsx".into(), ".ts".into()],
            exclude: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Load a config file
    ///
    /// # Errors
    /// `Error::Io` if the file cannot be read, `Error::Config` if it is not
    /// valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load `graytone.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn from_toml(text: &str) -> std::result::Result<Self, String> {
        let mut config: ScanConfig = toml::from_str(text).map_err(|e| e.to_string())?;
        config.extensions = config.extensions.iter().map(|e| dotted(e)).collect();
        Ok(config)
    }

    /// Replace the extension list, adding a leading dot where missing
    pub fn set_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions.into_iter().map(|e| dotted(e.as_ref())).collect();
    }

    /// True if the file name ends in one of the configured suffixes
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.iter().any(|d| d == dir_name)
    }
}

fn dotted(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.root_dir, PathBuf::from("src"));
        assert_eq!(config.extensions, vec![".tsx", ".ts"]);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ScanConfig::from_toml(r#"root_dir = "app""#).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("app"));
        assert_eq!(config.extensions, vec![".tsx", ".ts"]);
    }

    #[test]
    fn test_extensions_get_leading_dot() {
        let config = ScanConfig::from_toml(r#"extensions = ["jsx", ".vue"]"#).unwrap();
        assert_eq!(config.extensions, vec![".jsx", ".vue"]);

        let mut config = ScanConfig::default();
        config.set_extensions(["html"]);
        assert_eq!(config.extensions, vec![".html"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ScanConfig::from_toml("roots = [\"src\"]").is_err());
    }

    #[test]
    fn test_matches_is_suffix_match() {
        let config = ScanConfig::default();
        assert!(config.matches("App.tsx"));
        assert!(config.matches("types.d.ts"));
        assert!(!config.matches("App.jsx"));
        assert!(!config.matches("tsx"));
    }

    #[test]
    fn test_load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "root_dir = [").unwrap();
        match ScanConfig::load(&path) {
            Err(Error::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ScanConfig::discover(dir.path()).unwrap(), ScanConfig::default());
    }

    #[test]
    fn test_discover_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "root_dir = \"web\"\nexclude = [\"node_modules\"]\n",
        )
        .unwrap();
        let config = ScanConfig::discover(dir.path()).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("web"));
        assert!(config.is_excluded("node_modules"));
    }
}
