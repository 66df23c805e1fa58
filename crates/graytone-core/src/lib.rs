//! graytone core: gray text-color normalization for light/dark themes
//!
//! Rewrites Tailwind-style gray text classes in UI source files to one
//! canonical light/dark pair, `text-gray-500 dark:text-gray-400`.
//!
//! # Architecture
//!
//! ```text
//! ScanConfig → walk::discover → paths
//!                                 ↓
//!                  TextStore::read → RuleSet::apply → Normalized
//!                                                         ↓ (changed)
//!                                                TextStore::write → Report
//! ```
//!
//! # Guarantees
//!
//! - **Pure core**: the normalizer never touches the filesystem
//! - **Deterministic**: same input always produces identical output
//! - **Idempotent**: a second pass with the standard rules changes nothing
//! - **Fail fast**: the first I/O error aborts a batch

pub mod config;
pub mod error;
pub mod normalizer;
pub mod rule;
pub mod ruleset;
pub mod runner;
pub mod store;
pub mod walk;

pub use config::ScanConfig;
pub use error::{Error, Result};
pub use normalizer::{normalize, normalize_with, Normalized};
pub use rule::{Replacement, Rule};
pub use ruleset::{Preset, RuleSet, CANONICAL_PAIR};
pub use runner::{run, Report, RunMode};
pub use store::{FsStore, MemoryStore, TextStore};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
