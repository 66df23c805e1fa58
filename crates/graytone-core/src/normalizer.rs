//! Gray text-color normalizer: rewrites class lists to the canonical pair
//!
//! The normalizer is a pure text transform. It knows nothing about the
//! markup it runs over: a file is just a string, and the result is a new
//! string plus a flag telling whether anything changed.
//!
//! # Pipeline
//!
//! `text → collapse duplicates → collapse chains (fixpoint) → keep last dark
//! class (fixpoint) → canonicalize legacy pairs → upgrade bare light grays`
//!
//! The whole pipeline is repeated until a round changes nothing.
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x).text) == normalize(x)` for any
//!   string, including class tokens glued together without whitespace
//! - **Deterministic**: same input always produces same output
//! - **Total**: never fails, never touches the filesystem

use crate::ruleset::{Preset, RuleSet};

/// Output of one normalization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// `text` differs from the input
    pub changed: bool,
}

/// Normalize text with the standard rule set
pub fn normalize(text: &str) -> Normalized {
    normalize_with(text, Preset::Standard)
}

/// Normalize text with a built-in preset
pub fn normalize_with(text: &str, preset: Preset) -> Normalized {
    RuleSet::preset(preset).apply(text)
}
