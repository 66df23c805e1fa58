//! Ordered rule sets and the built-in presets
//!
//! A [`RuleSet`] applies its rules strictly in order, each rule seeing the
//! output of the previous one. Earlier rules therefore win on overlapping
//! spans.
//!
//! # Presets
//!
//! | Preset     | Purpose                                              |
//! |------------|------------------------------------------------------|
//! | `standard` | full pipeline: collapse, canonicalize, upgrade       |
//! | `fix`      | canonicalize legacy pairs and upgrade bare classes   |
//! | `cleanup`  | collapse duplicated dark classes left by earlier runs |
//!
//! Only `standard` is guaranteed idempotent: it re-runs the whole pipeline
//! until a round changes nothing, so its output is always a fixed point.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Captures;
use tracing::{debug, trace, warn};

use crate::normalizer::Normalized;
use crate::rule::{Replacement, Rule};
use crate::Result;

/// The canonical light/dark gray text pair
pub const CANONICAL_PAIR: &str = "text-gray-500 dark:text-gray-400";

// ── Preset ────────────────────────────────────────────────

/// Named built-in rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Standard,
    Fix,
    Cleanup,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Standard, Preset::Fix, Preset::Cleanup];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::Fix => "fix",
            Preset::Cleanup => "cleanup",
        }
    }

    /// Verb used when reporting a rewritten file
    pub fn verb(self) -> &'static str {
        match self {
            Preset::Standard | Preset::Fix => "Fixed",
            Preset::Cleanup => "Cleaned",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown preset '{}' (expected standard, fix or cleanup)", s))
    }
}

// ── RuleSet ───────────────────────────────────────────────

/// Upper bound on whole-pipeline rounds for a converging rule set
const MAX_ROUNDS: usize = 16;

/// An ordered sequence of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    converge: bool,
}

static STANDARD: Lazy<RuleSet> = Lazy::new(|| compile_builtin(Preset::Standard));
static FIX: Lazy<RuleSet> = Lazy::new(|| compile_builtin(Preset::Fix));
static CLEANUP: Lazy<RuleSet> = Lazy::new(|| compile_builtin(Preset::Cleanup));

fn compile_builtin(preset: Preset) -> RuleSet {
    // Built-in patterns are constants; failing here is a programming error.
    RuleSet::build(preset)
        .unwrap_or_else(|e| panic!("built-in preset '{}' failed to compile: {}", preset, e))
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            converge: false,
        }
    }

    /// Re-run the full sequence until a round produces no change
    pub fn converging(mut self) -> Self {
        self.converge = true;
        self
    }

    pub fn is_converging(&self) -> bool {
        self.converge
    }

    /// Shared, compiled-once instance of a built-in preset
    pub fn preset(preset: Preset) -> &'static RuleSet {
        match preset {
            Preset::Standard => &*STANDARD,
            Preset::Fix => &*FIX,
            Preset::Cleanup => &*CLEANUP,
        }
    }

    /// Compile a fresh instance of a built-in preset
    pub fn build(preset: Preset) -> Result<RuleSet> {
        let set = match preset {
            Preset::Standard => RuleSet::new(vec![
                collapse_repeated_dark_500()?,
                collapse_dark_500_triples()?,
                drop_dangling_dark_500()?,
                collapse_gray_chain()?,
                keep_last_dark_class()?,
                canonical_pair_300_600(),
                canonical_pair_400_500(),
                upgrade_standalone_400()?,
                upgrade_standalone_300()?,
                upgrade_remaining_light_gray()?,
            ])
            .converging(),
            Preset::Fix => RuleSet::new(vec![
                canonical_pair_300_600(),
                canonical_pair_400_500(),
                upgrade_standalone_400()?,
                upgrade_standalone_300()?,
            ]),
            Preset::Cleanup => RuleSet::new(vec![
                drop_dangling_dark_500()?,
                collapse_dark_500_triples()?,
                collapse_repeated_dark_500()?,
                collapse_gray_chain()?,
                keep_last_dark_class()?,
                upgrade_remaining_light_gray()?,
            ]),
        };
        Ok(set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order over `text`
    ///
    /// A converging set repeats the sequence until its output is stable, so
    /// applying it to its own output is a no-op.
    pub fn apply(&self, text: &str) -> Normalized {
        let mut current = self.apply_round(text);
        if self.converge && current != text {
            let mut stable = false;
            for round in 2..=MAX_ROUNDS {
                let next = self.apply_round(&current);
                if next == current {
                    debug!(rounds = round, "rule set converged");
                    stable = true;
                    break;
                }
                current = next;
            }
            if !stable {
                warn!(rounds = MAX_ROUNDS, "rule set round limit reached");
            }
        }
        let changed = current != text;
        Normalized {
            text: current,
            changed,
        }
    }

    fn apply_round(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let next = rule.apply(&current);
            if next != current {
                trace!(rule = rule.name(), "rule fired");
                current = next;
            }
        }
        current
    }
}

// ── Built-in rules ────────────────────────────────────────

fn collapse_repeated_dark_500() -> Result<Rule> {
    Rule::pattern(
        "collapse-repeated-dark-500",
        "Collapse two or more dark:text-gray-500 in a row to one",
        r"(?:dark:text-gray-500\s*){2,}",
        Replacement::template("dark:text-gray-500 "),
    )
}

fn collapse_dark_500_triples() -> Result<Rule> {
    Rule::pattern(
        "collapse-dark-500-triples",
        "text-gray-500 dark:text-gray-500 [dark:text-gray-500] dark:text-gray-400 -> canonical pair",
        r"text-gray-500\s*(?:dark:text-gray-500\s*){1,2}dark:text-gray-400",
        Replacement::template(CANONICAL_PAIR),
    )
}

fn drop_dangling_dark_500() -> Result<Rule> {
    Rule::pattern(
        "drop-dangling-dark-500",
        "Drop dark:text-gray-500 directly before dark:text-gray-400",
        r"dark:text-gray-500\s*dark:text-gray-400",
        Replacement::template("dark:text-gray-400"),
    )
}

fn collapse_gray_chain() -> Result<Rule> {
    Ok(Rule::pattern(
        "collapse-gray-chain",
        "text-gray-N followed by two or more dark:text-gray-M -> text-gray-N dark:text-gray-400",
        r"(text-gray-\d+)\s+(?:dark:text-gray-\d+\s+)+dark:text-gray-\d+",
        Replacement::template("${1} dark:text-gray-400"),
    )?
    .to_fixpoint())
}

fn keep_last_dark_class() -> Result<Rule> {
    // Classes glued together without whitespace can leave a new run behind
    // after one pass, e.g. `dark:text-a-dark:text-b dark:text-c`.
    Ok(Rule::pattern(
        "keep-last-dark-class",
        "Runs of dark:text-* classes involving a gray shade keep only the last class",
        r"(?:dark:text-[a-z0-9-]+\s+)+dark:text-[a-z0-9-]+",
        Replacement::Computed(last_dark_class),
    )?
    .to_fixpoint())
}

/// Runs made only of non-gray dark classes are left alone.
fn last_dark_class(caps: &Captures<'_>) -> String {
    let run = &caps[0];
    if !run.contains("dark:text-gray-") {
        return run.to_string();
    }
    run.split_whitespace().last().unwrap_or(run).to_string()
}

fn canonical_pair_300_600() -> Rule {
    Rule::literal(
        "canonical-pair-300-600",
        "text-gray-300 dark:text-gray-600 -> canonical pair",
        "text-gray-300 dark:text-gray-600",
        CANONICAL_PAIR,
    )
}

fn canonical_pair_400_500() -> Rule {
    Rule::literal(
        "canonical-pair-400-500",
        "text-gray-400 dark:text-gray-500 -> canonical pair",
        "text-gray-400 dark:text-gray-500",
        CANONICAL_PAIR,
    )
}

fn upgrade_standalone_400() -> Result<Rule> {
    Rule::standalone(
        "upgrade-standalone-400",
        "Bare text-gray-400 without a dark: companion -> canonical pair",
        r"text-gray-400",
        Replacement::template(CANONICAL_PAIR),
    )
}

fn upgrade_standalone_300() -> Result<Rule> {
    Rule::standalone(
        "upgrade-standalone-300",
        "Bare text-gray-300 without a dark: companion -> canonical pair",
        r"text-gray-300",
        Replacement::template(CANONICAL_PAIR),
    )
}

fn upgrade_remaining_light_gray() -> Result<Rule> {
    Rule::standalone(
        "upgrade-remaining-light-gray",
        "Any remaining bare text-gray-300/400 -> canonical pair",
        r"text-gray-[34]00",
        Replacement::template(CANONICAL_PAIR),
    )
}
