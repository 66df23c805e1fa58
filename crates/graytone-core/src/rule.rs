//! Rewrite rules: the single step of the normalization pipeline
//!
//! A [`Rule`] is a pure `&str → String` function. Two kinds exist:
//!
//! - **Literal**: every non-overlapping occurrence of an exact substring is
//!   replaced.
//! - **Pattern**: every match of a regular expression is replaced by a
//!   template (`${1}` style) or by a value computed from the captures.
//!
//! Any rule may be marked as a fixpoint rule, in which case it is re-applied
//! until a full pass changes nothing.
//!
//! # Standalone tokens
//!
//! The `regex` crate has no lookaround, so "bare class token" matching is
//! done by [`Rule::standalone`], which filters matches on their surroundings:
//!
//! - the preceding character must not be alphanumeric, `_`, `:` or `-`
//!   (so `dark:text-gray-400` or `hover:text-gray-400` never match)
//! - the following character must not be a word character
//! - the token must not already be followed by whitespace and `dark:`

use std::fmt;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::{Error, Result};

// ── Replacement ───────────────────────────────────────────

/// What a pattern match is replaced with
#[derive(Clone)]
pub enum Replacement {
    /// Expansion template, `${1}` refers to capture group 1
    Template(String),
    /// Computed from the captures of the match
    Computed(fn(&Captures<'_>) -> String),
}

impl Replacement {
    pub fn template(template: impl Into<String>) -> Self {
        Replacement::Template(template.into())
    }

    fn append(&self, caps: &Captures<'_>, out: &mut String) {
        match self {
            Replacement::Template(t) => caps.expand(t, out),
            Replacement::Computed(f) => out.push_str(&f(caps)),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ── Rule ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum RuleKind {
    Literal {
        from: String,
        to: String,
    },
    Pattern {
        regex: Regex,
        replacement: Replacement,
        standalone: bool,
    },
}

/// A single named rewrite step
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    kind: RuleKind,
    fixpoint: bool,
}

impl Rule {
    /// Exact substring replacement
    pub fn literal(
        name: impl Into<String>,
        description: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Rule {
            name: name.into(),
            description: description.into(),
            kind: RuleKind::Literal {
                from: from.into(),
                to: to.into(),
            },
            fixpoint: false,
        }
    }

    /// Regex replacement applied to every match
    ///
    /// # Errors
    /// Returns `Error::Rule` if the pattern does not compile.
    pub fn pattern(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        replacement: Replacement,
    ) -> Result<Self> {
        Self::compile(name.into(), description.into(), pattern, replacement, false)
    }

    /// Regex replacement applied only to matches that stand alone as a
    /// class token (see the module docs for the exact boundary rules)
    ///
    /// # Errors
    /// Returns `Error::Rule` if the pattern does not compile or can match
    /// the empty string.
    pub fn standalone(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        replacement: Replacement,
    ) -> Result<Self> {
        let rule = Self::compile(name.into(), description.into(), pattern, replacement, true)?;
        if let RuleKind::Pattern { regex, .. } = &rule.kind {
            if regex.is_match("") {
                return Err(Error::Rule {
                    name: rule.name,
                    message: "standalone pattern must not match the empty string".into(),
                });
            }
        }
        Ok(rule)
    }

    fn compile(
        name: String,
        description: String,
        pattern: &str,
        replacement: Replacement,
        standalone: bool,
    ) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::Rule {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Rule {
            name,
            description,
            kind: RuleKind::Pattern {
                regex,
                replacement,
                standalone,
            },
            fixpoint: false,
        })
    }

    /// Re-apply this rule until a pass produces no change
    pub fn to_fixpoint(mut self) -> Self {
        self.fixpoint = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_fixpoint(&self) -> bool {
        self.fixpoint
    }

    /// Apply the rule to `text`, producing a new string
    pub fn apply(&self, text: &str) -> String {
        if !self.fixpoint {
            return self.apply_once(text);
        }

        // A fixpoint rule must shrink the text each time it fires, so
        // len + 1 passes is always enough to reach a stable result.
        let mut current = self.apply_once(text);
        if current == text {
            return current;
        }
        for pass in 1..=text.len() {
            let next = self.apply_once(&current);
            if next == current {
                debug!(rule = %self.name, passes = pass, "fixpoint reached");
                return current;
            }
            current = next;
        }
        warn!(rule = %self.name, "fixpoint pass limit reached");
        current
    }

    fn apply_once(&self, text: &str) -> String {
        match &self.kind {
            RuleKind::Literal { from, to } => text.replace(from.as_str(), to),
            RuleKind::Pattern {
                regex,
                replacement,
                standalone: false,
            } => match replacement {
                Replacement::Template(t) => regex.replace_all(text, t.as_str()).into_owned(),
                Replacement::Computed(f) => regex
                    .replace_all(text, |caps: &Captures<'_>| f(caps))
                    .into_owned(),
            },
            RuleKind::Pattern {
                regex,
                replacement,
                standalone: true,
            } => replace_standalone(regex, replacement, text),
        }
    }
}

// ── Standalone matching ───────────────────────────────────

fn replace_standalone(regex: &Regex, replacement: &Replacement, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos < text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };

        if is_standalone(text, m.start(), m.end()) {
            out.push_str(&text[copied..m.start()]);
            replacement.append(&caps, &mut out);
            copied = m.end();
            pos = m.end();
        } else {
            // Rejected: retry one character further so a match starting
            // inside this one is still found.
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    if before.is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-')) {
        return false;
    }

    let rest = &text[end..];
    if rest.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }

    !has_dark_companion(rest)
}

/// True if `rest` starts with whitespace followed by a `dark:` variant
fn has_dark_companion(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len() && trimmed.starts_with("dark:")
}
