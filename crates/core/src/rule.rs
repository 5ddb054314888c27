//! Checklist rule and evaluation outcome types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Signature of a user-supplied check: `(page, parent) -> Ok(is_valid)`.
///
/// Checks receive shared references, so they cannot mutate state visible to
/// subsequent rules or to the caller. A returned error (or a panic) is
/// contained at the rule boundary and surfaces as a [`RuleOutcome::Faulted`].
pub type CheckFn = Arc<dyn Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync>;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Whether a failed rule blocks publishing or is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "ERROR" => Ok(Self::Error),
            "WARNING" => Ok(Self::Warning),
            _ => Err(CoreError::Request(format!(
                "Invalid severity: '{s}'. Must be one of: ERROR, WARNING"
            ))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A named validation rule registered against a page type.
///
/// Rules are constructed once at registration time and reused across every
/// evaluation; they carry no per-evaluation state.
#[derive(Clone)]
pub struct Rule {
    name: String,
    message: String,
    check: CheckFn,
}

impl Rule {
    pub(crate) fn new(name: &str, message: &str, check: CheckFn) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
            check,
        }
    }

    /// Display name of the check. Not unique: independent rules may share a
    /// name so they aggregate under one checklist entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description shown to the editor.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Run the user-supplied check against a page and its parent.
    pub(crate) fn check(&self, page: &Value, parent: &Value) -> anyhow::Result<bool> {
        (self.check.as_ref())(page, parent)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Rule for {}: '{}'>", self.name, self.message)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of running one rule against one page instance.
///
/// Faulted rules count as valid for publish-gating purposes but are flagged
/// so the editor knows the check could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Passed,
    Failed,
    Faulted { detail: String },
}

impl RuleOutcome {
    /// Whether this outcome blocks publishing. Faults fail open.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    /// Whether the rule implementation itself broke.
    pub fn has_fault(&self) -> bool {
        matches!(self, Self::Faulted { .. })
    }
}

/// An independent per-evaluation result value for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub name: String,
    pub message: String,
    pub severity: Severity,
    pub outcome: RuleOutcome,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
