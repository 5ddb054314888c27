//! Rule evaluation with fault containment.
//!
//! Checks are user-supplied code: a check that returns an error or panics is
//! caught at the rule boundary, logged for operator visibility, and reported
//! as a faulted-but-passing outcome so one broken rule cannot abort the rest
//! of the batch.

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::engine::ChecklistEngine;
use crate::error::CoreError;
use crate::rule::{Rule, RuleOutcome, RuleResult, Severity};

impl ChecklistEngine {
    /// Check the page instance against all rules resolved for `page_type`.
    ///
    /// Returns `(error_results, warning_results)`. Error rules run entirely
    /// before warning rules; within each severity, results follow resolution
    /// order. Never fails on account of rule logic — only an unknown page
    /// type is an error.
    pub fn check_rules(
        &self,
        page_type: &str,
        page: &Value,
        parent: &Value,
    ) -> Result<(Vec<RuleResult>, Vec<RuleResult>), CoreError> {
        let error_rules = self.resolved_rules(page_type, Severity::Error)?;
        let warning_rules = self.resolved_rules(page_type, Severity::Warning)?;

        let error_results = evaluate_rules(&error_rules, Severity::Error, page, parent);
        let warning_results = evaluate_rules(&warning_rules, Severity::Warning, page, parent);
        Ok((error_results, warning_results))
    }
}

/// Run every rule in order, producing an independent result per rule.
pub(crate) fn evaluate_rules(
    rules: &[&Rule],
    severity: Severity,
    page: &Value,
    parent: &Value,
) -> Vec<RuleResult> {
    rules
        .iter()
        .map(|rule| RuleResult {
            name: rule.name().to_string(),
            message: rule.message().to_string(),
            severity,
            outcome: run_check(rule, page, parent),
        })
        .collect()
}

/// Run a single check, containing returned errors and panics.
fn run_check(rule: &Rule, page: &Value, parent: &Value) -> RuleOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| rule.check(page, parent)));
    match result {
        Ok(Ok(true)) => RuleOutcome::Passed,
        Ok(Ok(false)) => RuleOutcome::Failed,
        Ok(Err(err)) => {
            tracing::error!(
                rule = rule.name(),
                message = rule.message(),
                error = %err,
                "Rule check failed to evaluate"
            );
            RuleOutcome::Faulted {
                detail: err.to_string(),
            }
        }
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            tracing::error!(
                rule = rule.name(),
                message = rule.message(),
                error = %detail,
                "Rule check panicked"
            );
            RuleOutcome::Faulted { detail }
        }
    }
}

/// Extract a readable message from a panic payload.
fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule check panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
