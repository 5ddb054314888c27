//! Checklist report building.
//!
//! Merges three result streams — framework field errors, custom error rules,
//! custom warning rules — into one structure grouped by display name, the
//! shape the editor UI renders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::ChecklistEngine;
use crate::error::CoreError;
use crate::rule::{RuleOutcome, RuleResult, Severity};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One line of the checklist as rendered by the editor UI.
///
/// `has_error` flags a broken rule implementation (serialized `hasError`),
/// which is distinct from a validation failure (`isValid: false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    pub is_valid: bool,
    pub has_error: bool,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
}

/// The full grouped report returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistReport {
    pub checklist: BTreeMap<String, Vec<ChecklistEntry>>,
}

/// A framework-native field error: one field, its messages in display order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Normalize a rule or field name into its checklist display key.
///
/// Lower-cases and replaces underscores with spaces, so `Main_Image` and
/// `main_image` aggregate under the same entry.
pub fn normalize_check_name(name: &str) -> String {
    name.to_lowercase().replace('_', " ")
}

// ---------------------------------------------------------------------------
// Report building
// ---------------------------------------------------------------------------

/// Build the grouped checklist from the three result streams.
///
/// Source order per name: field errors first, then custom error rules, then
/// custom warning rules. Entries sharing a normalized name accumulate into
/// the same list — naming collisions across sources are how independent
/// checks aggregate under one display name.
pub fn build_report(
    field_results: &[RuleResult],
    error_results: &[RuleResult],
    warning_results: &[RuleResult],
) -> ChecklistReport {
    let mut checklist: BTreeMap<String, Vec<ChecklistEntry>> = BTreeMap::new();
    for result in field_results
        .iter()
        .chain(error_results)
        .chain(warning_results)
    {
        let entry = ChecklistEntry {
            is_valid: result.outcome.is_valid(),
            has_error: result.outcome.has_fault(),
            severity: result.severity,
            message: result.message.clone(),
        };
        checklist
            .entry(normalize_check_name(&result.name))
            .or_default()
            .push(entry);
    }
    ChecklistReport { checklist }
}

impl ChecklistEngine {
    /// Convert framework field errors into failed ERROR-severity results,
    /// dropping any field whose name is ignored for `page_type`.
    ///
    /// The ignore mask is the same one applied to custom rules; a masked
    /// field is dropped entirely, not relabeled.
    pub fn field_error_results(
        &self,
        page_type: &str,
        field_errors: &[FieldError],
    ) -> Result<Vec<RuleResult>, CoreError> {
        let ignored = self.resolved_ignored_names(page_type)?;
        let mut results = Vec::new();
        for field_error in field_errors {
            if ignored.contains(&field_error.field) {
                continue;
            }
            for message in &field_error.messages {
                results.push(RuleResult {
                    name: field_error.field.clone(),
                    message: message.clone(),
                    severity: Severity::Error,
                    // A field error is always a confirmed failure.
                    outcome: RuleOutcome::Failed,
                });
            }
        }
        Ok(results)
    }

    /// Run the full checklist pipeline for one validation request: filter
    /// field errors, evaluate custom rules, merge into the grouped report.
    pub fn run_checklist(
        &self,
        page_type: &str,
        page: &Value,
        parent: &Value,
        field_errors: &[FieldError],
    ) -> Result<ChecklistReport, CoreError> {
        let field_results = self.field_error_results(page_type, field_errors)?;
        let (error_results, warning_results) = self.check_rules(page_type, page, parent)?;
        Ok(build_report(
            &field_results,
            &error_results,
            &warning_results,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
