//! Checklist engine — rule registration and inheritance-aware resolution.
//!
//! An engine owns three registries (error rules, warning rules, ignored rule
//! names), each keyed by page type, plus the page type hierarchy they are
//! resolved against. Registration happens once at process startup; resolution
//! and evaluation are read-only and safe to share across threads.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::error::CoreError;
use crate::hierarchy::PageTypeRegistry;
use crate::rule::{CheckFn, Rule, Severity};

/// A constructed rule engine. Nothing is process-global: independent engines
/// can coexist.
#[derive(Debug, Default)]
pub struct ChecklistEngine {
    types: PageTypeRegistry,
    error_rules: HashMap<String, Vec<Rule>>,
    warning_rules: HashMap<String, Vec<Rule>>,
    ignored_rules: HashMap<String, BTreeSet<String>>,
}

impl ChecklistEngine {
    /// Create an engine governing the given page type hierarchy.
    pub fn new(types: PageTypeRegistry) -> Self {
        Self {
            types,
            error_rules: HashMap::new(),
            warning_rules: HashMap::new(),
            ignored_rules: HashMap::new(),
        }
    }

    /// The governed page type hierarchy.
    pub fn types(&self) -> &PageTypeRegistry {
        &self.types
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register an error rule against `page_type` and all of its subtypes.
    ///
    /// Registration is not deduplicated: registering the same name twice
    /// yields two independent entries, both surfaced in evaluation output in
    /// registration order.
    pub fn register_error_rule<F>(
        &mut self,
        page_type: &str,
        name: &str,
        message: &str,
        check: F,
    ) -> Result<(), CoreError>
    where
        F: Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        let rule = Self::build_rule(&self.types, page_type, name, message, check)?;
        self.error_rules
            .entry(page_type.to_string())
            .or_default()
            .push(rule);
        Ok(())
    }

    /// Register a warning rule against `page_type` and all of its subtypes.
    pub fn register_warning_rule<F>(
        &mut self,
        page_type: &str,
        name: &str,
        message: &str,
        check: F,
    ) -> Result<(), CoreError>
    where
        F: Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        let rule = Self::build_rule(&self.types, page_type, name, message, check)?;
        self.warning_rules
            .entry(page_type.to_string())
            .or_default()
            .push(rule);
        Ok(())
    }

    /// Suppress the rule named `name` for `page_type` and all of its
    /// subtypes.
    ///
    /// Ignoring is a name-based mask, not a reference to a specific rule: it
    /// also drops framework field errors under that name, and it is not an
    /// error if no rule with the name was ever registered.
    pub fn ignore_rule(&mut self, page_type: &str, name: &str) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Registration(
                "Cannot ignore rule: a name is required".to_string(),
            ));
        }
        if !self.types.is_registered(page_type) {
            return Err(CoreError::Registration(format!(
                "Cannot ignore rule '{name}': '{page_type}' is not a registered page type"
            )));
        }
        self.ignored_rules
            .entry(page_type.to_string())
            .or_default()
            .insert(name.to_string());
        Ok(())
    }

    fn build_rule<F>(
        types: &PageTypeRegistry,
        page_type: &str,
        name: &str,
        message: &str,
        check: F,
    ) -> Result<Rule, CoreError>
    where
        F: Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            return Err(CoreError::Registration(
                "Cannot register rule: a name is required".to_string(),
            ));
        }
        if message.trim().is_empty() {
            return Err(CoreError::Registration(format!(
                "Cannot register rule '{name}': a message is required"
            )));
        }
        if !types.is_registered(page_type) {
            return Err(CoreError::Registration(format!(
                "Cannot register rule '{name}' - '{message}': '{page_type}' is not a registered \
                 page type"
            )));
        }
        let check: CheckFn = std::sync::Arc::new(check);
        Ok(Rule::new(name, message, check))
    }

    // -----------------------------------------------------------------------
    // Builder-style registration
    // -----------------------------------------------------------------------

    /// Chainable form of [`Self::register_error_rule`].
    pub fn with_error_rule<F>(
        mut self,
        page_type: &str,
        name: &str,
        message: &str,
        check: F,
    ) -> Result<Self, CoreError>
    where
        F: Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.register_error_rule(page_type, name, message, check)?;
        Ok(self)
    }

    /// Chainable form of [`Self::register_warning_rule`].
    pub fn with_warning_rule<F>(
        mut self,
        page_type: &str,
        name: &str,
        message: &str,
        check: F,
    ) -> Result<Self, CoreError>
    where
        F: Fn(&Value, &Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.register_warning_rule(page_type, name, message, check)?;
        Ok(self)
    }

    /// Chainable form of [`Self::ignore_rule`].
    pub fn with_ignored_rule(mut self, page_type: &str, name: &str) -> Result<Self, CoreError> {
        self.ignore_rule(page_type, name)?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// The union of ignored rule names for `page_type` and all of its
    /// ancestors. Pure: no side effects.
    pub fn resolved_ignored_names(&self, page_type: &str) -> Result<BTreeSet<String>, CoreError> {
        let mut ignored = BTreeSet::new();
        for ancestor in self.types.ancestor_chain(page_type)? {
            if let Some(names) = self.ignored_rules.get(ancestor) {
                ignored.extend(names.iter().cloned());
            }
        }
        Ok(ignored)
    }

    /// The ordered list of rules applicable to `page_type` at the given
    /// severity, with ignored names filtered out. Pure: no side effects.
    ///
    /// The ancestor chain is walked most-base first, so rules inherited from
    /// a base type always precede rules registered on a subtype; within each
    /// type, registration order is preserved.
    pub fn resolved_rules(
        &self,
        page_type: &str,
        severity: Severity,
    ) -> Result<Vec<&Rule>, CoreError> {
        let registry = match severity {
            Severity::Error => &self.error_rules,
            Severity::Warning => &self.warning_rules,
        };
        let ignored = self.resolved_ignored_names(page_type)?;
        let mut rules = Vec::new();
        for ancestor in self.types.ancestor_chain(page_type)? {
            if let Some(registered) = registry.get(ancestor) {
                rules.extend(
                    registered
                        .iter()
                        .filter(|rule| !ignored.contains(rule.name())),
                );
            }
        }
        Ok(rules)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
