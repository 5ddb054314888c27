//! Page type hierarchy registry.
//!
//! The engine does not reflect over host types. Instead, the governed set of
//! page types and their supertype relationships is declared up front, and
//! rule inheritance walks this explicit hierarchy.

use std::collections::HashMap;

use crate::error::CoreError;

/// Registered page types and their declared parent types.
///
/// A subtype's parent must already be registered, which keeps the hierarchy
/// acyclic by construction and makes ancestor walks total.
#[derive(Debug, Clone, Default)]
pub struct PageTypeRegistry {
    parents: HashMap<String, Option<String>>,
}

impl PageTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root page type (no supertype).
    pub fn register_root(&mut self, name: &str) -> Result<(), CoreError> {
        self.register(name, None)
    }

    /// Register a page type as a subtype of an already-registered parent.
    pub fn register_subtype(&mut self, name: &str, parent: &str) -> Result<(), CoreError> {
        self.register(name, Some(parent))
    }

    fn register(&mut self, name: &str, parent: Option<&str>) -> Result<(), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Registration(
                "Page type name must not be empty".to_string(),
            ));
        }
        if self.parents.contains_key(name) {
            return Err(CoreError::Registration(format!(
                "Page type '{name}' is already registered"
            )));
        }
        if let Some(parent) = parent {
            if !self.parents.contains_key(parent) {
                return Err(CoreError::Registration(format!(
                    "Cannot register page type '{name}': parent '{parent}' is not a registered \
                     page type"
                )));
            }
        }
        self.parents
            .insert(name.to_string(), parent.map(str::to_string));
        Ok(())
    }

    /// Returns `true` if `name` is a registered page type.
    pub fn is_registered(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// The ancestor chain for `name`, ordered most-base ancestor first and
    /// ending with `name` itself.
    pub fn ancestor_chain(&self, name: &str) -> Result<Vec<&str>, CoreError> {
        let mut current = self
            .parents
            .get_key_value(name)
            .map(|(key, _)| key.as_str());
        if current.is_none() {
            return Err(CoreError::UnknownPageType(name.to_string()));
        }
        let mut chain = Vec::new();
        while let Some(ty) = current {
            chain.push(ty);
            // Parents are validated at registration, so the walk is total.
            current = self.parents.get(ty).and_then(|parent| parent.as_deref());
        }
        chain.reverse();
        Ok(chain)
    }

    /// Returns `true` if `name` is `ancestor` or one of its subtypes.
    pub fn is_subtype_of(&self, name: &str, ancestor: &str) -> bool {
        self.ancestor_chain(name)
            .map(|chain| chain.contains(&ancestor))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
