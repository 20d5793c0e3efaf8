//! Code-keyed handle tables.
//!
//! `CodeIndex` backs both cross-link tables (a function's failures) and
//! serial membership sets (the functions seen under a serial). It records
//! *references* to canonical entities, never the entities themselves.

use std::collections::BTreeMap;

use crate::registry::Handle;

/// Ordered map from entity code to the canonical entity handle.
#[derive(Clone, Debug)]
pub struct CodeIndex<H> {
    entries: BTreeMap<String, H>,
}

impl<H: Handle> CodeIndex<H> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `handle` under `code` unless the code is already present.
    ///
    /// Returns `true` when the entry was added.
    pub(crate) fn insert(&mut self, code: &str, handle: H) -> bool {
        if self.entries.contains_key(code) {
            return false;
        }
        self.entries.insert(code.to_string(), handle);
        true
    }

    pub fn get(&self, code: &str) -> Option<H> {
        self.entries.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, H)> + '_ {
        self.entries.iter().map(|(code, &handle)| (code.as_str(), handle))
    }
}

impl<H: Handle> Default for CodeIndex<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::{Entity, Function};

    #[test]
    fn test_insert_is_idempotent() {
        let mut registry: Registry<Function> = Registry::new();
        let fn1 = registry.get_or_create("FN1", "One");

        let mut index = CodeIndex::new();
        assert!(index.insert("FN1", fn1));
        assert!(!index.insert("FN1", fn1));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("FN1"), Some(fn1));
    }

    #[test]
    fn test_iter_is_sorted_by_code() {
        let mut registry: Registry<Function> = Registry::new();
        let mut index = CodeIndex::new();
        for code in ["FN3", "FN1", "FN2"] {
            let handle = registry.get_or_create(code, "");
            index.insert(code, handle);
        }

        let codes: Vec<_> = index.codes().collect();
        assert_eq!(codes, vec!["FN1", "FN2", "FN3"]);

        let resolved: Vec<_> = index
            .iter()
            .map(|(code, handle)| (code, registry[handle].code()))
            .collect();
        assert_eq!(resolved, vec![("FN1", "FN1"), ("FN2", "FN2"), ("FN3", "FN3")]);
    }
}
