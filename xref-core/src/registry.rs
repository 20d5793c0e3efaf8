//! Canonical entity storage.
//!
//! A [`Registry`] owns every entity of one kind, keyed by code. Entities are
//! kept in insertion order and addressed by their position, which never
//! changes because entities are never removed.

use std::fmt;
use std::hash::Hash;
use std::ops::Index;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::types::{CodeLabel, Entity};

/// Position of an entity in its registry.
pub trait Handle: Copy + Eq + Ord + Hash + fmt::Debug {
    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

/// All entities of one kind, deduplicated by code.
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Return the entity for `code`, creating it with `label` if absent.
    ///
    /// The label of an existing entity is never changed.
    pub fn get_or_create(&mut self, code: &str, label: &str) -> T::Handle {
        if let Some((index, _, existing)) = self.entries.get_full(code) {
            if existing.label() != label {
                debug!(
                    kind = T::KIND,
                    code,
                    kept = existing.label(),
                    ignored = label,
                    "Label differs from first occurrence"
                );
            }
            return T::Handle::from_index(index);
        }

        let (index, _) = self
            .entries
            .insert_full(code.to_string(), T::from_ident(CodeLabel::new(code, label)));
        trace!(kind = T::KIND, code, "Created entity");
        T::Handle::from_index(index)
    }

    pub fn get(&self, handle: T::Handle) -> Option<&T> {
        self.entries.get_index(handle.index()).map(|(_, entity)| entity)
    }

    pub(crate) fn get_mut(&mut self, handle: T::Handle) -> &mut T {
        &mut self.entries[handle.index()]
    }

    pub fn find(&self, code: &str) -> Option<T::Handle> {
        self.entries.get_index_of(code).map(T::Handle::from_index)
    }

    pub fn by_code(&self, code: &str) -> Option<&T> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Handle, &T)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(i, entity)| (T::Handle::from_index(i), entity))
    }
}

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Index<T::Handle> for Registry<T> {
    type Output = T;

    fn index(&self, handle: T::Handle) -> &T {
        &self.entries[handle.index()]
    }
}

impl<T: Entity> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &T::KIND)
            .field("len", &self.entries.len())
            .finish()
    }
}
