//! Multi-item selection.
//!
//! The set lives behind an `Arc` and every mutation swaps in a freshly built
//! set, so a holder of an older snapshot keeps seeing the old contents and
//! [`Selection::same_instance`] tells renderers whether anything happened.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// A set of selected item ids. Iteration order is unspecified.
#[derive(Debug, Clone)]
pub struct Selection<T: Eq + Hash + Clone> {
    ids: Arc<HashSet<T>>,
}

impl<T: Eq + Hash + Clone> Default for Selection<T> {
    fn default() -> Self {
        Self { ids: Arc::new(HashSet::new()) }
    }
}

impl<T: Eq + Hash + Clone> Selection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_selected(&self, id: &T) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter()
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<HashSet<T>> {
        Arc::clone(&self.ids)
    }

    /// Whether two selections share the same underlying instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ids, &other.ids)
    }

    /// Add or remove a single id.
    pub fn set_selected(&mut self, id: T, selected: bool) {
        let mut next = (*self.ids).clone();
        if selected {
            next.insert(id);
        } else {
            next.remove(&id);
        }
        self.ids = Arc::new(next);
    }

    pub fn toggle(&mut self, id: T) {
        let selected = !self.is_selected(&id);
        self.set_selected(id, selected);
    }

    /// Replace the whole selection.
    pub fn replace<I: IntoIterator<Item = T>>(&mut self, ids: I) {
        self.ids = Arc::new(ids.into_iter().collect());
    }

    pub fn clear(&mut self) {
        self.ids = Arc::new(HashSet::new());
    }

    /// Select every id in `library`.
    pub fn select_all<I: IntoIterator<Item = T>>(&mut self, library: I) {
        self.replace(library);
    }

    /// Drop ids for which `keep` returns false.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        self.ids = Arc::new(self.ids.iter().filter(|id| keep(id)).cloned().collect());
    }
}
