//! Selection service for grid rows.
//!
//! Selection is a set of [`RowKey`]s, independent of filter, sort, and page
//! state: a selected row stays selected while it is scrolled out of the
//! filtered view, and keys for rows that disappear from the data set are
//! tolerated; they simply have no visual effect until the row returns.
//!
//! # Example
//!
//! ```
//! use slate_grid::model::{RowKey, SelectionModel};
//!
//! let mut selection = SelectionModel::new(true);
//! selection.selection_changed.connect(|keys| {
//!     println!("{} rows selected", keys.len());
//! });
//!
//! selection.toggle(RowKey::Id("7".into()));
//! assert!(selection.is_selected(&RowKey::Id("7".into())));
//! ```

use std::collections::HashSet;

use slate_core::Signal;

use super::row::RowKey;

/// Scope of the "select all" toggle.
///
/// Whether select-all should cover the current page or the whole filtered
/// set is a policy choice, so it is configurable; the default matches the
/// page-scoped behavior admin screens expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectAllScope {
    /// Toggle only the rows on the current page.
    #[default]
    CurrentPage,
    /// Toggle every row in the filtered+sorted set.
    FilteredSet,
}

/// Identity-keyed multi-row selection.
///
/// All operations are no-ops when the model is constructed non-selectable.
pub struct SelectionModel {
    enabled: bool,
    selected: HashSet<RowKey>,

    /// Emitted with the full selected key list after every change. Order is
    /// not guaranteed.
    pub selection_changed: Signal<Vec<RowKey>>,
}

impl SelectionModel {
    /// Creates a selection model. Pass `false` for a non-selectable grid.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            selected: HashSet::new(),
            selection_changed: Signal::new(),
        }
    }

    /// Whether selection operations have any effect.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Checks if a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// Returns `true` if any rows are selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The selected keys. Order is not guaranteed.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selected.iter().cloned().collect()
    }

    /// Toggles one row in or out of the selection.
    pub fn toggle(&mut self, key: RowKey) {
        if !self.enabled {
            return;
        }
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
        self.emit_changed();
    }

    /// Toggles a scope's worth of rows at once.
    ///
    /// If every key in `scope_keys` is already selected the whole scope is
    /// deselected; otherwise the scope is unioned into the selection. Keys
    /// outside the scope are never touched.
    pub fn toggle_all(&mut self, scope_keys: &[RowKey]) {
        if !self.enabled || scope_keys.is_empty() {
            return;
        }
        let all_selected = scope_keys.iter().all(|key| self.selected.contains(key));
        if all_selected {
            for key in scope_keys {
                self.selected.remove(key);
            }
        } else {
            for key in scope_keys {
                self.selected.insert(key.clone());
            }
        }
        self.emit_changed();
    }

    /// Clears the selection.
    ///
    /// The engine never calls this implicitly, not for filter changes and
    /// not after bulk actions; it exists for callers (e.g. after a bulk
    /// delete has removed the selected rows).
    pub fn clear(&mut self) {
        if !self.enabled || self.selected.is_empty() {
            return;
        }
        self.selected.clear();
        self.emit_changed();
    }

    fn emit_changed(&self) {
        tracing::trace!(
            target: "slate_grid::selection",
            selected = self.selected.len(),
            "selection changed"
        );
        self.selection_changed.emit(self.selected_keys());
    }
}
