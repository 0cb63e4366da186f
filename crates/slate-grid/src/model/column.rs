//! Column, action, and bulk-action descriptors.
//!
//! Page-level callers describe a grid declaratively: a [`ColumnSpec`] per
//! column, an [`ActionSource`] for the per-row action menu, and a
//! [`BulkActionSpec`] list for operations over the current selection. The
//! engine resolves these against each row at render time; it never stores
//! per-row state in the descriptors.
//!
//! # Example
//!
//! ```
//! use slate_grid::model::{ActionSource, ActionSpec, ColumnSpec};
//!
//! let columns = vec![
//!     ColumnSpec::new("profile.firstName", "First Name")
//!         .with_subtext_path("profile.email"),
//!     ColumnSpec::new("grade", "Grade").with_filterable(false),
//! ];
//!
//! let actions = ActionSource::Static(vec![
//!     ActionSpec::new("Edit", |row| println!("edit {:?}", row.id())),
//! ]);
//! ```

use std::sync::Arc;

use super::row::{Row, RowKey};
use super::value::Value;

/// Type alias for a custom cell render function.
///
/// Receives the resolved cell value and the full row; returns the display
/// text. Render functions are caller code and may panic; the view wraps
/// every call in the per-cell isolation boundary.
pub type RenderFn = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Type alias for a function deriving display text from a whole row.
pub type RowTextFn = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Type alias for a per-row predicate.
pub type RowPredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// Type alias for a per-row action handler.
pub type RowHandler = Arc<dyn Fn(&Row) + Send + Sync>;

/// Type alias for a bulk action handler over the selected identity keys.
pub type BulkHandler = Arc<dyn Fn(&[RowKey]) + Send + Sync>;

/// Type alias for a function producing a row-conditional action list.
pub type ActionListFn = Arc<dyn Fn(&Row) -> Vec<ActionSpec> + Send + Sync>;

/// Secondary text shown under a cell's main content.
#[derive(Clone)]
pub enum Subtext {
    /// Resolve a dot-path into the row.
    Path(String),
    /// Derive the text from the row.
    Derive(RowTextFn),
}

/// Metadata describing how to read, label, sort, filter, and render one
/// field across all rows.
///
/// Column keys must be unique within a grid; [`GridView::new`] rejects
/// duplicates.
///
/// [`GridView::new`]: crate::view::GridView::new
#[derive(Clone)]
pub struct ColumnSpec {
    /// Dot-path resolved against each row.
    pub key: String,
    /// Header display text. Falls back to `key` in export when empty.
    pub label: String,
    /// Whether header clicks may sort on this column.
    pub sortable: bool,
    /// Whether this column offers a per-column filter box.
    pub filterable: bool,
    /// Optional custom display rendering; `None` shows the stringified value.
    pub render: Option<RenderFn>,
    /// Optional secondary text under the cell.
    pub subtext: Option<Subtext>,
}

impl ColumnSpec {
    /// Creates a column with defaults: sortable, filterable, raw display.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            filterable: true,
            render: None,
            subtext: None,
        }
    }

    /// Sets whether the column is sortable.
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column is filterable.
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Sets a custom render function for the cell's display text.
    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Shows the value at `path` as subtext under the cell.
    pub fn with_subtext_path(mut self, path: impl Into<String>) -> Self {
        self.subtext = Some(Subtext::Path(path.into()));
        self
    }

    /// Derives the cell subtext from the row.
    pub fn with_subtext<F>(mut self, derive: F) -> Self
    where
        F: Fn(&Row) -> String + Send + Sync + 'static,
    {
        self.subtext = Some(Subtext::Derive(Arc::new(derive)));
        self
    }
}

/// A per-row flag that is either fixed or computed from the row.
#[derive(Clone)]
pub enum ActionGate {
    /// The same answer for every row.
    Always(bool),
    /// Computed per row at render time.
    PerRow(RowPredicate),
}

impl Default for ActionGate {
    fn default() -> Self {
        Self::Always(false)
    }
}

impl ActionGate {
    /// Evaluates the gate for one row.
    pub fn evaluate(&self, row: &Row) -> bool {
        match self {
            Self::Always(flag) => *flag,
            Self::PerRow(predicate) => predicate(row),
        }
    }
}

impl From<bool> for ActionGate {
    fn from(flag: bool) -> Self {
        Self::Always(flag)
    }
}

/// One entry in a row's action menu.
#[derive(Clone)]
pub struct ActionSpec {
    /// Display label.
    pub label: String,
    /// Invoked with the row when the action is triggered.
    pub on_activate: RowHandler,
    /// Base color token, passed through to the caller's renderer.
    pub color: Option<String>,
    /// Hover color token.
    pub hover_color: Option<String>,
    /// Whether the action is shown but inert.
    pub disabled: ActionGate,
    /// Whether the action is omitted entirely.
    pub hidden: ActionGate,
    /// Optional icon token.
    pub icon: Option<String>,
}

impl ActionSpec {
    /// Creates an action with the given label and handler.
    pub fn new<F>(label: impl Into<String>, on_activate: F) -> Self
    where
        F: Fn(&Row) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_activate: Arc::new(on_activate),
            color: None,
            hover_color: None,
            disabled: ActionGate::default(),
            hidden: ActionGate::default(),
            icon: None,
        }
    }

    /// Sets the base color token.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the hover color token.
    pub fn with_hover_color(mut self, color: impl Into<String>) -> Self {
        self.hover_color = Some(color.into());
        self
    }

    /// Sets the icon token.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Disables (or re-enables) the action for every row.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = ActionGate::Always(disabled);
        self
    }

    /// Disables the action for rows matching the predicate.
    pub fn with_disabled_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.disabled = ActionGate::PerRow(Arc::new(predicate));
        self
    }

    /// Hides (or shows) the action for every row.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = ActionGate::Always(hidden);
        self
    }

    /// Hides the action for rows matching the predicate.
    pub fn with_hidden_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.hidden = ActionGate::PerRow(Arc::new(predicate));
        self
    }
}

/// Where a row's action list comes from.
///
/// Action sets are either one static list shared by all rows, or a function
/// of the row for row-conditional menus. Either way the source is resolved
/// once per row at render time.
#[derive(Clone, Default)]
pub enum ActionSource {
    /// No actions.
    #[default]
    None,
    /// The same action list for every row.
    Static(Vec<ActionSpec>),
    /// A per-row action list.
    PerRow(ActionListFn),
}

impl ActionSource {
    /// Creates a per-row source from a closure.
    pub fn per_row<F>(f: F) -> Self
    where
        F: Fn(&Row) -> Vec<ActionSpec> + Send + Sync + 'static,
    {
        Self::PerRow(Arc::new(f))
    }

    /// Resolves the action list for one row, dropping hidden entries.
    pub fn resolve(&self, row: &Row) -> Vec<ActionSpec> {
        let specs = match self {
            Self::None => return Vec::new(),
            Self::Static(specs) => specs.clone(),
            Self::PerRow(f) => f(row),
        };
        specs
            .into_iter()
            .filter(|spec| !spec.hidden.evaluate(row))
            .collect()
    }
}

/// An operation over the current selection.
#[derive(Clone)]
pub struct BulkActionSpec {
    /// Display label.
    pub label: String,
    /// Invoked with the selected identity keys. Running a bulk action does
    /// not clear the selection; that is the handler's decision.
    pub on_activate: BulkHandler,
    /// Style hook passed through to the caller's renderer.
    pub class_name: Option<String>,
}

impl BulkActionSpec {
    /// Creates a bulk action with the given label and handler.
    pub fn new<F>(label: impl Into<String>, on_activate: F) -> Self
    where
        F: Fn(&[RowKey]) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_activate: Arc::new(on_activate),
            class_name: None,
        }
    }

    /// Sets the style hook.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// A row action after per-row resolution, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    /// Display label.
    pub label: String,
    /// Base color token.
    pub color: Option<String>,
    /// Hover color token.
    pub hover_color: Option<String>,
    /// Icon token.
    pub icon: Option<String>,
    /// Whether the action is shown but inert for this row.
    pub disabled: bool,
}

impl ResolvedAction {
    /// Resolves one spec against one row.
    pub fn from_spec(spec: &ActionSpec, row: &Row) -> Self {
        Self {
            label: spec.label.clone(),
            color: spec.color.clone(),
            hover_color: spec.hover_color.clone(),
            icon: spec.icon.clone(),
            disabled: spec.disabled.evaluate(row),
        }
    }
}
