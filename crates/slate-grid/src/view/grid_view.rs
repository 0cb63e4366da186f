//! GridView: the orchestrating engine behind every admin list screen.
//!
//! `GridView` owns the engine state (search, filters, sort, page, selection)
//! and re-runs the pipeline (normalize, filter, sort, page) in full
//! whenever any input changes. Rendering is headless: [`GridView::visible_rows`]
//! produces plain data (`RenderedRow`) for the caller's UI layer to draw.
//!
//! # Example
//!
//! ```
//! use slate_grid::model::ColumnSpec;
//! use slate_grid::view::{GridConfig, GridView};
//! use serde_json::json;
//!
//! let mut grid = GridView::new(
//!     "Student Roster",
//!     vec![
//!         ColumnSpec::new("name", "Name"),
//!         ColumnSpec::new("age", "Age"),
//!     ],
//!     GridConfig::default().with_page_size(25),
//! ).unwrap();
//!
//! grid.set_rows_json(json!([
//!     { "id": 1, "name": "Ann", "age": 30 },
//!     { "id": 2, "name": "Bo", "age": 25 },
//! ]));
//!
//! grid.set_search_term("an");
//! assert_eq!(grid.filtered_count(), 1);
//! ```

use std::collections::BTreeSet;

use slate_core::Signal;

use crate::error::{Error, Result};
use crate::export::{self, ExportDocument};
use crate::model::{
    ActionSource, BulkActionSpec, ColumnSpec, FilterState, Pager, QueryMapping, ResolvedAction,
    Row, RowKey, SearchMode, SelectAllScope, SelectionModel, SortOrder, SortState, Value,
    rows_from_value,
};

use super::cell::{self, CellFault, RenderedCell};

/// Configuration flags for one grid instance.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Whether free-text search is active.
    pub search_enabled: bool,
    /// Whether header clicks may change the sort.
    pub sort_enabled: bool,
    /// Whether per-column filter boxes are active (`MultiField` mode).
    pub column_filters_enabled: bool,
    /// Whether the page stage slices at all.
    pub paginated: bool,
    /// Rows per page when paginated.
    pub page_size: usize,
    /// Whether the export affordance is offered to the caller's UI.
    pub export_enabled: bool,
    /// Whether rows can be selected.
    pub selectable: bool,
    /// The exclusive free-text search scope.
    pub search_mode: SearchMode,
    /// What "select all" covers.
    pub select_all_scope: SelectAllScope,
    /// Message shown by the caller when the visible result is empty.
    pub empty_message: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            search_enabled: true,
            sort_enabled: true,
            column_filters_enabled: true,
            paginated: true,
            page_size: 10,
            export_enabled: true,
            selectable: false,
            search_mode: SearchMode::default(),
            select_all_scope: SelectAllScope::default(),
            empty_message: "No records to display.".to_string(),
        }
    }
}

impl GridConfig {
    /// Sets whether free-text search is active.
    pub fn with_search_enabled(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    /// Sets whether sorting is active.
    pub fn with_sort_enabled(mut self, enabled: bool) -> Self {
        self.sort_enabled = enabled;
        self
    }

    /// Sets whether per-column filter boxes are active.
    pub fn with_column_filters_enabled(mut self, enabled: bool) -> Self {
        self.column_filters_enabled = enabled;
        self
    }

    /// Disables pagination: the page stage passes everything through.
    pub fn without_pagination(mut self) -> Self {
        self.paginated = false;
        self
    }

    /// Sets the page size (paginated grids only).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets whether the export affordance is offered.
    pub fn with_export_enabled(mut self, enabled: bool) -> Self {
        self.export_enabled = enabled;
        self
    }

    /// Sets whether rows can be selected.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Sets the free-text search scope.
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Sets the select-all scope policy.
    pub fn with_select_all_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_all_scope = scope;
        self
    }

    /// Sets the empty-state message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }
}

/// One fully rendered row, ready for the caller's UI layer.
#[derive(Clone)]
pub struct RenderedRow {
    /// Identity key (selection, click handling).
    pub key: RowKey,
    /// The underlying record.
    pub row: Row,
    /// One cell per column, in column order.
    pub cells: Vec<RenderedCell>,
    /// Resolved, visible actions for this row.
    pub actions: Vec<ResolvedAction>,
    /// Whether the row is currently selected.
    pub selected: bool,
}

/// The tabular data presentation engine.
///
/// A `GridView` is created per list screen, fed rows by the caller, and
/// queried for the current visible page. All state mutation funnels through
/// `refresh()`, which rebuilds the filter/sort mapping and re-clamps the
/// page, so the pipeline is never partially stale.
pub struct GridView {
    title: String,
    config: GridConfig,
    columns: Vec<ColumnSpec>,
    actions: ActionSource,
    bulk_actions: Vec<BulkActionSpec>,

    rows: Vec<Row>,
    filter: FilterState,
    sort: SortState,
    pager: Pager,
    selection: SelectionModel,
    mapping: QueryMapping,
    loading: bool,

    /// Emitted when a row is activated (clicked), with the record.
    pub row_activated: Signal<Row>,
    /// Emitted when the sort key or direction changes.
    pub sort_changed: Signal<(Option<String>, SortOrder)>,
    /// Emitted when the current page changes, including silent clamping.
    pub page_changed: Signal<usize>,
    /// Diagnostics channel for per-cell render faults.
    pub cell_fault: Signal<CellFault>,
}

impl GridView {
    /// Creates a grid over the given columns.
    ///
    /// Column keys must be unique; the search checklist starts with every
    /// column checked.
    pub fn new(
        title: impl Into<String>,
        columns: Vec<ColumnSpec>,
        config: GridConfig,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(Error::duplicate_column(&column.key));
            }
        }

        let pager = if config.paginated {
            Pager::new(config.page_size)
        } else {
            Pager::disabled()
        };
        let filter = FilterState {
            search_columns: columns.iter().map(|c| c.key.clone()).collect(),
            ..Default::default()
        };
        let selection = SelectionModel::new(config.selectable);

        Ok(Self {
            title: title.into(),
            config,
            columns,
            actions: ActionSource::default(),
            bulk_actions: Vec::new(),
            rows: Vec::new(),
            filter,
            sort: SortState::default(),
            pager,
            selection,
            mapping: QueryMapping::default(),
            loading: false,
            row_activated: Signal::new(),
            sort_changed: Signal::new(),
            page_changed: Signal::new(),
            cell_fault: Signal::new(),
        })
    }

    /// Sets the per-row action source.
    pub fn with_actions(mut self, actions: ActionSource) -> Self {
        self.actions = actions;
        self
    }

    /// Sets the bulk actions offered over the selection.
    pub fn with_bulk_actions(mut self, bulk_actions: Vec<BulkActionSpec>) -> Self {
        self.bulk_actions = bulk_actions;
        self
    }

    // =========================================================================
    // Data intake
    // =========================================================================

    /// Replaces the row data.
    ///
    /// The input is normalized: any non-sequence value yields an empty grid,
    /// never an error. Selection is kept; keys that no longer resolve to a
    /// row simply have no effect until the row returns.
    pub fn set_rows(&mut self, input: &Value) {
        self.rows = rows_from_value(input);
        self.refresh();
    }

    /// Convenience intake for callers holding `serde_json` data.
    pub fn set_rows_json(&mut self, input: serde_json::Value) {
        self.set_rows(&Value::from(input));
    }

    /// Sets the loading flag (display-only, owned by the caller's fetch).
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Whether the caller reported an in-flight fetch.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Filter state
    // =========================================================================

    /// Sets the free-text search term and resets to page 1.
    ///
    /// No-op when search is disabled by configuration.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        if !self.config.search_enabled {
            tracing::debug!(target: "slate_grid::query", "search disabled, ignoring term");
            return;
        }
        let term = term.into();
        if self.filter.search_term == term {
            return;
        }
        self.filter.search_term = term;
        if self.pager.reset() {
            self.page_changed.emit(self.pager.current());
        }
        self.refresh();
    }

    /// Sets one per-column filter (`MultiField` mode). An empty value clears
    /// the entry.
    ///
    /// Returns [`Error::UnknownColumn`] for a key no column declares; a
    /// non-filterable column is a logged no-op.
    pub fn set_column_filter(&mut self, key: &str, text: impl Into<String>) -> Result<()> {
        let column = self.column(key)?;
        if !column.filterable {
            tracing::debug!(target: "slate_grid::query", key, "column not filterable, ignoring filter");
            return Ok(());
        }
        if !self.config.column_filters_enabled {
            tracing::debug!(target: "slate_grid::query", key, "column filters disabled, ignoring filter");
            return Ok(());
        }
        let text = text.into();
        if text.is_empty() {
            self.filter.column_filters.remove(key);
        } else {
            self.filter.column_filters.insert(key.to_string(), text);
        }
        self.refresh();
        Ok(())
    }

    /// Replaces the search-column checklist (`ColumnChecklist` mode).
    pub fn set_search_columns(&mut self, keys: BTreeSet<String>) -> Result<()> {
        for key in &keys {
            self.column(key)?;
        }
        self.filter.search_columns = keys;
        self.refresh();
        Ok(())
    }

    /// Toggles one column in or out of the search checklist.
    pub fn toggle_search_column(&mut self, key: &str) -> Result<()> {
        self.column(key)?;
        if !self.filter.search_columns.remove(key) {
            self.filter.search_columns.insert(key.to_string());
        }
        self.refresh();
        Ok(())
    }

    /// Resets search term, per-column filters, the search checklist (back to
    /// all columns), and the page. Selection is deliberately untouched.
    pub fn clear_filters(&mut self) {
        self.filter.search_term.clear();
        self.filter.column_filters.clear();
        self.filter.search_columns = self.columns.iter().map(|c| c.key.clone()).collect();
        if self.pager.reset() {
            self.page_changed.emit(self.pager.current());
        }
        self.refresh();
    }

    /// The current filter inputs.
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    // =========================================================================
    // Sort state
    // =========================================================================

    /// Applies a header click: flips direction on the active column, sorts
    /// ascending on a new one.
    ///
    /// Returns [`Error::UnknownColumn`] for an undeclared key; a
    /// non-sortable column (or sorting disabled by configuration) is a
    /// logged no-op.
    pub fn toggle_sort(&mut self, key: &str) -> Result<()> {
        let column = self.column(key)?;
        if !self.config.sort_enabled || !column.sortable {
            tracing::debug!(target: "slate_grid::query", key, "sort unavailable, ignoring header click");
            return Ok(());
        }
        self.sort.toggle(key);
        self.sort_changed.emit((self.sort.key.clone(), self.sort.order));
        self.refresh();
        Ok(())
    }

    /// The active sort key and direction.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    // =========================================================================
    // Page state
    // =========================================================================

    /// Jumps to a page (clamped into range).
    pub fn set_page(&mut self, page: usize) {
        if self.pager.set_page(page, self.mapping.len()) {
            self.page_changed.emit(self.pager.current());
        }
    }

    /// Advances one page (clamped at the last).
    pub fn next_page(&mut self) {
        if self.pager.next(self.mapping.len()) {
            self.page_changed.emit(self.pager.current());
        }
    }

    /// Steps back one page (clamped at the first).
    pub fn prev_page(&mut self) {
        if self.pager.prev(self.mapping.len()) {
            self.page_changed.emit(self.pager.current());
        }
    }

    /// The current page, 1-based.
    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    /// Total pages for the current filtered set (minimum 1).
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.mapping.len())
    }

    /// The numeric page-button window (≤ 5 wide, edge-clamped).
    pub fn page_buttons(&self) -> Vec<usize> {
        self.pager.page_buttons(self.mapping.len())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles one row's membership in the selection.
    pub fn toggle_row(&mut self, key: RowKey) {
        self.selection.toggle(key);
    }

    /// Toggles select-all over the configured scope (current page by
    /// default).
    pub fn toggle_select_all(&mut self) {
        let scope: Vec<RowKey> = match self.config.select_all_scope {
            SelectAllScope::CurrentPage => self
                .page_source_indices()
                .map(|ix| self.rows[ix].key())
                .collect(),
            SelectAllScope::FilteredSet => {
                self.mapping.iter().map(|ix| self.rows[ix].key()).collect()
            }
        };
        self.selection.toggle_all(&scope);
    }

    /// Clears the selection. Never called implicitly by the engine.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Checks if a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// The selected keys. Order is not guaranteed.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selection.selected_keys()
    }

    /// Returns `true` if any rows are selected.
    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// The selection-changed signal (full key list per change).
    pub fn selection_changed(&self) -> &Signal<Vec<RowKey>> {
        &self.selection.selection_changed
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// The configured bulk actions.
    pub fn bulk_actions(&self) -> &[BulkActionSpec] {
        &self.bulk_actions
    }

    /// Runs a bulk action over the current selection.
    ///
    /// Bulk actions are derived from the selection: with nothing selected
    /// (or an out-of-range index) this returns `false` without invoking the
    /// handler. Running a bulk action does not clear the selection.
    pub fn run_bulk_action(&self, index: usize) -> bool {
        let Some(action) = self.bulk_actions.get(index) else {
            return false;
        };
        if !self.selection.has_selection() {
            return false;
        }
        (action.on_activate)(&self.selected_keys());
        true
    }

    /// Triggers one resolved row action on the current page.
    ///
    /// `visible_ix` indexes the current page's rows; `action_ix` indexes the
    /// row's resolved (hidden-filtered) action list, matching what
    /// [`visible_rows`](Self::visible_rows) returned. Disabled actions and
    /// out-of-range indices return `false`.
    pub fn trigger_action(&self, visible_ix: usize, action_ix: usize) -> bool {
        let Some(row) = self.page_row(visible_ix) else {
            return false;
        };
        let specs = self.actions.resolve(row);
        let Some(spec) = specs.get(action_ix) else {
            return false;
        };
        if spec.disabled.evaluate(row) {
            return false;
        }
        (spec.on_activate)(row);
        true
    }

    /// Emits [`row_activated`](Self::row_activated) for a row on the current
    /// page.
    pub fn activate_row(&self, visible_ix: usize) {
        if let Some(row) = self.page_row(visible_ix) {
            self.row_activated.emit(row.clone());
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Renders the current page.
    ///
    /// Every caller-supplied render function runs inside the per-cell
    /// isolation boundary; faults surface on [`cell_fault`](Self::cell_fault)
    /// and as fallback labels, never as unwinds out of this call.
    pub fn visible_rows(&self) -> Vec<RenderedRow> {
        self.page_source_indices()
            .map(|ix| {
                let row = &self.rows[ix];
                let key = row.key();
                let cells = self
                    .columns
                    .iter()
                    .map(|column| cell::render_cell(column, row, &self.cell_fault))
                    .collect();
                let actions = self
                    .actions
                    .resolve(row)
                    .iter()
                    .map(|spec| ResolvedAction::from_spec(spec, row))
                    .collect();
                RenderedRow {
                    selected: self.selection.is_selected(&key),
                    key,
                    row: row.clone(),
                    cells,
                    actions,
                }
            })
            .collect()
    }

    /// Number of rows in the filtered+sorted set.
    pub fn filtered_count(&self) -> usize {
        self.mapping.len()
    }

    /// Number of rows in the unfiltered data set.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the visible result is empty (show
    /// [`empty_message`](Self::empty_message)).
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// The configured empty-state message.
    pub fn empty_message(&self) -> &str {
        &self.config.empty_message
    }

    /// The grid title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The configuration flags.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The column descriptors, in display order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Materializes the filtered+sorted set (never just the current page)
    /// as a CSV document named after the title and today's date.
    pub fn export(&self) -> Result<ExportDocument> {
        let rows = self.mapping.iter().map(|ix| &self.rows[ix]);
        let content = export::write_csv(&self.columns, rows)?;
        let file_name =
            export::file_name(&self.title, chrono::Local::now().date_naive());
        tracing::debug!(
            target: "slate_grid::export",
            file_name = %file_name,
            rows = self.mapping.len(),
            "materialized export"
        );
        Ok(ExportDocument { file_name, content })
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Rebuilds the filter/sort mapping and re-clamps the page.
    ///
    /// Every state mutation funnels through here, so downstream consumers
    /// can never observe a stale sort order or an out-of-range page.
    fn refresh(&mut self) {
        self.mapping = QueryMapping::rebuild(
            &self.rows,
            &self.columns,
            self.config.search_mode,
            &self.filter,
            &self.sort,
        );
        if self.pager.clamp(self.mapping.len()) {
            self.page_changed.emit(self.pager.current());
        }
    }

    /// Source indices of the current page, in visible order.
    fn page_source_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let window = self.pager.window(self.mapping.len());
        self.mapping.as_slice()[window].iter().copied()
    }

    /// Row behind a current-page position.
    fn page_row(&self, visible_ix: usize) -> Option<&Row> {
        let window = self.pager.window(self.mapping.len());
        let absolute = window.start.checked_add(visible_ix)?;
        if absolute >= window.end {
            return None;
        }
        let source = self.mapping.get(absolute)?;
        Some(&self.rows[source])
    }

    /// Column descriptor for a key.
    fn column(&self, key: &str) -> Result<&ColumnSpec> {
        self.columns
            .iter()
            .find(|column| column.key == key)
            .ok_or_else(|| Error::unknown_column(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(config: GridConfig) -> GridView {
        let mut grid = GridView::new(
            "Student Roster",
            vec![
                ColumnSpec::new("name", "Name"),
                ColumnSpec::new("age", "Age"),
            ],
            config,
        )
        .unwrap();
        grid.set_rows_json(json!([
            { "id": 1, "name": "Ann", "age": 30 },
            { "id": 2, "name": "Bo", "age": 25 },
            { "id": 3, "name": "Cy", "age": 40 },
        ]));
        grid
    }

    #[test]
    fn test_duplicate_column_key_is_rejected() {
        let result = GridView::new(
            "Broken",
            vec![ColumnSpec::new("name", "Name"), ColumnSpec::new("name", "Also Name")],
            GridConfig::default(),
        );
        assert!(matches!(result, Err(Error::DuplicateColumn { key }) if key == "name"));
    }

    #[test]
    fn test_unknown_column_operations_error() {
        let mut grid = grid(GridConfig::default());
        assert!(matches!(
            grid.toggle_sort("salary"),
            Err(Error::UnknownColumn { .. })
        ));
        assert!(matches!(
            grid.set_column_filter("salary", "x"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_visible_rows_shape() {
        let grid = grid(GridConfig::default());
        let rendered = grid.visible_rows();

        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0].cells.len(), 2);
        assert_eq!(rendered[0].cells[0].text, "Ann");
        assert_eq!(rendered[0].key, RowKey::Id("1".to_string()));
    }

    #[test]
    fn test_search_term_resets_page() {
        let mut grid = grid(GridConfig::default().with_page_size(1));
        grid.set_page(3);
        assert_eq!(grid.current_page(), 3);

        grid.set_search_term("a");
        assert_eq!(grid.current_page(), 1);
    }

    #[test]
    fn test_clear_filters_keeps_selection() {
        let mut grid = grid(GridConfig::default().with_selectable(true));
        grid.toggle_row(RowKey::Id("2".to_string()));
        grid.set_search_term("ann");
        assert_eq!(grid.filtered_count(), 1);

        grid.clear_filters();
        assert_eq!(grid.filtered_count(), 3);
        assert!(grid.is_selected(&RowKey::Id("2".to_string())));
        assert!(grid.filter_state().is_neutral());
    }

    #[test]
    fn test_non_selectable_grid_ignores_selection() {
        let mut grid = grid(GridConfig::default());
        grid.toggle_row(RowKey::Id("1".to_string()));
        grid.toggle_select_all();
        assert!(!grid.has_selection());
    }

    #[test]
    fn test_select_all_scope_policies() {
        let mut grid = grid(
            GridConfig::default()
                .with_selectable(true)
                .with_page_size(2),
        );
        grid.toggle_select_all();
        assert_eq!(grid.selected_keys().len(), 2); // page 1 only

        let mut grid = grid_with_scope(SelectAllScope::FilteredSet);
        grid.toggle_select_all();
        assert_eq!(grid.selected_keys().len(), 3); // whole filtered set
    }

    fn grid_with_scope(scope: SelectAllScope) -> GridView {
        grid(
            GridConfig::default()
                .with_selectable(true)
                .with_page_size(2)
                .with_select_all_scope(scope),
        )
    }

    #[test]
    fn test_sort_disabled_is_noop() {
        let mut grid = grid(GridConfig::default().with_sort_enabled(false));
        grid.toggle_sort("age").unwrap();
        assert_eq!(grid.sort_state().key, None);
    }

    #[test]
    fn test_trigger_action_respects_disabled() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        let mut grid = GridView::new(
            "Student Roster",
            vec![ColumnSpec::new("name", "Name")],
            GridConfig::default(),
        )
        .unwrap()
        .with_actions(ActionSource::Static(vec![
            crate::model::ActionSpec::new("Edit", move |_| {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            })
            .with_disabled_if(|row| row.resolve("name").as_str() == Some("Bo")),
        ]));
        grid.set_rows_json(json!([
            { "id": 1, "name": "Ann" },
            { "id": 2, "name": "Bo" },
        ]));

        assert!(grid.trigger_action(0, 0)); // Ann: enabled
        assert!(!grid.trigger_action(1, 0)); // Bo: disabled
        assert!(!grid.trigger_action(0, 5)); // out of range
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
