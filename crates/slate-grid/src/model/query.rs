//! Filter and sort stages of the grid pipeline.
//!
//! The engine never reorders or clones the caller's rows. Instead it keeps a
//! [`QueryMapping`], a visible-to-source index vector rebuilt from scratch
//! whenever any upstream input changes, and every downstream consumer
//! (pagination, rendering, export) reads through it. Rebuilding in full on
//! each change is what keeps the invariants honest: a filter edit can never
//! leave a stale sort order visible.
//!
//! # Search modes
//!
//! Free-text search runs in one of two mutually exclusive scopes:
//!
//! - [`SearchMode::MultiField`]: the term scans all column keys, and each
//!   column additionally offers its own filter box; active per-column
//!   filters AND together after the free-text pass.
//! - [`SearchMode::ColumnChecklist`]: the term scans only the checklist of
//!   selected columns; there are no per-column filter boxes.

use std::collections::{BTreeMap, BTreeSet};

use super::column::ColumnSpec;
use super::row::Row;

/// The exclusive choice of free-text search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Search all columns; per-column filter boxes are available.
    #[default]
    MultiField,
    /// Search only checklist-selected columns.
    ColumnChecklist,
}

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Free-text and per-column filter inputs.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Case-insensitive substring matched against candidate columns.
    pub search_term: String,
    /// Per-column filter text, keyed by column key. `MultiField` mode only;
    /// empty values are inert.
    pub column_filters: BTreeMap<String, String>,
    /// Checklist of columns the free-text search scans. `ColumnChecklist`
    /// mode only; an empty checklist matches nothing.
    pub search_columns: BTreeSet<String>,
}

impl FilterState {
    /// Returns `true` if no filter input is active.
    pub fn is_neutral(&self) -> bool {
        self.search_term.is_empty()
            && self.column_filters.values().all(String::is_empty)
    }
}

/// The single active sort key and direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    /// Column key currently sorted on, if any.
    pub key: Option<String>,
    /// Direction for the active key.
    pub order: SortOrder,
}

impl SortState {
    /// Applies the header-click protocol: a second click on the active
    /// column flips the direction, a click on any other column sorts it
    /// ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.order = self.order.reversed();
        } else {
            self.key = Some(key.to_string());
            self.order = SortOrder::Ascending;
        }
    }
}

/// Visible-to-source row index mapping produced by the filter and sort
/// stages.
#[derive(Debug, Clone, Default)]
pub struct QueryMapping {
    visible_to_source: Vec<usize>,
}

impl QueryMapping {
    /// Rebuilds the mapping from scratch.
    ///
    /// Filtering runs first (free-text pass, then per-column filters in
    /// `MultiField` mode), sorting second. With no sort key the source order
    /// passes through. Tie order under a sort key is not contractual:
    /// callers must not rely on equal-key rows keeping their relative order.
    pub fn rebuild(
        rows: &[Row],
        columns: &[ColumnSpec],
        mode: SearchMode,
        filter: &FilterState,
        sort: &SortState,
    ) -> Self {
        let mut visible: Vec<usize> = (0..rows.len())
            .filter(|&ix| row_passes(&rows[ix], columns, mode, filter))
            .collect();

        if let Some(key) = sort.key.as_deref() {
            visible.sort_by(|&a, &b| {
                let ordering = rows[a].resolve(key).total_cmp(rows[b].resolve(key));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        tracing::debug!(
            target: "slate_grid::query",
            total = rows.len(),
            visible = visible.len(),
            sort_key = sort.key.as_deref(),
            "rebuilt query mapping"
        );

        Self {
            visible_to_source: visible,
        }
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible_to_source.len()
    }

    /// Returns `true` if no rows are visible.
    pub fn is_empty(&self) -> bool {
        self.visible_to_source.is_empty()
    }

    /// Source index for a visible position.
    pub fn get(&self, visible: usize) -> Option<usize> {
        self.visible_to_source.get(visible).copied()
    }

    /// Iterates source indices in visible order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible_to_source.iter().copied()
    }

    /// The full visible-to-source slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.visible_to_source
    }
}

/// One row against the full filter state.
fn row_passes(
    row: &Row,
    columns: &[ColumnSpec],
    mode: SearchMode,
    filter: &FilterState,
) -> bool {
    if !filter.search_term.is_empty() {
        let needle = filter.search_term.to_lowercase();
        let hit = match mode {
            SearchMode::MultiField => columns
                .iter()
                .any(|column| cell_contains(row, &column.key, &needle)),
            SearchMode::ColumnChecklist => filter
                .search_columns
                .iter()
                .any(|key| cell_contains(row, key, &needle)),
        };
        if !hit {
            return false;
        }
    }

    if mode == SearchMode::MultiField {
        for (key, text) in &filter.column_filters {
            if text.is_empty() {
                continue;
            }
            if !cell_contains(row, key, &text.to_lowercase()) {
                return false;
            }
        }
    }

    true
}

/// Case-folded substring match against the stringified value at `key`.
fn cell_contains(row: &Row, key: &str, needle_lower: &str) -> bool {
    row.resolve(key)
        .to_text()
        .to_lowercase()
        .contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("age", "Age"),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with_field("id", 1).with_field("name", "Ann").with_field("age", 30),
            Row::new().with_field("id", 2).with_field("name", "Bo").with_field("age", 25),
            Row::new().with_field("id", 3).with_field("name", "Cy").with_field("age", 40),
        ]
    }

    fn names(rows: &[Row], mapping: &QueryMapping) -> Vec<String> {
        mapping.iter().map(|ix| rows[ix].resolve("name").to_text()).collect()
    }

    #[test]
    fn test_neutral_filter_passes_through_in_source_order() {
        let rows = rows();
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &FilterState::default(),
            &SortState::default(),
        );
        assert_eq!(names(&rows, &mapping), vec!["Ann", "Bo", "Cy"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = rows();
        let filter = FilterState {
            search_term: "an".to_string(),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        assert_eq!(names(&rows, &mapping), vec!["Ann"]);
    }

    #[test]
    fn test_search_scans_non_string_columns() {
        let rows = rows();
        let filter = FilterState {
            search_term: "25".to_string(),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        assert_eq!(names(&rows, &mapping), vec!["Bo"]);
    }

    #[test]
    fn test_column_filter_applies_after_search() {
        let rows = rows();
        let filter = FilterState {
            column_filters: BTreeMap::from([("name".to_string(), "o".to_string())]),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        assert_eq!(names(&rows, &mapping), vec!["Bo"]);
    }

    #[test]
    fn test_column_filters_and_together() {
        let rows = rows();
        let filter = FilterState {
            column_filters: BTreeMap::from([
                ("name".to_string(), "o".to_string()),
                ("age".to_string(), "4".to_string()),
            ]),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_checklist_scopes_search() {
        let rows = rows();
        // "0" appears in Ann's and Cy's ages but no name.
        let mut filter = FilterState {
            search_term: "0".to_string(),
            search_columns: BTreeSet::from(["name".to_string()]),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::ColumnChecklist,
            &filter,
            &SortState::default(),
        );
        assert!(mapping.is_empty());

        filter.search_columns.insert("age".to_string());
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::ColumnChecklist,
            &filter,
            &SortState::default(),
        );
        assert_eq!(names(&rows, &mapping), vec!["Ann", "Cy"]);
    }

    #[test]
    fn test_empty_checklist_matches_nothing() {
        let rows = rows();
        let filter = FilterState {
            search_term: "a".to_string(),
            ..Default::default()
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::ColumnChecklist,
            &filter,
            &SortState::default(),
        );
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = rows();
        let filter = FilterState {
            search_term: "n".to_string(),
            ..Default::default()
        };
        let first = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        let second = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &filter,
            &SortState::default(),
        );
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let rows = rows();
        let mut sort = SortState::default();
        sort.toggle("age");

        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &FilterState::default(),
            &sort,
        );
        assert_eq!(names(&rows, &mapping), vec!["Bo", "Ann", "Cy"]);

        sort.toggle("age");
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &FilterState::default(),
            &sort,
        );
        assert_eq!(names(&rows, &mapping), vec!["Cy", "Ann", "Bo"]);
    }

    #[test]
    fn test_toggle_new_key_resets_to_ascending() {
        let mut sort = SortState::default();
        sort.toggle("age");
        sort.toggle("age");
        assert_eq!(sort.order, SortOrder::Descending);

        sort.toggle("name");
        assert_eq!(sort.key.as_deref(), Some("name"));
        assert_eq!(sort.order, SortOrder::Ascending);
    }

    #[test]
    fn test_sort_on_missing_key_groups_nulls_first() {
        let mut rows = rows();
        rows.push(Row::new().with_field("id", 4).with_field("name", "Di"));

        let sort = SortState {
            key: Some("age".to_string()),
            order: SortOrder::Ascending,
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &FilterState::default(),
            &sort,
        );
        // Null ranks below every number under the engine's total order.
        assert_eq!(names(&rows, &mapping), vec!["Di", "Bo", "Ann", "Cy"]);
    }

    #[test]
    fn test_sort_mixed_types_follows_type_rank() {
        let rows = vec![
            Row::new().with_field("id", 1).with_field("age", "unknown"),
            Row::new().with_field("id", 2).with_field("age", 30),
            Row::new().with_field("id", 3).with_field("age", 9.5),
        ];
        let sort = SortState {
            key: Some("age".to_string()),
            order: SortOrder::Ascending,
        };
        let mapping = QueryMapping::rebuild(
            &rows,
            &columns(),
            SearchMode::MultiField,
            &FilterState::default(),
            &sort,
        );
        let ids: Vec<_> = mapping.iter().map(|ix| rows[ix].resolve("id").as_int().unwrap()).collect();
        // Numbers (9.5 < 30) sort before the string.
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
