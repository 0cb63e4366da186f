//! Tabular data presentation engine for the Slate school administration
//! suite.
//!
//! Every admin list screen (students, teachers, parents, classes, lessons)
//! is the same grid with different descriptors. This crate is that grid's
//! engine: a headless, synchronous query pipeline over caller-supplied
//! records, with no drawing, networking, or persistence of its own.
//!
//! # Pipeline
//!
//! ```text
//! ┌───────────┐   ┌────────┐   ┌──────┐   ┌──────┐
//! │ Normalize │──>│ Filter │──>│ Sort │──>│ Page │──> rendered rows
//! └───────────┘   └────────┘   └──┬───┘   └──────┘
//!                                 │
//!                      ┌──────────┴──────────┐
//!                      │ Selection  │ Export │
//!                      └─────────────────────┘
//! ```
//!
//! Data flows strictly downstream and the whole pipeline is recomputed
//! whenever any input changes. Selection and export branch off the
//! filtered+sorted result, independent of pagination.
//!
//! # Example
//!
//! ```
//! use slate_grid::model::{ColumnSpec, RowKey};
//! use slate_grid::view::{GridConfig, GridView};
//! use serde_json::json;
//!
//! let mut grid = GridView::new(
//!     "Student Roster",
//!     vec![
//!         ColumnSpec::new("name", "Name"),
//!         ColumnSpec::new("age", "Age"),
//!     ],
//!     GridConfig::default().with_page_size(2).with_selectable(true),
//! )?;
//!
//! grid.set_rows_json(json!([
//!     { "id": 1, "name": "Ann", "age": 30 },
//!     { "id": 2, "name": "Bo", "age": 25 },
//!     { "id": 3, "name": "Cy", "age": 40 },
//! ]));
//!
//! grid.toggle_sort("age")?;
//! let page = grid.visible_rows();
//! assert_eq!(page[0].cells[0].text, "Bo");
//!
//! let export = grid.export()?;
//! assert!(export.content.starts_with("\"Name\",\"Age\""));
//! # Ok::<(), slate_grid::Error>(())
//! ```
//!
//! # Failure containment
//!
//! The engine recovers everything locally: non-sequence row input normalizes
//! to an empty grid, missing nested paths resolve to empty values, and
//! caller-supplied render functions run inside a per-cell isolation boundary
//! that substitutes a readable fallback label and reports a
//! [`view::CellFault`] instead of unwinding.

pub mod error;
pub mod export;
pub mod model;
pub mod view;

pub use error::{Error, Result};
pub use export::ExportDocument;
pub use model::{
    ActionGate, ActionSource, ActionSpec, BulkActionSpec, ColumnSpec, Row, RowKey, SearchMode,
    SelectAllScope, SortOrder, Subtext, Value, rows_from_json, rows_from_value,
};
pub use view::{CellFault, GridConfig, GridView, RenderedCell, RenderedRow};
