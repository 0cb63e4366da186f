//! Data model for the grid engine.
//!
//! This module holds the pure stages of the pipeline and the descriptor
//! types callers use to configure a grid:
//!
//! - `Value` / `Row` / `RowKey`: dynamically typed records with dot-path
//!   resolution and stable identity
//! - `ColumnSpec` / `ActionSpec` / `BulkActionSpec`: declarative grid
//!   configuration
//! - `QueryMapping`: the filter and sort stages
//! - `Pager`: the page stage
//! - `SelectionModel`: identity-keyed selection
//!
//! Data flows strictly downstream (normalize, filter, sort, page) and the
//! whole pipeline is recomputed whenever any upstream input changes. The
//! [`view`](crate::view) module orchestrates these stages.

mod column;
mod pager;
mod query;
mod row;
mod selection;
mod value;

pub use column::{
    ActionGate, ActionListFn, ActionSource, ActionSpec, BulkActionSpec, BulkHandler, ColumnSpec,
    RenderFn, ResolvedAction, RowHandler, RowPredicate, RowTextFn, Subtext,
};
pub use pager::Pager;
pub use query::{FilterState, QueryMapping, SearchMode, SortOrder, SortState};
pub use row::{Row, RowKey, rows_from_json, rows_from_value};
pub use selection::{SelectAllScope, SelectionModel};
pub use value::Value;
