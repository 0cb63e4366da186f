//! Per-cell rendering with fault isolation.
//!
//! Render and subtext functions are caller code. One malformed record must
//! not take down a row, let alone the whole grid, so every caller-supplied
//! function runs inside [`std::panic::catch_unwind`]. When a call unwinds,
//! the boundary swallows the panic, reports a [`CellFault`] on the grid's
//! diagnostics signal (and `tracing`), and substitutes a readable label
//! derived from the raw cell value. Isolation is strictly per-cell: sibling
//! cells of the same row render normally.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use slate_core::Signal;

use crate::model::{ColumnSpec, Row, RowKey, Subtext};

/// Diagnostic record for one failed cell render.
#[derive(Debug, Clone)]
pub struct CellFault {
    /// Key of the column whose render failed.
    pub column: String,
    /// Identity of the row being rendered.
    pub row_key: RowKey,
    /// Panic message, if one could be extracted.
    pub message: String,
}

/// One rendered cell: display text plus optional subtext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// Main display text.
    pub text: String,
    /// Secondary line under the text, if the column defines one.
    pub subtext: Option<String>,
    /// Whether `text` is the fallback label after a render fault.
    pub faulted: bool,
}

/// Renders one cell through the isolation boundary.
pub(crate) fn render_cell(
    column: &ColumnSpec,
    row: &Row,
    faults: &Signal<CellFault>,
) -> RenderedCell {
    let value = row.resolve(&column.key);

    let (text, faulted) = match &column.render {
        Some(render) => match catch_unwind(AssertUnwindSafe(|| render(value, row))) {
            Ok(text) => (text, false),
            Err(payload) => {
                report_fault(column, row, payload, faults);
                (value.label(), true)
            }
        },
        None => (value.to_text(), false),
    };

    let subtext = match &column.subtext {
        Some(Subtext::Path(path)) => {
            let text = row.resolve(path).to_text();
            (!text.is_empty()).then_some(text)
        }
        Some(Subtext::Derive(derive)) => {
            match catch_unwind(AssertUnwindSafe(|| derive(row))) {
                Ok(text) => (!text.is_empty()).then_some(text),
                Err(payload) => {
                    report_fault(column, row, payload, faults);
                    None
                }
            }
        }
        None => None,
    };

    RenderedCell {
        text,
        subtext,
        faulted,
    }
}

fn report_fault(
    column: &ColumnSpec,
    row: &Row,
    payload: Box<dyn Any + Send>,
    faults: &Signal<CellFault>,
) {
    let fault = CellFault {
        column: column.key.clone(),
        row_key: row.key(),
        message: panic_message(payload.as_ref()),
    };
    tracing::warn!(
        target: "slate_grid::cell",
        column = %fault.column,
        message = %fault.message,
        "cell render failed, substituting fallback label"
    );
    faults.emit(fault);
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn row() -> Row {
        Row::new()
            .with_field("id", 1)
            .with_field("name", "Ann")
            .with_field("email", "ann@school.test")
    }

    #[test]
    fn test_plain_cell_shows_stringified_value() {
        let column = ColumnSpec::new("name", "Name");
        let cell = render_cell(&column, &row(), &Signal::new());
        assert_eq!(cell.text, "Ann");
        assert!(!cell.faulted);
        assert!(cell.subtext.is_none());
    }

    #[test]
    fn test_custom_render_and_subtext_path() {
        let column = ColumnSpec::new("name", "Name")
            .with_render(|value, _| value.to_text().to_uppercase())
            .with_subtext_path("email");

        let cell = render_cell(&column, &row(), &Signal::new());
        assert_eq!(cell.text, "ANN");
        assert_eq!(cell.subtext.as_deref(), Some("ann@school.test"));
    }

    #[test]
    fn test_empty_subtext_path_is_none() {
        let column = ColumnSpec::new("name", "Name").with_subtext_path("missing");
        let cell = render_cell(&column, &row(), &Signal::new());
        assert!(cell.subtext.is_none());
    }

    #[test]
    fn test_panicking_render_falls_back_and_reports() {
        let column = ColumnSpec::new("name", "Name")
            .with_render(|_, _| panic!("renderer exploded"));
        let faults = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        faults.connect(move |fault: &CellFault| {
            seen_clone.lock().push((fault.column.clone(), fault.message.clone()));
        });

        let cell = render_cell(&column, &row(), &faults);
        assert!(cell.faulted);
        assert_eq!(cell.text, "Ann"); // label of the raw value

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "name");
        assert!(seen[0].1.contains("renderer exploded"));
    }

    #[test]
    fn test_fallback_label_for_record_value() {
        // The raw value is a record; the fallback label prefers its name.
        let row = Row::new().with_field(
            "homeroom",
            Value::from(serde_json::json!({ "id": 4, "name": "Grade 5B" })),
        );
        let column = ColumnSpec::new("homeroom", "Homeroom")
            .with_render(|_, _| panic!("boom"));

        let cell = render_cell(&column, &row, &Signal::new());
        assert!(cell.faulted);
        assert_eq!(cell.text, "Grade 5B");
    }

    #[test]
    fn test_panicking_subtext_keeps_main_text() {
        let column = ColumnSpec::new("name", "Name")
            .with_subtext(|_| panic!("subtext exploded"));
        let faults = Signal::new();
        let count = Arc::new(Mutex::new(0usize));

        let count_clone = count.clone();
        faults.connect(move |_: &CellFault| {
            *count_clone.lock() += 1;
        });

        let cell = render_cell(&column, &row(), &faults);
        assert_eq!(cell.text, "Ann");
        assert!(cell.subtext.is_none());
        assert!(!cell.faulted); // main text rendered fine
        assert_eq!(*count.lock(), 1);
    }
}
