//! Export service: CSV materialization of the filtered+sorted result.
//!
//! Export must agree exactly with what filtering and sorting produced,
//! never with the current page, so [`GridView::export`] feeds this module
//! the full visible mapping. Field values are the raw resolved values, not
//! custom render output, and every field is quoted (embedded quotes
//! doubled): a quoting discipline, not a quote-if-needed optimization.
//!
//! The result is an in-memory [`ExportDocument`]; persisting or downloading
//! it is the caller's concern.
//!
//! [`GridView::export`]: crate::view::GridView::export

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

use crate::error::{Error, Result};
use crate::model::{ColumnSpec, Row};

/// A materialized export: suggested file name plus document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// `<title lower-cased, spaces to underscores>_<YYYY-MM-DD>.csv`.
    pub file_name: String,
    /// The CSV text, newline-joined without a trailing newline.
    pub content: String,
}

/// Builds the export file name from the grid title and a date.
pub fn file_name(title: &str, date: NaiveDate) -> String {
    let slug = title.to_lowercase().replace(' ', "_");
    format!("{}_{}.csv", slug, date.format("%Y-%m-%d"))
}

/// Writes the header line plus one line per row.
///
/// Headers use column labels, falling back to the key when the label is
/// empty. An empty row iterator still produces a well-formed header-only
/// document.
pub(crate) fn write_csv<'a>(
    columns: &[ColumnSpec],
    rows: impl Iterator<Item = &'a Row>,
) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| {
        if column.label.is_empty() {
            column.key.as_str()
        } else {
            column.label.as_str()
        }
    }))?;

    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| row.resolve(&column.key).to_text()),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(csv::Error::from(e.into_error())))?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}
