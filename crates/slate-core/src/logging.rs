//! Logging facilities for Slate Grid.
//!
//! Slate Grid uses the `tracing` crate for instrumentation. The library only
//! emits events; to see logs you need to install a tracing subscriber in your
//! application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The constants in [`targets`] can be used in `tracing` filter directives to
//! enable or silence individual subsystems, e.g.
//! `RUST_LOG=slate_grid::query=debug,slate_grid::cell=warn`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "slate_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "slate_core::signal";
    /// Filter/sort pipeline target.
    pub const QUERY: &str = "slate_grid::query";
    /// Selection service target.
    pub const SELECTION: &str = "slate_grid::selection";
    /// Cell rendering boundary target.
    pub const CELL: &str = "slate_grid::cell";
    /// Export service target.
    pub const EXPORT: &str = "slate_grid::export";
}
