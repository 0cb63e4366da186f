//! Core systems for Slate Grid.
//!
//! This crate provides the foundational components shared by the Slate Grid
//! data engine:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Logging**: `tracing` integration and filter targets
//!
//! The engine it supports is single-threaded and synchronous, so the signal
//! system dispatches directly on the emitting thread; see [`signal`] for
//! details.
//!
//! # Signal/Slot Example
//!
//! ```
//! use slate_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
