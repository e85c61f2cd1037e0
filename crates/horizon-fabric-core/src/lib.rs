//! Core systems for Horizon Fabric.
//!
//! This crate provides the foundation shared by every Horizon Fabric
//! component:
//!
//! - **Errors**: [`FabricError`] and the crate-wide [`Result`] alias
//! - **Logging**: `tracing` targets, span names and the `fabric_*!` macros
//! - **Signal/Slot System**: Type-safe change notification between components
//! - **Geometry**: The [`Orientation`] axis used when measuring content
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_fabric_core::Signal;
//!
//! let item_moved = Signal::<String>::new();
//!
//! let conn_id = item_moved.connect(|key| {
//!     println!("{key} moved into the overflow menu");
//! });
//!
//! item_moved.emit("share".to_string());
//! item_moved.disconnect(conn_id);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use error::{FabricError, Result};
pub use geometry::Orientation;
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
