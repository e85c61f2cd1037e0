//! Horizon Fabric - measurement-driven overflow negotiation.
//!
//! This is the main crate of the workspace. It re-exports the core crate and
//! adds the negotiation engine together with the controls built on it:
//!
//! - [`resize_group`]: renders as much of a data set as fits, measuring
//!   candidates off-screen and reducing them until one fits
//! - [`overflow_set`]: inline items plus an overflow button
//! - [`command_bar`]: a command bar that overflows into a menu
//!
//! # Example
//!
//! ```
//! use horizon_fabric::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Tabs(usize);
//!
//! impl ScalingData for Tabs {
//!     fn cache_key(&self) -> Option<&str> {
//!         None
//!     }
//! }
//!
//! struct TabStrip;
//!
//! impl MeasureSurface<Tabs> for TabStrip {
//!     fn measure(&self, tabs: &Tabs, _: Orientation) -> Result<f32> {
//!         Ok(tabs.0 as f32 * 120.0)
//!     }
//!
//!     fn container_size(&self, _: Orientation) -> Result<f32> {
//!         Ok(500.0)
//!     }
//! }
//!
//! let props = ResizeGroupProps::new(Tabs(6), |tabs: &Tabs| tabs.0.checked_sub(1).map(Tabs));
//! let mut group = ResizeGroup::new(props, |tabs: &Tabs| tabs.0);
//! group.mount(&TabStrip)?;
//! group.settle(&TabStrip)?;
//! assert_eq!(group.rendered_output(), Some(&4));
//! # Ok::<(), FabricError>(())
//! ```

pub use horizon_fabric_core::*;

pub mod command_bar;
pub mod overflow_set;
pub mod prelude;
pub mod resize_group;
