//! Measurement-driven overflow negotiation.
//!
//! A [`ResizeGroup`] shows as much of its data as fits. It renders a candidate
//! off-screen, measures it, and asks the caller's reducer for a smaller
//! candidate until one fits. Measurements are remembered per cache key in a
//! [`MeasurementCache`], so later passes usually resolve without measuring.
//!
//! # Key Types
//!
//! - [`ScalingData`] - Caller data with an optional cache key
//! - [`NegotiationState`] - Immutable snapshot threaded through resolver calls
//! - [`NextStateResolver`] - The transition function computing the next state
//! - [`ResizeGroup`] - Orchestrator owning the render cycle
//! - [`MeasureSurface`] - Rendering-layer hooks for measuring
//!
//! # Driving the resolver by hand
//!
//! ```
//! use horizon_fabric::resize_group::{NegotiationState, NextStateResolver, ResizeGroupProps, ScalingData};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Scale(u32);
//!
//! impl ScalingData for Scale {
//!     fn cache_key(&self) -> Option<&str> {
//!         None
//!     }
//! }
//!
//! let props = ResizeGroupProps::new(Scale(5), |s: &Scale| s.0.checked_sub(1).map(Scale));
//! let resolver = NextStateResolver::new();
//! let state = NegotiationState::initial(Scale(5));
//!
//! let next = resolver
//!     .next_state(&props, &state, |_| Ok(25.0), Some(10.0))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(next.data_to_measure, Some(Scale(4)));
//! assert!(!next.measure_container);
//! ```

mod cache;
mod group;
mod options;
mod resolver;
mod state;


pub use cache::{MeasurementCache, ScalingData, SharedMeasurementCache};
pub use group::{MeasureSurface, PassOutcome, ResizeGroup};
pub use options::{ExhaustionPolicy, ResizeGroupOptions};
pub use resolver::{NextStateResolver, ResizeGroupProps, ScalingFn};
pub use state::{NegotiationState, ResizeDirection};
