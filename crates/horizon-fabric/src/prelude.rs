//! Prelude module for Horizon Fabric.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_fabric::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use crate::{FabricError, Orientation, Result, Signal};

// ============================================================================
// Resize Negotiation
// ============================================================================

pub use crate::resize_group::{
    ExhaustionPolicy, MeasureSurface, MeasurementCache, NegotiationState, NextStateResolver,
    PassOutcome, ResizeGroup, ResizeGroupOptions, ResizeGroupProps, ScalingData,
    SharedMeasurementCache,
};

// ============================================================================
// Controls
// ============================================================================

pub use crate::command_bar::{CommandBar, CommandBarData, CommandBarItem, CommandBarLayout};
pub use crate::overflow_set::{OverflowItem, OverflowSet};
