//! Logging and tracing facilities for Horizon Fabric.
//!
//! Horizon Fabric uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("horizon_fabric=debug"))
//!         .init();
//! }
//! ```
//!
//! # Levels
//!
//! - `trace`: cache hits and misses, every reduce or grow step
//! - `debug`: pass starts, commits, container size changes
//! - `warn`: abandoned passes and safety-limit trips
//!
//! Measurement passes are wrapped in a [`PerfSpan`] so that the cost of
//! off-screen rendering shows up in profilers that consume spans.

/// Span names used throughout Horizon Fabric for tracing.
///
/// Pass these to [`PerfSpan::new`].
pub mod span_names {
    /// One orchestrated measurement pass.
    pub const MEASURE_PASS: &str = "horizon_fabric::measure_pass";
    /// A single resolver invocation.
    pub const RESOLVE: &str = "horizon_fabric::resolve";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target, used by the `fabric_*!` macros.
    pub const CORE: &str = "horizon_fabric_core";
    /// Resize negotiation (resolver and orchestrator).
    pub const RESIZE_GROUP: &str = "horizon_fabric::resize_group";
    /// Measurement cache target.
    pub const CACHE: &str = "horizon_fabric::cache";
    /// Command bar target.
    pub const COMMAND_BAR: &str = "horizon_fabric::command_bar";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Each measurement pass and resolver call runs inside one.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_fabric::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Log at `trace` under [`targets::CORE`].
#[macro_export]
macro_rules! fabric_trace {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Log at `debug` under [`targets::CORE`].
#[macro_export]
macro_rules! fabric_debug {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it compiles and doesn't panic without a subscriber
        let _span = PerfSpan::new(span_names::MEASURE_PASS);
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::CORE,
            targets::RESIZE_GROUP,
            targets::CACHE,
            targets::COMMAND_BAR,
        ] {
            assert!(target.starts_with("horizon_fabric"));
        }
    }

    #[test]
    fn test_macros_expand() {
        fabric_trace!(step = 1, "trace");
        fabric_debug!("debug");
    }
}
