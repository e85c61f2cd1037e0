//! Configuration for resize negotiation.

use horizon_fabric_core::Orientation;

/// What to commit when the reducer runs out of steps before anything fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExhaustionPolicy {
    /// Commit the smallest candidate that was reached, even though it does
    /// not fit. Nothing the caller produced is lost.
    #[default]
    CommitSmallest,
    /// Keep the last committed data on screen. If nothing was ever committed,
    /// the component renders nothing rather than an overflowing layout.
    RetainRendered,
}

/// Options controlling a [`ResizeGroup`](super::ResizeGroup).
///
/// # Example
///
/// ```
/// use horizon_fabric::resize_group::{ExhaustionPolicy, ResizeGroupOptions};
/// use horizon_fabric::Orientation;
///
/// let options = ResizeGroupOptions::default()
///     .with_orientation(Orientation::Vertical)
///     .with_exhaustion(ExhaustionPolicy::RetainRendered)
///     .with_max_reduce_steps(Some(32));
/// assert_eq!(options.max_reduce_steps, Some(32));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGroupOptions {
    /// Axis that is measured and negotiated.
    pub orientation: Orientation,
    /// Upper bound on reduce or grow steps taken from the cache within one
    /// resolver call, and on measurement passes within one negotiation.
    ///
    /// The reducer is trusted to make data strictly smaller; this limit only
    /// stops a misbehaving reducer from looping forever. `None` disables it.
    pub max_reduce_steps: Option<usize>,
    /// What to commit when nothing fits.
    pub exhaustion: ExhaustionPolicy,
    /// Number of passes [`ResizeGroup::settle`](super::ResizeGroup::settle)
    /// runs before giving up.
    pub max_passes_per_settle: usize,
}

impl Default for ResizeGroupOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            max_reduce_steps: Some(256),
            exhaustion: ExhaustionPolicy::CommitSmallest,
            max_passes_per_settle: 64,
        }
    }
}

impl ResizeGroupOptions {
    /// Set the negotiated axis using builder pattern.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the step safety limit using builder pattern.
    pub fn with_max_reduce_steps(mut self, limit: Option<usize>) -> Self {
        self.max_reduce_steps = limit;
        self
    }

    /// Set the exhaustion policy using builder pattern.
    pub fn with_exhaustion(mut self, policy: ExhaustionPolicy) -> Self {
        self.exhaustion = policy;
        self
    }

    /// Set the pass budget for `settle` using builder pattern.
    pub fn with_max_passes_per_settle(mut self, passes: usize) -> Self {
        self.max_passes_per_settle = passes.max(1);
        self
    }
}

static_assertions::assert_impl_all!(ResizeGroupOptions: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResizeGroupOptions::default();
        assert_eq!(options.orientation, Orientation::Horizontal);
        assert_eq!(options.max_reduce_steps, Some(256));
        assert_eq!(options.exhaustion, ExhaustionPolicy::CommitSmallest);
        assert_eq!(options.max_passes_per_settle, 64);
    }

    #[test]
    fn test_pass_budget_is_at_least_one() {
        let options = ResizeGroupOptions::default().with_max_passes_per_settle(0);
        assert_eq!(options.max_passes_per_settle, 1);
    }
}
