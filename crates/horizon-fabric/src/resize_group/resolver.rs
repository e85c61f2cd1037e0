//! The next-state transition function of a resize negotiation.
//!
//! Every call starts from scratch: it looks at the current
//! [`NegotiationState`], the props, and optionally a freshly observed
//! container size, and decides what should happen next. Iteration across
//! several real measurements happens outside, with the orchestrator calling
//! back once per off-screen render.
//!
//! # Algorithm
//!
//! 1. Nothing to do without a new container size or a pending candidate.
//! 2. When a committed layout exists and the container grows, negotiation
//!    restarts from the ideal `props.data`. Growing and reducing are not
//!    guaranteed to be inverses, so the ideal data is the only safe starting
//!    point. With an `on_grow_data` step the resolver instead grows the
//!    committed data one step at a time. A wider container that arrives
//!    while a reduced candidate is pending supersedes it the same way.
//! 3. When the container shrinks, the committed layout is re-measured
//!    against the new size rather than assumed to still fit.
//! 4. A pending candidate is measured (cache first, then the real measuring
//!    function) and either committed, or reduced. Reductions whose size is
//!    already cached are followed in a tight loop, so a chain of cached
//!    candidates resolves with no real measurement at all. The first uncached
//!    reduction ends the call and becomes the next candidate to measure.
//! 5. `None` is returned whenever the next state would equal the current one.

use std::sync::Arc;

use horizon_fabric_core::logging::targets;
use horizon_fabric_core::{FabricError, Result};

use super::cache::{ScalingData, SharedMeasurementCache};
use super::options::{ExhaustionPolicy, ResizeGroupOptions};
use super::state::{NegotiationState, ResizeDirection};

/// A caller-supplied step function that makes data smaller (reduce) or
/// larger (grow). Returning `None` means no further step is possible.
pub type ScalingFn<D> = Arc<dyn Fn(&D) -> Option<D> + Send + Sync>;

/// The caller's side of a negotiation.
#[derive(Clone)]
pub struct ResizeGroupProps<D> {
    /// The ideal, unreduced data.
    pub data: D,
    /// Produces the next smaller candidate.
    ///
    /// Each result is expected to measure smaller than its input. This is a
    /// contract, not something the resolver checks; see
    /// [`ResizeGroupOptions::max_reduce_steps`] for the safety limit.
    pub on_reduce_data: ScalingFn<D>,
    /// Produces the next larger candidate. When absent, growth restarts from
    /// `data`.
    pub on_grow_data: Option<ScalingFn<D>>,
}

impl<D> ResizeGroupProps<D> {
    /// Create props from the ideal data and a reducer.
    pub fn new<F>(data: D, on_reduce_data: F) -> Self
    where
        F: Fn(&D) -> Option<D> + Send + Sync + 'static,
    {
        Self {
            data,
            on_reduce_data: Arc::new(on_reduce_data),
            on_grow_data: None,
        }
    }

    /// Add a grow step using builder pattern.
    pub fn with_grow_data<F>(mut self, on_grow_data: F) -> Self
    where
        F: Fn(&D) -> Option<D> + Send + Sync + 'static,
    {
        self.on_grow_data = Some(Arc::new(on_grow_data));
        self
    }

    /// Replace the ideal data, keeping the step functions.
    pub fn with_data(mut self, data: D) -> Self {
        self.data = data;
        self
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for ResizeGroupProps<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeGroupProps")
            .field("data", &self.data)
            .field("on_grow_data", &self.on_grow_data.is_some())
            .finish_non_exhaustive()
    }
}

/// Outcome of walking candidates within one resolver call.
enum Step<D> {
    /// This candidate fits (or is the last one available); show it.
    Commit(D),
    /// This candidate needs a real measurement before deciding.
    Measure(D, ResizeDirection),
    /// Nothing fits; keep whatever is already on screen.
    RetainRendered,
}

impl<D> Step<D> {
    fn apply(self, state: NegotiationState<D>) -> NegotiationState<D> {
        match self {
            Step::Commit(data) => state.committed(Some(data)),
            Step::Measure(data, direction) => state.with_data_to_measure(data, direction),
            Step::RetainRendered => {
                let mut state = state;
                let rendered = state.rendered_data.take();
                state.committed(rendered)
            }
        }
    }
}

/// Computes the next negotiation state.
///
/// The resolver owns (or shares) the measurement cache and nothing else;
/// all negotiation progress lives in the [`NegotiationState`] it is given.
#[derive(Debug, Clone, Default)]
pub struct NextStateResolver {
    cache: SharedMeasurementCache,
    max_steps: Option<usize>,
    exhaustion: ExhaustionPolicy,
}

impl NextStateResolver {
    /// Create a resolver with a private cache and no step limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver configured from resize group options.
    pub fn from_options(options: &ResizeGroupOptions) -> Self {
        Self {
            cache: SharedMeasurementCache::new(),
            max_steps: options.max_reduce_steps,
            exhaustion: options.exhaustion,
        }
    }

    /// Use `cache` instead of the private one, using builder pattern.
    pub fn with_cache(mut self, cache: SharedMeasurementCache) -> Self {
        self.cache = cache;
        self
    }

    /// Set the step safety limit using builder pattern.
    pub fn with_max_steps(mut self, limit: Option<usize>) -> Self {
        self.max_steps = limit;
        self
    }

    /// Set the exhaustion policy using builder pattern.
    pub fn with_exhaustion(mut self, policy: ExhaustionPolicy) -> Self {
        self.exhaustion = policy;
        self
    }

    /// The cache consulted before every measurement.
    pub fn cache(&self) -> &SharedMeasurementCache {
        &self.cache
    }

    /// Compute the state that follows `current`.
    ///
    /// `measure` renders nothing itself: it reads the size of the candidate
    /// the orchestrator already rendered off-screen, which is always
    /// `current.data_to_measure`. It is called at most once, and only when
    /// the cache has no entry for that candidate.
    ///
    /// Returns `Ok(None)` when nothing would change. Errors from `measure`
    /// are returned untouched and leave no trace in the cache.
    pub fn next_state<D, M>(
        &self,
        props: &ResizeGroupProps<D>,
        current: &NegotiationState<D>,
        measure: M,
        container_width: Option<f32>,
    ) -> Result<Option<NegotiationState<D>>>
    where
        D: ScalingData,
        M: FnOnce(&D) -> Result<f32>,
    {
        if container_width.is_none() && current.data_to_measure.is_none() {
            return Ok(None);
        }

        let mut next = current.clone();

        if let Some(width) = container_width {
            match current.container_width {
                Some(previous) if current.data_to_measure.is_none() => {
                    next = self.container_resized(props, next, previous, width);
                    return Ok(changed(current, next));
                }
                Some(previous) if width > previous && stale_after_growth(props, current) => {
                    next = supersede_with_ideal(props, next, previous, width);
                    return Ok(changed(current, next));
                }
                _ => next.container_width = Some(width),
            }
        }

        let Some(candidate) = current.data_to_measure.clone() else {
            next.measure_container = false;
            return Ok(changed(current, next));
        };

        let Some(available) = next.container_width else {
            // Nothing to compare against yet.
            next.measure_container = true;
            return Ok(changed(current, next));
        };
        next.measure_container = false;

        let measured = self.measured_width(&candidate, measure)?;
        let direction = current.resize_direction.unwrap_or(ResizeDirection::Shrink);
        let step = match (direction, props.on_grow_data.as_ref()) {
            (ResizeDirection::Grow, Some(grow)) => {
                self.grow_until_it_does_not_fit(props, grow, candidate, measured, available)
            }
            _ => self.shrink_until_it_fits(props, candidate, measured, available),
        };

        Ok(changed(current, step.apply(next)))
    }

    /// React to a new container size while a layout is committed.
    fn container_resized<D: ScalingData>(
        &self,
        props: &ResizeGroupProps<D>,
        mut next: NegotiationState<D>,
        previous: f32,
        width: f32,
    ) -> NegotiationState<D> {
        next.container_width = Some(width);
        next.measure_container = false;

        if width > previous {
            tracing::debug!(target: targets::RESIZE_GROUP, previous, width, "container grew");
            let grown = match (props.on_grow_data.as_ref(), next.rendered_data.as_ref()) {
                (Some(grow), Some(rendered)) => Some(grow(rendered)),
                _ => None,
            };
            next = match grown {
                Some(Some(grown)) => next.with_data_to_measure(grown, ResizeDirection::Grow),
                // Fully grown already.
                Some(None) => next,
                None => next.with_data_to_measure(props.data.clone(), ResizeDirection::Shrink),
            };
        } else if width < previous {
            tracing::debug!(target: targets::RESIZE_GROUP, previous, width, "container shrank");
            if let Some(rendered) = next.rendered_data.clone() {
                next = next.with_data_to_measure(rendered, ResizeDirection::Shrink);
            }
        }

        next
    }

    /// Measured size of `data`, from the cache when possible.
    fn measured_width<D, M>(&self, data: &D, measure: M) -> Result<f32>
    where
        D: ScalingData,
        M: FnOnce(&D) -> Result<f32>,
    {
        if let Some(width) = self.cache.cached_measurement(data) {
            return Ok(width);
        }

        let width = FabricError::check_measurement(measure(data)?)?;
        self.cache.add_measurement(data, width);
        Ok(width)
    }

    fn shrink_until_it_fits<D: ScalingData>(
        &self,
        props: &ResizeGroupProps<D>,
        mut candidate: D,
        mut measured: f32,
        available: f32,
    ) -> Step<D> {
        let mut steps = 0usize;

        while measured > available {
            if self.step_limit_reached(steps) {
                tracing::warn!(
                    target: targets::RESIZE_GROUP,
                    steps,
                    "reduce step limit reached, treating data as exhausted"
                );
                return self.exhausted(candidate);
            }

            let Some(reduced) = (props.on_reduce_data)(&candidate) else {
                tracing::debug!(
                    target: targets::RESIZE_GROUP,
                    measured,
                    available,
                    "no further reduction possible"
                );
                return self.exhausted(candidate);
            };
            steps += 1;

            match self.cache.cached_measurement(&reduced) {
                Some(width) => {
                    tracing::trace!(target: targets::RESIZE_GROUP, step = steps, width, "reduced from cache");
                    candidate = reduced;
                    measured = width;
                }
                None => return Step::Measure(reduced, ResizeDirection::Shrink),
            }
        }

        tracing::debug!(target: targets::RESIZE_GROUP, measured, available, "committing candidate");
        Step::Commit(candidate)
    }

    fn grow_until_it_does_not_fit<D: ScalingData>(
        &self,
        props: &ResizeGroupProps<D>,
        grow: &ScalingFn<D>,
        mut candidate: D,
        mut measured: f32,
        available: f32,
    ) -> Step<D> {
        let mut steps = 0usize;

        while measured < available {
            if self.step_limit_reached(steps) {
                tracing::warn!(target: targets::RESIZE_GROUP, steps, "grow step limit reached");
                return Step::Commit(candidate);
            }

            let Some(grown) = grow(&candidate) else {
                return Step::Commit(candidate);
            };
            steps += 1;

            match self.cache.cached_measurement(&grown) {
                Some(width) => {
                    tracing::trace!(target: targets::RESIZE_GROUP, step = steps, width, "grew from cache");
                    candidate = grown;
                    measured = width;
                }
                None => return Step::Measure(grown, ResizeDirection::Grow),
            }
        }

        // Overshot (or exactly filled) the container: settle back down.
        self.shrink_until_it_fits(props, candidate, measured, available)
    }

    fn step_limit_reached(&self, steps: usize) -> bool {
        self.max_steps.is_some_and(|limit| steps >= limit)
    }

    fn exhausted<D>(&self, candidate: D) -> Step<D> {
        match self.exhaustion {
            ExhaustionPolicy::CommitSmallest => Step::Commit(candidate),
            ExhaustionPolicy::RetainRendered => Step::RetainRendered,
        }
    }
}

/// Whether the pending candidate was chosen for a narrower container and may
/// now be smaller than what fits.
///
/// An incremental grow keeps growing from its candidate, so only a pending
/// reduction goes stale.
fn stale_after_growth<D: PartialEq>(props: &ResizeGroupProps<D>, current: &NegotiationState<D>) -> bool {
    let growing = current.resize_direction == Some(ResizeDirection::Grow) && props.on_grow_data.is_some();
    !growing && current.data_to_measure.as_ref() != Some(&props.data)
}

/// Drop the in-flight candidate and negotiate again from the ideal data.
fn supersede_with_ideal<D: Clone>(
    props: &ResizeGroupProps<D>,
    mut next: NegotiationState<D>,
    previous: f32,
    width: f32,
) -> NegotiationState<D> {
    tracing::debug!(
        target: targets::RESIZE_GROUP,
        previous,
        width,
        "container grew mid-negotiation, superseding pending candidate"
    );
    next.container_width = Some(width);
    next.measure_container = false;
    next.with_data_to_measure(props.data.clone(), ResizeDirection::Shrink)
}

fn changed<D: PartialEq>(
    current: &NegotiationState<D>,
    next: NegotiationState<D>,
) -> Option<NegotiationState<D>> {
    (next != *current).then_some(next)
}
