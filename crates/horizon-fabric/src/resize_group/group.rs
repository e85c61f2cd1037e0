//! The orchestrating component that drives measurement passes.

use std::sync::Arc;

use horizon_fabric_core::logging::{span_names, targets};
use horizon_fabric_core::{ConnectionGuard, FabricError, Orientation, PerfSpan, Result, Signal};
use parking_lot::Mutex;

use super::cache::{ScalingData, SharedMeasurementCache};
use super::options::{ExhaustionPolicy, ResizeGroupOptions};
use super::resolver::{NextStateResolver, ResizeGroupProps};
use super::state::{NegotiationState, ResizeDirection};

/// The rendering layer a [`ResizeGroup`] measures against.
///
/// Implementations render a candidate into a hidden surface that shares the
/// container's styling and report its extent along `orientation`. Both
/// methods may fail, for instance when the surface has been detached; the
/// group then abandons the pass instead of committing anything.
pub trait MeasureSurface<D> {
    /// Measure `data` rendered off-screen.
    fn measure(&self, data: &D, orientation: Orientation) -> Result<f32>;

    /// The space currently available in the mounted container.
    fn container_size(&self, orientation: Orientation) -> Result<f32>;
}

/// Result of one scheduling turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing is left to measure. The committed layout is final until the
    /// next trigger.
    Settled,
    /// The negotiation needs at least one more pass.
    Pending,
    /// The pass could not measure and was dropped. The committed layout is
    /// unchanged.
    Abandoned,
}

/// Pending container notifications, written by observers.
#[derive(Debug, Default)]
struct ContainerTracker {
    dirty: bool,
    reported: Option<f32>,
}

type RenderFn<D, R> = Box<dyn Fn(&D) -> R + Send + Sync>;

/// Renders as much of its data as fits in its container.
///
/// A resize group holds the caller's ideal data and a render callback. Each
/// call to [`process_pass`](Self::process_pass) is one scheduling turn: the
/// group asks the [`NextStateResolver`] what to do, lets the
/// [`MeasureSurface`] measure at most one candidate, and commits the result
/// to its visible output through the render callback once a candidate fits.
///
/// Until a new candidate is committed the previous output stays visible, so
/// hosts can interleave passes with regular frames without flicker.
///
/// # Example
///
/// ```
/// use horizon_fabric::resize_group::{MeasureSurface, ResizeGroup, ResizeGroupProps, ScalingData};
/// use horizon_fabric::{Orientation, Result};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Words(Vec<&'static str>);
///
/// impl ScalingData for Words {
///     fn cache_key(&self) -> Option<&str> {
///         None
///     }
/// }
///
/// struct Monospace;
///
/// impl MeasureSurface<Words> for Monospace {
///     fn measure(&self, data: &Words, _: Orientation) -> Result<f32> {
///         Ok(data.0.join(" ").len() as f32 * 8.0)
///     }
///
///     fn container_size(&self, _: Orientation) -> Result<f32> {
///         Ok(100.0)
///     }
/// }
///
/// let words = Words(vec!["save", "share", "print", "export", "archive"]);
/// let props = ResizeGroupProps::new(words, |w: &Words| {
///     (w.0.len() > 1).then(|| Words(w.0[..w.0.len() - 1].to_vec()))
/// });
/// let mut group = ResizeGroup::new(props, |w: &Words| w.0.join(" "));
///
/// group.mount(&Monospace).unwrap();
/// group.settle(&Monospace).unwrap();
/// assert_eq!(group.rendered_output().map(String::as_str), Some("save share"));
/// ```
pub struct ResizeGroup<D, R> {
    props: ResizeGroupProps<D>,
    on_render_data: RenderFn<D, R>,
    options: ResizeGroupOptions,
    resolver: NextStateResolver,
    state: NegotiationState<D>,
    rendered_output: Option<R>,
    container: Arc<Mutex<ContainerTracker>>,
    observer: Option<ConnectionGuard<f32>>,
    mounted: bool,
    negotiation_passes: usize,
    render_count: usize,
    data_rendered: Signal<()>,
}

impl<D: ScalingData, R> ResizeGroup<D, R> {
    /// Create an unmounted resize group.
    pub fn new<F>(props: ResizeGroupProps<D>, on_render_data: F) -> Self
    where
        F: Fn(&D) -> R + Send + Sync + 'static,
    {
        let options = ResizeGroupOptions::default();
        Self {
            state: NegotiationState::initial(props.data.clone()),
            props,
            on_render_data: Box::new(on_render_data),
            resolver: NextStateResolver::from_options(&options),
            options,
            rendered_output: None,
            container: Arc::new(Mutex::new(ContainerTracker::default())),
            observer: None,
            mounted: false,
            negotiation_passes: 0,
            render_count: 0,
            data_rendered: Signal::new(),
        }
    }

    /// Replace the options using builder pattern. The cache is kept.
    pub fn with_options(mut self, options: ResizeGroupOptions) -> Self {
        self.resolver =
            NextStateResolver::from_options(&options).with_cache(self.resolver.cache().clone());
        self.options = options;
        self
    }

    /// Measure through `cache` instead of a private one, using builder pattern.
    pub fn with_cache(mut self, cache: SharedMeasurementCache) -> Self {
        self.resolver = self.resolver.with_cache(cache);
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach the group to its container and run the first pass.
    ///
    /// Mounting again after [`unmount`](Self::unmount) starts a fresh
    /// negotiation; cached measurements are kept.
    pub fn mount<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<D> + ?Sized,
    {
        tracing::debug!(target: targets::RESIZE_GROUP, "mounting resize group");
        self.mounted = true;
        self.negotiation_passes = 0;
        self.state = NegotiationState {
            rendered_data: self.state.rendered_data.take(),
            ..NegotiationState::initial(self.props.data.clone())
        };
        self.process_pass(surface)
    }

    /// Detach the group.
    ///
    /// Any in-flight measurement is cancelled and container observers are
    /// disconnected. The last committed output stays available.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        tracing::debug!(target: targets::RESIZE_GROUP, "unmounting resize group");
        self.mounted = false;
        self.observer = None;
        *self.container.lock() = ContainerTracker::default();

        let rendered = self.state.rendered_data.take();
        let mut state = std::mem::take(&mut self.state).committed(rendered);
        state.measure_container = false;
        self.state = state;
    }

    /// Whether the group is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Follow the size reported by a resize observer.
    ///
    /// Each emission marks the container as resized; the emitted size is used
    /// on the next pass instead of querying the surface. Replaces any
    /// previously observed signal and is released on unmount.
    pub fn observe_container(&mut self, resized: &Signal<f32>) {
        let container = Arc::clone(&self.container);
        self.observer = Some(resized.connect_scoped(move |&size| {
            let mut tracker = container.lock();
            tracker.dirty = true;
            tracker.reported = Some(size);
        }));
    }

    /// Mark the container as resized. The next pass re-reads its size.
    pub fn notify_container_resized(&self) {
        self.container.lock().dirty = true;
    }

    /// Replace the ideal data and restart negotiation from it.
    ///
    /// The visible output is kept until the new data settles.
    pub fn set_data(&mut self, data: D) {
        self.props.data = data;
        self.restart("data changed");
    }

    /// Replace the props (ideal data and step functions) and restart.
    pub fn set_props(&mut self, props: ResizeGroupProps<D>) {
        self.props = props;
        self.restart("props changed");
    }

    /// Restart negotiation from the ideal data even though neither the data
    /// nor the container changed, for example after the content's shape
    /// changed behind an unchanged value.
    pub fn remeasure(&mut self) {
        self.restart("remeasure requested");
    }

    fn restart(&mut self, reason: &'static str) {
        if !self.mounted {
            tracing::debug!(target: targets::RESIZE_GROUP, reason, "ignoring trigger while unmounted");
            return;
        }
        if self.state.is_measuring() {
            tracing::warn!(target: targets::RESIZE_GROUP, reason, "superseding in-flight measurement");
        } else {
            tracing::debug!(target: targets::RESIZE_GROUP, reason, "restarting negotiation");
        }

        self.negotiation_passes = 0;
        let state = std::mem::take(&mut self.state)
            .with_data_to_measure(self.props.data.clone(), ResizeDirection::Shrink);
        self.state = NegotiationState {
            measure_container: true,
            ..state
        };
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Run one scheduling turn.
    ///
    /// Calls the resolver at most once and measures at most one candidate.
    /// Measurement failures abandon the pass and are not returned as errors;
    /// the committed layout stays as it was.
    ///
    /// # Errors
    ///
    /// Returns [`FabricError::Unmounted`] when the group is not mounted.
    pub fn process_pass<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<D> + ?Sized,
    {
        if !self.mounted {
            return Err(FabricError::Unmounted);
        }
        let _span = PerfSpan::new(span_names::MEASURE_PASS);
        let orientation = self.options.orientation;

        let container_size = match self.take_container_size(surface) {
            Ok(size) => size,
            Err(err) => return Ok(self.abandon(err)),
        };

        if container_size.is_some()
            && self.state.rendered_data.is_none()
            && !self.state.is_measuring()
        {
            // Nothing on screen and nothing pending: try the ideal data again.
            self.state = NegotiationState::initial(self.props.data.clone());
        }

        tracing::debug!(
            target: targets::RESIZE_GROUP,
            ?container_size,
            measuring = self.state.is_measuring(),
            "starting measurement pass"
        );

        let next = {
            let _resolve = PerfSpan::new(span_names::RESOLVE);
            self.resolver.next_state(
                &self.props,
                &self.state,
                |data| surface.measure(data, orientation),
                container_size,
            )
        };

        match next {
            Ok(Some(next)) => self.apply(next),
            Ok(None) => {}
            Err(err) if err.is_recoverable() => return Ok(self.abandon(err)),
            Err(err) => return Err(err),
        }

        self.enforce_pass_limit();
        Ok(self.outcome())
    }

    /// Run passes until the negotiation settles or a pass is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`FabricError::Unsettled`] when the negotiation still needs
    /// measurements after [`ResizeGroupOptions::max_passes_per_settle`]
    /// passes, and [`FabricError::Unmounted`] when the group is not mounted.
    pub fn settle<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<D> + ?Sized,
    {
        let passes = self.options.max_passes_per_settle;
        for _ in 0..passes {
            match self.process_pass(surface)? {
                PassOutcome::Pending => {}
                outcome => return Ok(outcome),
            }
        }

        tracing::warn!(target: targets::RESIZE_GROUP, passes, "negotiation did not settle");
        Err(FabricError::Unsettled { passes })
    }

    fn take_container_size<S>(&mut self, surface: &S) -> Result<Option<f32>>
    where
        S: MeasureSurface<D> + ?Sized,
    {
        let reported = {
            let mut tracker = self.container.lock();
            if !tracker.dirty && !self.state.measure_container {
                return Ok(None);
            }
            tracker.dirty = false;
            tracker.reported.take()
        };

        let size = match reported {
            Some(size) => size,
            None => surface.container_size(self.options.orientation)?,
        };
        FabricError::check_measurement(size).map(Some)
    }

    fn apply(&mut self, next: NegotiationState<D>) {
        let commit = next.rendered_data != self.state.rendered_data;
        self.state = next;
        if commit {
            self.render_committed();
        }
    }

    fn render_committed(&mut self) {
        self.rendered_output = self
            .state
            .rendered_data
            .as_ref()
            .map(|data| (self.on_render_data)(data));
        if self.rendered_output.is_some() {
            self.render_count += 1;
        }
        tracing::debug!(
            target: targets::RESIZE_GROUP,
            render_count = self.render_count,
            empty = self.rendered_output.is_none(),
            "committed rendered data"
        );
        self.data_rendered.emit(());
    }

    fn abandon(&mut self, err: FabricError) -> PassOutcome {
        tracing::warn!(
            target: targets::RESIZE_GROUP,
            error = %err,
            "abandoning measurement pass, keeping committed data"
        );
        self.negotiation_passes = 0;
        let rendered = self.state.rendered_data.take();
        let mut state = std::mem::take(&mut self.state).committed(rendered);
        state.measure_container = false;
        self.state = state;
        PassOutcome::Abandoned
    }

    fn enforce_pass_limit(&mut self) {
        if !self.state.is_measuring() {
            self.negotiation_passes = 0;
            return;
        }
        self.negotiation_passes += 1;

        let Some(limit) = self.options.max_reduce_steps else {
            return;
        };
        if self.negotiation_passes < limit {
            return;
        }

        tracing::warn!(
            target: targets::RESIZE_GROUP,
            passes = self.negotiation_passes,
            "measurement pass limit reached, treating data as exhausted"
        );
        self.negotiation_passes = 0;
        let rendered = self.state.rendered_data.clone();
        let committed = match self.options.exhaustion {
            ExhaustionPolicy::CommitSmallest => self.state.data_to_measure.clone().or(rendered),
            ExhaustionPolicy::RetainRendered => rendered,
        };
        let next = self.state.clone().committed(committed);
        self.apply(next);
    }

    fn outcome(&self) -> PassOutcome {
        let pending = self.state.is_measuring()
            || self.state.measure_container
            || self.container.lock().dirty;
        if pending {
            PassOutcome::Pending
        } else {
            PassOutcome::Settled
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current negotiation state.
    pub fn state(&self) -> &NegotiationState<D> {
        &self.state
    }

    /// The caller's props.
    pub fn props(&self) -> &ResizeGroupProps<D> {
        &self.props
    }

    /// The options in effect.
    pub fn options(&self) -> &ResizeGroupOptions {
        &self.options
    }

    /// The measurement cache consulted by this group.
    pub fn cache(&self) -> &SharedMeasurementCache {
        self.resolver.cache()
    }

    /// Output of the render callback for the committed data.
    pub fn rendered_output(&self) -> Option<&R> {
        self.rendered_output.as_ref()
    }

    /// The committed data.
    pub fn rendered_data(&self) -> Option<&D> {
        self.state.rendered_data.as_ref()
    }

    /// Whether a candidate is waiting for measurement.
    pub fn is_measuring(&self) -> bool {
        self.state.is_measuring()
    }

    /// How many times the render callback has run.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Signal emitted after every commit.
    pub fn data_rendered(&self) -> &Signal<()> {
        &self.data_rendered
    }
}

impl<D: std::fmt::Debug, R> std::fmt::Debug for ResizeGroup<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeGroup")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("mounted", &self.mounted)
            .field("render_count", &self.render_count)
            .finish_non_exhaustive()
    }
}
