//! The negotiation state threaded through resolver calls.

/// Which way the negotiation is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    /// Candidates get smaller until one fits.
    Shrink,
    /// Candidates get larger until one no longer fits.
    Grow,
}

/// An immutable snapshot of a resize negotiation.
///
/// The resolver never mutates a state in place. Each call takes the current
/// snapshot and, when something changes, returns the next one; the
/// orchestrator simply keeps the latest.
///
/// `rendered_data` is what the user sees. It only changes when a candidate is
/// confirmed to fit or the reducer runs out of steps. `data_to_measure` is the
/// candidate waiting for an off-screen measurement; while it is set the
/// previous `rendered_data` stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationState<D> {
    /// Candidate currently being measured (not yet shown).
    pub data_to_measure: Option<D>,
    /// Last committed candidate, confirmed to fit.
    pub rendered_data: Option<D>,
    /// Last known size of the container along the negotiated axis.
    pub container_width: Option<f32>,
    /// Whether the container must be measured before data measurement proceeds.
    pub measure_container: bool,
    /// Direction of the in-flight negotiation, if any.
    pub resize_direction: Option<ResizeDirection>,
}

impl<D> Default for NegotiationState<D> {
    fn default() -> Self {
        Self {
            data_to_measure: None,
            rendered_data: None,
            container_width: None,
            measure_container: false,
            resize_direction: None,
        }
    }
}

impl<D> NegotiationState<D> {
    /// The state a freshly mounted component starts from: nothing rendered,
    /// the ideal data waiting to be measured, and the container size unknown.
    pub fn initial(data: D) -> Self {
        Self {
            data_to_measure: Some(data),
            measure_container: true,
            ..Self::default()
        }
    }

    /// Whether a candidate is waiting for measurement.
    #[inline]
    pub fn is_measuring(&self) -> bool {
        self.data_to_measure.is_some()
    }

    /// Whether this state needs no further passes.
    ///
    /// A settled state has nothing to measure and knows its container.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.data_to_measure.is_none() && !self.measure_container
    }

    pub(crate) fn with_data_to_measure(mut self, data: D, direction: ResizeDirection) -> Self {
        self.data_to_measure = Some(data);
        self.resize_direction = Some(direction);
        self
    }

    pub(crate) fn committed(mut self, data: Option<D>) -> Self {
        self.rendered_data = data;
        self.data_to_measure = None;
        self.resize_direction = None;
        self
    }
}
