//! Error types for Horizon Fabric.

/// A specialized Result type for Horizon Fabric operations.
pub type Result<T> = std::result::Result<T, FabricError>;

/// The main error type for Horizon Fabric operations.
///
/// Measurement errors never escape a `ResizeGroup`'s render output: the
/// group recovers by abandoning the in-flight pass and keeping the last
/// committed data on screen. They are still reported through this type so
/// that hosts driving passes by hand can log or retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FabricError {
    /// The measuring surface could not produce a size (for example the
    /// off-screen element is not attached).
    #[error("Measurement unavailable: {reason}")]
    MeasurementUnavailable { reason: String },

    /// The measuring surface returned a size that cannot be compared.
    #[error("Invalid measurement {width}: sizes must be finite and non-negative")]
    InvalidMeasurement { width: f32 },

    /// The component has been unmounted and no longer negotiates.
    #[error("The resize group has been unmounted")]
    Unmounted,

    /// Negotiation kept requesting measurements past the pass budget.
    #[error("Negotiation did not settle after {passes} passes")]
    Unsettled { passes: usize },
}

impl FabricError {
    /// Create a measurement-unavailable error.
    pub fn measurement_unavailable(reason: impl Into<String>) -> Self {
        Self::MeasurementUnavailable {
            reason: reason.into(),
        }
    }

    /// Validate a raw measurement coming from a surface.
    ///
    /// Returns the width unchanged when it is finite and non-negative.
    pub fn check_measurement(width: f32) -> Result<f32> {
        if width.is_finite() && width >= 0.0 {
            Ok(width)
        } else {
            Err(Self::InvalidMeasurement { width })
        }
    }

    /// Whether this error only affects the current measurement pass.
    ///
    /// Recoverable errors leave the committed state untouched and a later
    /// trigger (resize, data change, remeasure) can try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MeasurementUnavailable { .. } | Self::InvalidMeasurement { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_measurement() {
        assert_eq!(FabricError::check_measurement(0.0), Ok(0.0));
        assert_eq!(FabricError::check_measurement(42.5), Ok(42.5));
        assert!(matches!(
            FabricError::check_measurement(-1.0),
            Err(FabricError::InvalidMeasurement { .. })
        ));
        assert!(FabricError::check_measurement(f32::NAN).is_err());
        assert!(FabricError::check_measurement(f32::INFINITY).is_err());
    }

    #[test]
    fn test_recoverable() {
        assert!(FabricError::measurement_unavailable("detached").is_recoverable());
        assert!(FabricError::InvalidMeasurement { width: -3.0 }.is_recoverable());
        assert!(!FabricError::Unmounted.is_recoverable());
        assert!(!FabricError::Unsettled { passes: 4 }.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = FabricError::measurement_unavailable("element detached");
        assert_eq!(err.to_string(), "Measurement unavailable: element detached");
        assert_eq!(
            FabricError::Unsettled { passes: 8 }.to_string(),
            "Negotiation did not settle after 8 passes"
        );
    }
}
