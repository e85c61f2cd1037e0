//! Axis types shared by measuring components.

/// The axis along which a component measures and negotiates its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Content is laid out left to right; widths are negotiated.
    #[default]
    Horizontal,
    /// Content is laid out top to bottom; heights are negotiated.
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_defaults_to_horizontal() {
        assert_eq!(Orientation::default(), Orientation::Horizontal);
    }
}
