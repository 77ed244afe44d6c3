use super::locate::Coordinate;

/// Reasons why a sliding fit cannot be built or queried.
///
/// `InsufficientData` and `OutOfRange` describe clusters or positions that
/// are simply not covered by a fit. `LayerNotFound` and
/// `DegenerateSeparation` indicate an inconsistent layer map. `NotANumber`
/// is a NaN query coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitError {
    InsufficientData {
        found: usize,
        minimum: usize,
    },
    OutOfRange {
        layer: i32,
        min_layer: i32,
        max_layer: i32,
    },
    LayerNotFound {
        layer: i32,
    },
    DegenerateSeparation {
        first_layer: i32,
        second_layer: i32,
    },
    InvalidAxis {
        coordinate: Coordinate,
    },
    NotANumber,
}

impl FitError {
    /// True for outcomes callers treat as "not a candidate" rather than a defect.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FitError::InsufficientData { .. } | FitError::OutOfRange { .. }
        )
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData { found, minimum } => {
                write!(f, "insufficient data for sliding fit ({found} < {minimum})")
            }
            FitError::OutOfRange {
                layer,
                min_layer,
                max_layer,
            } => write!(
                f,
                "layer {layer} outside fitted range [{min_layer}, {max_layer}]"
            ),
            FitError::LayerNotFound { layer } => {
                write!(f, "no populated layer found from layer {layer}")
            }
            FitError::DegenerateSeparation {
                first_layer,
                second_layer,
            } => write!(
                f,
                "layers {first_layer} and {second_layer} coincide, cannot interpolate"
            ),
            FitError::InvalidAxis { coordinate } => write!(
                f,
                "fit axis has no {coordinate} component, cannot query by {coordinate}"
            ),
            FitError::NotANumber => f.write_str("query coordinate is NaN"),
        }
    }
}

impl std::error::Error for FitError {}
