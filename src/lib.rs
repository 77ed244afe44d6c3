#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod axis;
pub mod fit;
pub mod layer;
pub mod shape;
pub mod types;

// Consumers of the fit: cluster summaries, kink splitting, tooling.
pub mod analyzer;
pub mod cluster;
pub mod config;
pub mod diagnostics;
pub mod io;
pub mod splitting;

#[cfg(test)]
mod test_support;

// --- High-level re-exports -------------------------------------------------

pub use crate::analyzer::{AnalyzerParams, ClusterAnalyzer};
pub use crate::axis::AxisFrame;
pub use crate::fit::{
    AxisMode, Coordinate, FitError, SlidingFitParams, SlidingFitResult, SlidingFitter,
};
pub use crate::layer::PseudoLayer;
pub use crate::shape::{Scatter, ShapeParams};
pub use crate::types::{CaloHit, Cluster};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use sliding_fit::prelude::*;
/// use nalgebra::Vector3;
///
/// let cluster = Cluster::from_positions(
///     (0..100).map(|i| Vector3::new(0.0, 0.0, (i as f32 + 0.5) * 0.3)),
/// );
/// let fit = SlidingFitter::new(SlidingFitParams::with_half_window(10))
///     .fit(&cluster)
///     .expect("straight track");
/// let p = fit.global_position_at(0.0).expect("inside the fit");
/// assert!((p.z - 15.0).abs() < 1e-3);
/// assert!(fit.largest_scatter(&ShapeParams::default()).is_none());
/// ```
pub mod prelude {
    pub use crate::fit::{Coordinate, FitError, SlidingFitParams, SlidingFitResult, SlidingFitter};
    pub use crate::shape::ShapeParams;
    pub use crate::types::{CaloHit, Cluster};
}
