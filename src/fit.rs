//! Sliding linear fit over the hits of a 2D cluster.
//!
//! The fit works in the local `(L, T)` frame of an [`AxisFrame`]:
//!
//! - Every hit is projected to `(L, T)` and assigned to the pseudo-layer of
//!   its `L` coordinate.
//! - For each populated layer, the hits of all layers within
//!   `half_window` on either side are summarized into least-squares
//!   sufficient statistics and a straight line `T(L)` is solved.
//! - The layer keeps a compact record: a representative `L` (the layer
//!   position `layer * pitch`), the fitted `T` at that `L`, the local
//!   gradient and the RMS of the window residuals. Windows with a degenerate `L` spread
//!   produce no record, so the layer map is sparse.
//!
//! The resulting [`SlidingFitResult`] is immutable. Queries locate the one or
//! two populated layers bracketing a longitudinal position (or a global X/Z
//! coordinate) and blend their records linearly. At the first and last
//! populated layers the bracket collapses onto that layer instead of
//! extrapolating.
//!
//! See also
//! - `crate::shape` for scatter, multi-valuedness and width estimates built
//!   on the query surface.
//! - `crate::splitting` for kink-split candidate selection.
//!
//! [`AxisFrame`]: crate::axis::AxisFrame

mod builder;
mod contribution;
mod error;
mod locate;
mod params;
mod query;
mod result;


pub use builder::{AxisMode, ShowerEdge, SlidingFitter};
pub use error::FitError;
pub use locate::{Bracket, Coordinate};
pub use params::SlidingFitParams;
pub use result::{LayerFitResult, SlidingFitResult};
