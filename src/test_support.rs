//! Synthetic clusters shared by the unit tests.

use crate::types::Cluster;
use nalgebra::Vector3;

/// Hit spacing along the trajectory, one default pseudo-layer pitch.
pub const SPACING: f32 = 0.3;

/// `n` hits along +Z half a spacing off the layer edges, with `x = x_of_z(z)`.
pub fn line_along_z(n: usize, x_of_z: impl Fn(f32) -> f32) -> Cluster {
    Cluster::from_positions((0..n).map(|i| {
        let z = (i as f32 + 0.5) * SPACING;
        Vector3::new(x_of_z(z), 0.0, z)
    }))
}

/// 200 hits over 60 cm along +Z, bent in the XZ plane by `angle_deg` at `z = 30`.
pub fn bent_track(angle_deg: f32) -> Cluster {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Cluster::from_positions((0..200).map(|i| {
        let s = (i as f32 + 0.5) * SPACING;
        if s <= 30.0 {
            Vector3::new(0.0, 0.0, s)
        } else {
            let r = s - 30.0;
            Vector3::new(r * sin, 0.0, 30.0 + r * cos)
        }
    }))
}

/// Arc of radius 10 around the origin swept from -80 to +80 degrees.
/// X first grows, then shrinks again.
pub fn folded_arc() -> Cluster {
    let n = 279;
    Cluster::from_positions((0..=n).map(|i| {
        let theta = (-80.0 + 160.0 * i as f32 / n as f32).to_radians();
        Vector3::new(10.0 * theta.cos(), 0.0, 10.0 * theta.sin())
    }))
}
