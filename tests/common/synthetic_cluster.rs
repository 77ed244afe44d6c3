use nalgebra::Vector3;
use sliding_fit::Cluster;

/// Hit spacing along the trajectory, one pseudo-layer pitch.
pub const SPACING: f32 = 0.3;

/// `n` hits along +Z starting half a spacing above the origin.
pub fn straight_track(n: usize) -> Cluster {
    Cluster::from_positions((0..n).map(|i| Vector3::new(0.0, 0.0, (i as f32 + 0.5) * SPACING)))
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

/// Straight track along +Z with hits alternating `±amplitude` in X.
pub fn zigzag_track(n: usize, amplitude: f32) -> Cluster {
    Cluster::from_positions((0..n).map(|i| {
        let x = if i % 2 == 0 { amplitude } else { -amplitude };
        Vector3::new(x, 0.0, (i as f32 + 0.5) * SPACING)
    }))
}

/// Arc of `radius` around the origin swept from -80 to +80 degrees, hits
/// roughly `0.1` apart. X first grows, then shrinks again.
pub fn folded_arc(radius: f32) -> Cluster {
    let n = (radius * 160f32.to_radians() / 0.1) as usize;
    Cluster::from_positions((0..=n).map(|i| {
        let theta = (-80.0 + 160.0 * i as f32 / n as f32).to_radians();
        Vector3::new(radius * theta.cos(), 0.0, radius * theta.sin())
    }))
}
