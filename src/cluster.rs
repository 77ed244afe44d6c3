//! Cheap shape summaries of a cluster that do not need a sliding fit.
//!
//! Layer-based helpers quantize the global Z coordinate of each hit with the
//! supplied [`PseudoLayer`].

use crate::layer::PseudoLayer;
use crate::types::Cluster;
use nalgebra::Vector3;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean energy deposited per unit track length (GeV/cm).
pub const DE_DX: f32 = 0.002;

/// Squared diagonal of the axis-aligned bounding box of the hits.
pub fn length_squared(cluster: &Cluster) -> f32 {
    let mut positions = cluster.positions();
    let Some(first) = positions.next() else {
        return 0.0;
    };
    let (min, max) = positions.fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
    (max - min).norm_squared()
}

pub fn length(cluster: &Cluster) -> f32 {
    length_squared(cluster).sqrt()
}

/// Energy estimate assuming a minimum-ionizing track.
pub fn energy_from_length(cluster: &Cluster) -> f32 {
    DE_DX * length(cluster)
}

/// Mean hit position of every occupied layer.
pub fn layer_centroids(cluster: &Cluster, layers: &PseudoLayer) -> BTreeMap<i32, Vector3<f32>> {
    let mut sums: BTreeMap<i32, (Vector3<f32>, usize)> = BTreeMap::new();
    for p in cluster.positions() {
        let entry = sums
            .entry(layers.layer_of(p.z))
            .or_insert((Vector3::zeros(), 0));
        entry.0 += p;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(layer, (sum, n))| (layer, sum / n as f32))
        .collect()
}

pub fn inner_layer(cluster: &Cluster, layers: &PseudoLayer) -> Option<i32> {
    cluster.positions().map(|p| layers.layer_of(p.z)).min()
}

pub fn outer_layer(cluster: &Cluster, layers: &PseudoLayer) -> Option<i32> {
    cluster.positions().map(|p| layers.layer_of(p.z)).max()
}

/// `1 + outer - inner`, or zero for an empty cluster.
pub fn layer_span(cluster: &Cluster, layers: &PseudoLayer) -> usize {
    match (inner_layer(cluster, layers), outer_layer(cluster, layers)) {
        (Some(inner), Some(outer)) => (i64::from(outer) - i64::from(inner) + 1) as usize,
        _ => 0,
    }
}

pub fn n_occupied_layers(cluster: &Cluster, layers: &PseudoLayer) -> usize {
    layer_centroids(cluster, layers).len()
}

/// Fraction of the spanned layers that hold at least one hit.
pub fn layer_occupancy(cluster: &Cluster, layers: &PseudoLayer) -> f32 {
    let span = layer_span(cluster, layers);
    if span == 0 {
        return 0.0;
    }
    n_occupied_layers(cluster, layers) as f32 / span as f32
}

/// Occupancy of two clusters over their combined layer range.
pub fn pair_layer_occupancy(first: &Cluster, second: &Cluster, layers: &PseudoLayer) -> f32 {
    let inner = inner_layer(first, layers).into_iter().chain(inner_layer(second, layers)).min();
    let outer = outer_layer(first, layers).into_iter().chain(outer_layer(second, layers)).max();
    let (Some(inner), Some(outer)) = (inner, outer) else {
        return 0.0;
    };
    let occupied = n_occupied_layers(first, layers) + n_occupied_layers(second, layers);
    occupied as f32 / (1.0 + (outer - inner) as f32)
}

/// Closest distance between the layer centroids of two clusters.
pub fn closest_distance(first: &Cluster, second: &Cluster, layers: &PseudoLayer) -> Option<f32> {
    let second_centroids = layer_centroids(second, layers);
    layer_centroids(first, layers)
        .values()
        .flat_map(|a| second_centroids.values().map(move |b| (a - b).norm()))
        .min_by(f32::total_cmp)
}

/// Closest distance between a position and the layer centroids of a cluster.
pub fn closest_distance_to_position(
    position: &Vector3<f32>,
    cluster: &Cluster,
    layers: &PseudoLayer,
) -> Option<f32> {
    layer_centroids(cluster, layers)
        .values()
        .map(|c| (c - position).norm())
        .min_by(f32::total_cmp)
}

/// Orders by inner layer, falling back to [`sort_by_n_occupied_layers`].
pub fn sort_by_inner_layer(lhs: &Cluster, rhs: &Cluster, layers: &PseudoLayer) -> Ordering {
    inner_layer(lhs, layers)
        .cmp(&inner_layer(rhs, layers))
        .then_with(|| sort_by_n_occupied_layers(lhs, rhs, layers))
}

/// Most occupied layers first, then most hits, then highest energy.
pub fn sort_by_n_occupied_layers(lhs: &Cluster, rhs: &Cluster, layers: &PseudoLayer) -> Ordering {
    n_occupied_layers(rhs, layers)
        .cmp(&n_occupied_layers(lhs, layers))
        .then_with(|| rhs.len().cmp(&lhs.len()))
        .then_with(|| rhs.total_energy().total_cmp(&lhs.total_energy()))
}

/// Most hits first, then widest layer span, then highest energy.
pub fn sort_by_n_hits(lhs: &Cluster, rhs: &Cluster, layers: &PseudoLayer) -> Ordering {
    rhs.len()
        .cmp(&lhs.len())
        .then_with(|| layer_span(rhs, layers).cmp(&layer_span(lhs, layers)))
        .then_with(|| rhs.total_energy().total_cmp(&lhs.total_energy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaloHit;

    fn track(z_start: f32, n: usize, x: f32) -> Cluster {
        Cluster::from_positions((0..n).map(|i| Vector3::new(x, 0.0, z_start + (i as f32 + 0.5) * 0.3)))
    }

    #[test]
    fn length_uses_bounding_box() {
        let c = Cluster::from_positions([
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 4.0),
        ]);
        assert!((length_squared(&c) - 25.0).abs() < 1e-5);
        assert!((length(&c) - 5.0).abs() < 1e-5);
        assert!((energy_from_length(&c) - 0.01).abs() < 1e-6);
        assert_eq!(length_squared(&Cluster::default()), 0.0);
    }

    #[test]
    fn occupancy_counts_gaps() {
        let layers = PseudoLayer::default();
        let full = track(0.0, 10, 0.0);
        assert_eq!(layer_span(&full, &layers), 10);
        assert!((layer_occupancy(&full, &layers) - 1.0).abs() < 1e-6);

        let gappy = Cluster::from_positions([0.15f32, 0.45, 2.85].map(|z| Vector3::new(0.0, 0.0, z)));
        assert_eq!(layer_span(&gappy, &layers), 10);
        assert!((layer_occupancy(&gappy, &layers) - 0.3).abs() < 1e-6);
        assert_eq!(layer_span(&Cluster::default(), &layers), 0);
        assert_eq!(layer_occupancy(&Cluster::default(), &layers), 0.0);
    }

    #[test]
    fn pair_occupancy_covers_both_ranges() {
        let layers = PseudoLayer::default();
        let upstream = track(0.0, 5, 0.0);
        let downstream = track(3.0, 5, 0.0);
        // Layers 0..=4 and 10..=14 over a combined range of 15.
        let occupancy = pair_layer_occupancy(&upstream, &downstream, &layers);
        assert!((occupancy - 10.0 / 15.0).abs() < 1e-6, "occupancy={occupancy}");
        assert_eq!(pair_layer_occupancy(&Cluster::default(), &Cluster::default(), &layers), 0.0);
    }

    #[test]
    fn closest_distance_between_centroids() {
        let layers = PseudoLayer::default();
        let a = track(0.0, 5, 0.0);
        let b = track(0.0, 5, 2.0);
        let d = closest_distance(&a, &b, &layers).expect("non-empty");
        assert!((d - 2.0).abs() < 1e-5);
        let p = closest_distance_to_position(&Vector3::new(0.0, 0.0, 10.0), &a, &layers)
            .expect("non-empty");
        assert!((p - (10.0 - 1.35)).abs() < 1e-4, "p={p}");
        assert!(closest_distance(&a, &Cluster::default(), &layers).is_none());
    }

    #[test]
    fn comparators_break_ties_in_order() {
        let layers = PseudoLayer::default();
        let early = track(0.0, 5, 0.0);
        let late = track(3.0, 8, 0.0);
        assert_eq!(sort_by_inner_layer(&early, &late, &layers), Ordering::Less);
        assert_eq!(sort_by_n_occupied_layers(&early, &late, &layers), Ordering::Greater);
        assert_eq!(sort_by_n_hits(&late, &early, &layers), Ordering::Less);

        let mut heavy = track(0.0, 5, 1.0);
        for hit in &mut heavy.hits {
            hit.energy = 1.0;
        }
        // Same inner layer, occupancy and hit count: energy decides.
        assert_eq!(sort_by_inner_layer(&heavy, &early, &layers), Ordering::Less);

        let mut clusters = vec![late.clone(), early.clone(), heavy.clone()];
        clusters.sort_by(|a, b| sort_by_inner_layer(a, b, &layers));
        assert_eq!(clusters, vec![heavy, early.clone(), late]);

        let doubled = Cluster::new(
            early
                .hits
                .iter()
                .flat_map(|h| [h.clone(), CaloHit::new(h.position, 0.0)])
                .collect(),
        );
        assert_eq!(sort_by_n_occupied_layers(&doubled, &early, &layers), Ordering::Less);
    }
}
