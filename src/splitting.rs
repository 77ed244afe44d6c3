//! Kink splitting: decide whether a cluster bends sharply enough to be cut
//! in two, and where.

use crate::cluster;
use crate::fit::{FitError, SlidingFitParams, SlidingFitter};
use crate::layer::PseudoLayer;
use crate::shape::ShapeParams;
use crate::types::Cluster;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinkSplittingParams {
    /// Layer half window of the sliding fit used for kink finding.
    pub sliding_fit_half_window: u32,
    /// Minimum cluster layer span considered for splitting.
    pub min_cluster_layers: usize,
    /// Minimum fit RMS at the kink position.
    pub min_vertex_scattering_rms: f32,
    /// Minimum of the largest per-layer fit RMS over the whole cluster.
    pub min_overall_scattering_rms: f32,
    pub pitch: f32,
    pub shape: ShapeParams,
}

impl Default for KinkSplittingParams {
    fn default() -> Self {
        Self {
            sliding_fit_half_window: 20,
            min_cluster_layers: 20,
            min_vertex_scattering_rms: 0.1,
            min_overall_scattering_rms: 0.15,
            pitch: PseudoLayer::DEFAULT_PITCH,
            shape: ShapeParams::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct KinkSplitter {
    params: KinkSplittingParams,
}

impl KinkSplitter {
    pub fn new(params: KinkSplittingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KinkSplittingParams {
        &self.params
    }

    fn pseudo_layer(&self) -> PseudoLayer {
        PseudoLayer::new(self.params.pitch)
    }

    /// Cheap pre-selection on the cluster layer span.
    pub fn is_possible_split(&self, cluster: &Cluster) -> bool {
        cluster::layer_span(cluster, &self.pseudo_layer()) >= self.params.min_cluster_layers
    }

    /// Cluster layer at which to split, if the cluster has a clean kink.
    ///
    /// Clusters that cannot be fitted, or whose fit does not reach the kink
    /// position, are not candidates and yield `Ok(None)`. Inconsistent fits
    /// are reported as errors.
    pub fn find_best_split_layer(&self, cluster: &Cluster) -> Result<Option<i32>, FitError> {
        let fitter = SlidingFitter::new(SlidingFitParams {
            pitch: self.params.pitch,
            half_window: self.params.sliding_fit_half_window,
            ..SlidingFitParams::default()
        });
        let fit = match fitter.fit(cluster) {
            Ok(fit) => fit,
            Err(err) if err.is_recoverable() => {
                debug!("KinkSplitter: cluster of {} hits not fitted: {err}", cluster.len());
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let overall_rms = fit
            .layer_fits()
            .values()
            .map(|r| r.rms)
            .fold(0.0f32, f32::max);
        if overall_rms < self.params.min_overall_scattering_rms {
            return Ok(None);
        }

        let Some(scatter) = fit.largest_scatter(&self.params.shape) else {
            return Ok(None);
        };
        let (l, _) = fit.to_local(&scatter.position);
        let vertex_rms = match fit.rms_at(l) {
            Ok(rms) => rms,
            Err(err) if err.is_recoverable() => return Ok(None),
            Err(err) => return Err(err),
        };
        if vertex_rms < self.params.min_vertex_scattering_rms {
            debug!("KinkSplitter: kink rms {vertex_rms:.3} below threshold");
            return Ok(None);
        }

        Ok(Some(self.pseudo_layer().layer_of(scatter.position.z)))
    }

    /// Splits a candidate cluster at its best split layer: hits below the
    /// layer go first, the rest second.
    pub fn split(&self, cluster: &Cluster) -> Result<Option<(Cluster, Cluster)>, FitError> {
        if !self.is_possible_split(cluster) {
            return Ok(None);
        }
        let Some(split_layer) = self.find_best_split_layer(cluster)? else {
            return Ok(None);
        };
        let layers = self.pseudo_layer();
        let (upstream, downstream): (Vec<_>, Vec<_>) = cluster
            .hits
            .iter()
            .cloned()
            .partition(|hit| layers.layer_of(hit.position.z) < split_layer);
        if upstream.is_empty() || downstream.is_empty() {
            return Ok(None);
        }
        debug!(
            "KinkSplitter: split {} hits at layer {split_layer} into {} + {}",
            cluster.len(),
            upstream.len(),
            downstream.len()
        );
        Ok(Some((Cluster::new(upstream), Cluster::new(downstream))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bent_track;
    use nalgebra::Vector3;

    fn splitter() -> KinkSplitter {
        KinkSplitter::new(KinkSplittingParams {
            sliding_fit_half_window: 10,
            ..KinkSplittingParams::default()
        })
    }

    #[test]
    fn short_clusters_are_not_candidates() {
        let short = Cluster::from_positions((0..10).map(|i| Vector3::new(0.0, 0.0, i as f32 * 0.3)));
        assert!(!splitter().is_possible_split(&short));
        assert!(splitter().is_possible_split(&bent_track(30.0)));
        assert_eq!(splitter().split(&short), Ok(None));
    }

    #[test]
    fn straight_track_is_not_split() {
        assert_eq!(splitter().find_best_split_layer(&bent_track(0.0)), Ok(None));
    }

    #[test]
    fn kink_layer_is_at_the_bend() {
        let layer = splitter()
            .find_best_split_layer(&bent_track(30.0))
            .expect("consistent fit")
            .expect("kink found");
        assert!((layer - 100).abs() <= 1, "layer {layer}");
    }

    #[test]
    fn split_separates_the_arms() {
        let (upstream, downstream) = splitter()
            .split(&bent_track(30.0))
            .expect("consistent fit")
            .expect("split");
        assert_eq!(upstream.len() + downstream.len(), 200);
        assert!(upstream.positions().all(|p| p.x.abs() < 1e-6));
        assert!(downstream.len() > 90, "downstream {}", downstream.len());
    }

    #[test]
    fn unfit_clusters_are_not_candidates() {
        assert_eq!(splitter().find_best_split_layer(&Cluster::default()), Ok(None));
    }
}
