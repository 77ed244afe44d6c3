//! Windowed regression builder.

use super::contribution::LayerFitContribution;
use super::error::FitError;
use super::params::SlidingFitParams;
use super::result::{LayerFitResult, SlidingFitResult};
use crate::axis::AxisFrame;
use crate::types::Cluster;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the fit axis of a cluster is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisMode {
    /// Principal axis of the cluster hits.
    #[default]
    Principal,
    /// Detector Z axis; fits X as a function of Z.
    ZAxis,
}

/// Which transverse extreme of a shower is fitted by
/// [`SlidingFitter::fit_shower_edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowerEdge {
    /// Largest `T` per layer.
    Positive,
    /// Smallest `T` per layer.
    Negative,
}

impl ShowerEdge {
    #[inline]
    fn is_beyond(self, t: f32, current: f32) -> bool {
        match self {
            ShowerEdge::Positive => t > current,
            ShowerEdge::Negative => t < current,
        }
    }
}

/// Builds [`SlidingFitResult`]s from clusters.
#[derive(Clone, Debug, Default)]
pub struct SlidingFitter {
    params: SlidingFitParams,
}

impl SlidingFitter {
    /// Fitting panics on a non-positive pitch; check untrusted parameters
    /// with [`SlidingFitParams::validate`] first.
    pub fn new(params: SlidingFitParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SlidingFitParams {
        &self.params
    }

    /// Fits along the principal axis of the cluster.
    pub fn fit(&self, cluster: &Cluster) -> Result<SlidingFitResult, FitError> {
        let axis = AxisFrame::from_points(cluster.positions())?;
        self.fit_with_axis(cluster, axis)
    }

    /// Fits X as a function of Z.
    pub fn fit_along_z(&self, cluster: &Cluster) -> Result<SlidingFitResult, FitError> {
        self.fit_with_axis(cluster, AxisFrame::z_axis())
    }

    pub fn fit_using(&self, cluster: &Cluster, mode: AxisMode) -> Result<SlidingFitResult, FitError> {
        match mode {
            AxisMode::Principal => self.fit(cluster),
            AxisMode::ZAxis => self.fit_along_z(cluster),
        }
    }

    pub fn fit_with_axis(
        &self,
        cluster: &Cluster,
        axis: AxisFrame,
    ) -> Result<SlidingFitResult, FitError> {
        let samples = cluster.positions().map(|p| axis.to_local(p));
        self.fit_local(axis, samples)
    }

    /// Fits one transverse edge of a shower-like cluster: only the most
    /// extreme hit (in `T`) of each pseudo-layer contributes.
    pub fn fit_shower_edge(
        &self,
        cluster: &Cluster,
        axis: AxisFrame,
        edge: ShowerEdge,
    ) -> Result<SlidingFitResult, FitError> {
        let pseudo_layer = self.params.pseudo_layer();
        let mut extremes: BTreeMap<i32, (f32, f32)> = BTreeMap::new();
        for position in cluster.positions() {
            let (l, t) = axis.to_local(position);
            extremes
                .entry(pseudo_layer.layer_of(l))
                .and_modify(|e| {
                    if edge.is_beyond(t, e.1) {
                        *e = (l, t);
                    }
                })
                .or_insert((l, t));
        }
        self.fit_local(axis, extremes.into_values())
    }

    /// Fits every cluster independently; in parallel with the `parallel` feature.
    pub fn fit_clusters(&self, clusters: &[Cluster]) -> Vec<Result<SlidingFitResult, FitError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            clusters.par_iter().map(|c| self.fit(c)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            clusters.iter().map(|c| self.fit(c)).collect()
        }
    }

    fn fit_local<I>(&self, axis: AxisFrame, samples: I) -> Result<SlidingFitResult, FitError>
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let pseudo_layer = self.params.pseudo_layer();
        let half_window = i32::try_from(self.params.half_window).unwrap_or(i32::MAX);

        let mut contributions: BTreeMap<i32, LayerFitContribution> = BTreeMap::new();
        for (l, t) in samples {
            contributions
                .entry(pseudo_layer.layer_of(l))
                .or_default()
                .add_point(l, t);
        }

        let minimum = self.params.min_layers.max(1);
        if contributions.len() < minimum {
            debug!(
                "SlidingFitter: {} populated layers, need {}",
                contributions.len(),
                minimum
            );
            return Err(FitError::InsufficientData {
                found: contributions.len(),
                minimum,
            });
        }

        let mut fits = BTreeMap::new();
        let mut omitted = 0usize;
        for &layer in contributions.keys() {
            let lo = layer.saturating_sub(half_window);
            let hi = layer.saturating_add(half_window);
            let mut window = LayerFitContribution::default();
            for (_, c) in contributions.range(lo..=hi) {
                window.merge(c);
            }
            let Some(line) = window.solve() else {
                omitted += 1;
                continue;
            };
            // Layers are represented at `layer * pitch`, not at their hits.
            let l = f64::from(pseudo_layer.position_of(layer));
            fits.insert(
                layer,
                LayerFitResult {
                    l: l as f32,
                    fit_t: line.t_at(l) as f32,
                    gradient: line.gradient as f32,
                    rms: line.rms as f32,
                },
            );
        }
        if omitted > 0 {
            debug!(
                "SlidingFitter: omitted {omitted} of {} layers with degenerate windows",
                contributions.len()
            );
        }

        SlidingFitResult::from_layer_fits(axis, pseudo_layer, self.params.half_window, fits)
    }
}
