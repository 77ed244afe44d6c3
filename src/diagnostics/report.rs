use super::timing::TimingBreakdown;
use crate::axis::AxisFrame;
use crate::fit::SlidingFitResult;
use crate::shape::{Scatter, ShapeParams};
use nalgebra::Vector3;
use serde::Serialize;
use std::path::PathBuf;

/// One populated layer of a fit, in both local and global terms.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSample {
    pub layer: i32,
    pub l: f32,
    pub fit_t: f32,
    pub gradient: f32,
    pub rms: f32,
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
}

/// Everything the demo reports about a successful fit.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitSummary {
    pub axis: AxisFrame,
    pub half_window: u32,
    pub min_layer: i32,
    pub max_layer: i32,
    pub min_position: Vector3<f32>,
    pub max_position: Vector3<f32>,
    pub min_direction: Vector3<f32>,
    pub max_direction: Vector3<f32>,
    pub width: f32,
    pub multivalued_in_x: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Scatter>,
    pub layers: Vec<LayerSample>,
}

impl FitSummary {
    pub fn from_fit(fit: &SlidingFitResult, shape: &ShapeParams) -> Self {
        let layers = fit
            .layer_fits()
            .iter()
            .map(|(&layer, rec)| LayerSample {
                layer,
                l: rec.l,
                fit_t: rec.fit_t,
                gradient: rec.gradient,
                rms: rec.rms,
                position: fit.layer_position(rec),
                direction: fit.layer_direction(rec),
            })
            .collect();
        Self {
            axis: *fit.axis(),
            half_window: fit.half_window(),
            min_layer: fit.min_layer(),
            max_layer: fit.max_layer(),
            min_position: fit.min_layer_position(),
            max_position: fit.max_layer_position(),
            min_direction: fit.min_layer_direction(),
            max_direction: fit.max_layer_direction(),
            width: fit.sliding_fit_width(shape.track_residual_quantile),
            multivalued_in_x: fit.is_multivalued_in_x(shape),
            scatter: fit.largest_scatter(shape),
            layers,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub index: usize,
    pub n_hits: usize,
    pub length: f32,
    pub layer_span: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitSummary>,
    /// Why the cluster could not be fitted or analysed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_layer: Option<i32>,
    pub timing: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub input: PathBuf,
    pub clusters: Vec<ClusterReport>,
    pub timing: TimingBreakdown,
}

impl RunReport {
    pub fn n_fitted(&self) -> usize {
        self.clusters.iter().filter(|c| c.fit.is_some()).count()
    }

    pub fn n_split(&self) -> usize {
        self.clusters.iter().filter(|c| c.split_layer.is_some()).count()
    }
}
