//! Shape queries derived from a finished sliding fit: the largest local
//! scatter (kink candidate), folding in global X and the transverse width.
//!
//! Everything here is read-only over a [`SlidingFitResult`] and goes through
//! the interpolation surface, so the same bracketing and boundary rules apply.

use crate::fit::{FitError, SlidingFitParams, SlidingFitResult, SlidingFitter};
use crate::types::Cluster;
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Thresholds of the derived shape queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Arms whose directions agree better than this (cosine) are not a kink.
    pub max_scatter_cos_theta: f32,
    /// Arms noisier than this RMS are ignored by the scatter search.
    pub max_scatter_rms: f32,
    /// Steps with `|dx| > tan * |dz|` count towards the X folding test.
    pub multivalued_tan_theta_cut: f32,
    /// Minority to majority ratio of steep X steps above which a fit folds.
    pub multivalued_step_fraction_cut: f32,
    /// Quantile of the per-layer RMS taken as the track width.
    pub track_residual_quantile: f32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            max_scatter_cos_theta: 0.95,
            max_scatter_rms: 0.45,
            multivalued_tan_theta_cut: 1.0,
            multivalued_step_fraction_cut: 0.5,
            track_residual_quantile: 0.8,
        }
    }
}

/// Location and strength of the sharpest direction change along a fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scatter {
    /// Populated layer at the centre of the two compared arms.
    pub layer: i32,
    /// Estimated kink vertex in global coordinates.
    pub position: Vector3<f32>,
    /// Cosine of the opening angle between the upstream and downstream arms.
    pub cos_theta: f32,
    /// Larger of the two arm RMS values.
    pub rms: f32,
}

/// One straight arm of a candidate kink.
struct Arm {
    position: Vector3<f32>,
    direction: Vector3<f32>,
    rms: f32,
}

impl SlidingFitResult {
    /// Finds the layer whose upstream and downstream arms, `half_window`
    /// layers away on either side, disagree most in direction.
    ///
    /// Returns `None` when no pair of clean arms opens by more than
    /// `max_scatter_cos_theta`, or when the fit is too short to hold two
    /// arms.
    pub fn largest_scatter(&self, params: &ShapeParams) -> Option<Scatter> {
        let half_window = i32::try_from(self.half_window()).ok()?;
        if self.layer_span() <= 2 * self.half_window() as usize {
            return None;
        }

        let mut best: Option<(i32, Arm, Arm, f32)> = None;
        let mut best_cos = params.max_scatter_cos_theta;
        for &layer in self.layer_fits().keys() {
            let (Some(upstream), Some(downstream)) = (
                self.arm(layer.saturating_sub(half_window)),
                self.arm(layer.saturating_add(half_window)),
            ) else {
                continue;
            };
            let rms = upstream.rms.max(downstream.rms);
            let cos_theta = upstream.direction.dot(&downstream.direction);
            if rms < params.max_scatter_rms && cos_theta < best_cos {
                best_cos = cos_theta;
                best = Some((layer, upstream, downstream, rms));
            }
        }

        let (layer, upstream, downstream, rms) = best?;
        let position = self
            .arm_vertex(&upstream, &downstream)
            .or_else(|| self.layer_fit(layer).map(|fit| self.layer_position(fit)))?;
        Some(Scatter {
            layer,
            position,
            cos_theta: best_cos,
            rms,
        })
    }

    /// True when the fitted trajectory turns back on itself in global X.
    pub fn is_multivalued_in_x(&self, params: &ShapeParams) -> bool {
        let positions: Vec<Vector3<f32>> = self
            .layer_fits()
            .values()
            .map(|fit| self.layer_position(fit))
            .collect();

        let (mut forward, mut backward) = (0.0f32, 0.0f32);
        for pair in positions.windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dz = pair[1].z - pair[0].z;
            if dx.abs() <= params.multivalued_tan_theta_cut * dz.abs() {
                continue;
            }
            if dx > 0.0 {
                forward += dx;
            } else {
                backward -= dx;
            }
        }

        if forward <= 0.0 || backward <= 0.0 {
            return false;
        }
        forward.min(backward) / forward.max(backward) > params.multivalued_step_fraction_cut
    }

    /// Quantile of the per-layer residual RMS values.
    pub fn sliding_fit_width(&self, quantile: f32) -> f32 {
        let mut rms: Vec<f32> = self.layer_fits().values().map(|fit| fit.rms).collect();
        rms.sort_by(f32::total_cmp);
        let index = ((quantile.clamp(0.0, 1.0) * rms.len() as f32) as usize).min(rms.len() - 1);
        rms[index]
    }

    fn arm(&self, layer: i32) -> Option<Arm> {
        let layers = self.pseudo_layer();
        let l = layers.position_of(layer) + 0.5 * layers.pitch();
        match self.arm_at(l) {
            Ok(arm) => Some(arm),
            Err(err) => {
                if !err.is_recoverable() {
                    debug!("largest_scatter: skipping arm at layer {layer}: {err}");
                }
                None
            }
        }
    }

    fn arm_at(&self, l: f32) -> Result<Arm, FitError> {
        Ok(Arm {
            position: self.global_position_at(l)?,
            direction: self.global_direction_at(l)?,
            rms: self.rms_at(l)?,
        })
    }

    /// Midpoint of closest approach of the two arm lines, if it lies
    /// between the arms along the axis.
    fn arm_vertex(&self, upstream: &Arm, downstream: &Arm) -> Option<Vector3<f32>> {
        let (d1, d2) = (&upstream.direction, &downstream.direction);
        let w0 = upstream.position - downstream.position;
        let b = d1.dot(d2);
        let d = d1.dot(&w0);
        let e = d2.dot(&w0);
        let denom = 1.0 - b * b;
        if denom < f32::EPSILON {
            return None;
        }
        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        let vertex = (upstream.position + d1 * s + downstream.position + d2 * t) * 0.5;

        let (l_vertex, _) = self.to_local(&vertex);
        let (l_up, _) = self.to_local(&upstream.position);
        let (l_down, _) = self.to_local(&downstream.position);
        (l_up.min(l_down)..=l_up.max(l_down))
            .contains(&l_vertex)
            .then_some(vertex)
    }
}

/// Fits a cluster and returns its sliding-fit width.
pub fn track_width(
    cluster: &Cluster,
    params: &SlidingFitParams,
    quantile: f32,
) -> Result<f32, FitError> {
    let fit = SlidingFitter::new(params.clone()).fit(cluster)?;
    Ok(fit.sliding_fit_width(quantile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bent_track, folded_arc};

    fn fitter() -> SlidingFitter {
        SlidingFitter::new(SlidingFitParams::with_half_window(10))
    }

    #[test]
    fn straight_track_has_no_scatter() {
        let fit = fitter().fit(&bent_track(0.0)).expect("fit");
        assert!(fit.largest_scatter(&ShapeParams::default()).is_none());
        assert!(!fit.is_multivalued_in_x(&ShapeParams::default()));
        assert!(fit.sliding_fit_width(0.8) < 1e-4);
    }

    #[test]
    fn bend_is_located_at_the_vertex() {
        for angle in [30.0f32, 90.0] {
            let fit = fitter().fit(&bent_track(angle)).expect("fit");
            let scatter = fit
                .largest_scatter(&ShapeParams::default())
                .unwrap_or_else(|| panic!("{angle} degree bend must scatter"));
            let miss = (scatter.position - Vector3::new(0.0, 0.0, 30.0)).norm();
            assert!(miss < 0.3, "{angle} deg: vertex {:?}", scatter.position);
            assert!(
                (scatter.cos_theta - angle.to_radians().cos()).abs() < 0.02,
                "{angle} deg: cos {}",
                scatter.cos_theta
            );
            assert!(scatter.rms < 0.1, "{angle} deg: arm rms {}", scatter.rms);
        }
    }

    #[test]
    fn tight_threshold_rejects_gentle_bend() {
        let fit = fitter().fit(&bent_track(30.0)).expect("fit");
        let strict = ShapeParams {
            max_scatter_cos_theta: 0.8,
            ..ShapeParams::default()
        };
        assert!(fit.largest_scatter(&strict).is_none());
    }

    #[test]
    fn short_fit_cannot_hold_two_arms() {
        let short = Cluster::from_positions((0..15).map(|i| Vector3::new(0.0, 0.0, i as f32 * 0.3)));
        let fit = fitter().fit(&short).expect("fit");
        assert!(fit.layer_span() <= 20);
        assert!(fit.largest_scatter(&ShapeParams::default()).is_none());
    }

    #[test]
    fn arc_folding_in_x_is_multivalued() {
        let fit = SlidingFitter::new(SlidingFitParams::with_half_window(3))
            .fit(&folded_arc())
            .expect("arc fit");
        assert!(fit.is_multivalued_in_x(&ShapeParams::default()));

        let gentle = fitter().fit(&bent_track(30.0)).expect("fit");
        assert!(!gentle.is_multivalued_in_x(&ShapeParams::default()));
        let right_angle = fitter().fit(&bent_track(90.0)).expect("fit");
        assert!(!right_angle.is_multivalued_in_x(&ShapeParams::default()));
    }

    #[test]
    fn width_is_the_rms_quantile() {
        let zigzag = Cluster::from_positions((0..100).map(|i| {
            let x = if i % 2 == 0 { 0.2 } else { -0.2 };
            Vector3::new(x, 0.0, (i as f32 + 0.5) * 0.3)
        }));
        let params = SlidingFitParams::with_half_window(5);
        let width = track_width(&zigzag, &params, 0.8).expect("width");
        assert!((width - 0.2).abs() < 0.01, "width={width}");

        let fit = SlidingFitter::new(params).fit_along_z(&zigzag).expect("fit");
        assert!(fit.sliding_fit_width(0.0) <= fit.sliding_fit_width(1.0));
        assert!(track_width(&Cluster::default(), &SlidingFitParams::default(), 0.8).is_err());
    }
}
