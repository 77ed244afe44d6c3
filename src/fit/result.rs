use super::error::FitError;
use crate::axis::AxisFrame;
use crate::layer::PseudoLayer;
use nalgebra::Vector3;
use serde::Serialize;
use std::collections::BTreeMap;

/// Finalized fit record of one populated pseudo-layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFitResult {
    /// Representative longitudinal coordinate, `layer * pitch`.
    pub l: f32,
    /// Fitted transverse coordinate at `l`.
    pub fit_t: f32,
    /// Local slope `dT/dL`.
    pub gradient: f32,
    /// RMS of the transverse residuals inside the layer window.
    pub rms: f32,
}

/// Immutable sliding fit of one cluster.
///
/// Holds the axis frame, the pseudo-layer quantizer and a non-empty ordered
/// map from populated layer index to [`LayerFitResult`].
#[derive(Clone, Debug)]
pub struct SlidingFitResult {
    axis: AxisFrame,
    pseudo_layer: PseudoLayer,
    half_window: u32,
    fits: BTreeMap<i32, LayerFitResult>,
    min_layer: i32,
    max_layer: i32,
}

impl SlidingFitResult {
    /// Wraps an already computed layer map. Fails on an empty map.
    pub(crate) fn from_layer_fits(
        axis: AxisFrame,
        pseudo_layer: PseudoLayer,
        half_window: u32,
        fits: BTreeMap<i32, LayerFitResult>,
    ) -> Result<Self, FitError> {
        let (min_layer, max_layer) = match (fits.keys().next(), fits.keys().next_back()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => {
                return Err(FitError::InsufficientData {
                    found: 0,
                    minimum: 1,
                })
            }
        };
        Ok(Self {
            axis,
            pseudo_layer,
            half_window,
            fits,
            min_layer,
            max_layer,
        })
    }

    #[inline]
    pub fn axis(&self) -> &AxisFrame {
        &self.axis
    }

    #[inline]
    pub fn pseudo_layer(&self) -> &PseudoLayer {
        &self.pseudo_layer
    }

    #[inline]
    pub fn half_window(&self) -> u32 {
        self.half_window
    }

    #[inline]
    pub fn layer_fits(&self) -> &BTreeMap<i32, LayerFitResult> {
        &self.fits
    }

    #[inline]
    pub fn layer_fit(&self, layer: i32) -> Option<&LayerFitResult> {
        self.fits.get(&layer)
    }

    #[inline]
    pub fn min_layer(&self) -> i32 {
        self.min_layer
    }

    #[inline]
    pub fn max_layer(&self) -> i32 {
        self.max_layer
    }

    /// Number of layers between the first and last populated layer, inclusive.
    pub fn layer_span(&self) -> usize {
        (i64::from(self.max_layer) - i64::from(self.min_layer) + 1) as usize
    }

    #[inline]
    pub fn to_local(&self, position: &Vector3<f32>) -> (f32, f32) {
        self.axis.to_local(position)
    }

    #[inline]
    pub fn to_global(&self, l: f32, t: f32) -> Vector3<f32> {
        self.axis.to_global(l, t)
    }

    /// Global position of a layer record.
    #[inline]
    pub fn layer_position(&self, fit: &LayerFitResult) -> Vector3<f32> {
        self.axis.to_global(fit.l, fit.fit_t)
    }

    /// Global unit direction of a layer record.
    #[inline]
    pub fn layer_direction(&self, fit: &LayerFitResult) -> Vector3<f32> {
        self.axis.direction_from_gradient(fit.gradient)
    }

    pub fn min_layer_position(&self) -> Vector3<f32> {
        self.layer_position(&self.fits[&self.min_layer])
    }

    pub fn max_layer_position(&self) -> Vector3<f32> {
        self.layer_position(&self.fits[&self.max_layer])
    }

    pub fn min_layer_direction(&self) -> Vector3<f32> {
        self.layer_direction(&self.fits[&self.min_layer])
    }

    pub fn max_layer_direction(&self) -> Vector3<f32> {
        self.layer_direction(&self.fits[&self.max_layer])
    }

    pub(crate) fn require_layer(&self, layer: i32) -> Result<&LayerFitResult, FitError> {
        self.fits.get(&layer).ok_or(FitError::LayerNotFound { layer })
    }

    pub(crate) fn check_in_range(&self, layer: i32) -> Result<(), FitError> {
        if layer < self.min_layer || layer > self.max_layer {
            return Err(FitError::OutOfRange {
                layer,
                min_layer: self.min_layer,
                max_layer: self.max_layer,
            });
        }
        Ok(())
    }
}
