use crate::layer::PseudoLayer;
use serde::{Deserialize, Serialize};

/// Parameters of the windowed regression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingFitParams {
    /// Pseudo-layer pitch along the fit axis (cm).
    pub pitch: f32,
    /// Number of neighbouring layers on each side contributing to a layer fit.
    pub half_window: u32,
    /// Minimum number of populated input layers.
    pub min_layers: usize,
}

impl Default for SlidingFitParams {
    fn default() -> Self {
        Self {
            pitch: PseudoLayer::DEFAULT_PITCH,
            half_window: 20,
            min_layers: 2,
        }
    }
}

impl SlidingFitParams {
    pub fn with_half_window(half_window: u32) -> Self {
        Self {
            half_window,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(format!("pitch must be positive, got {}", self.pitch));
        }
        if i32::try_from(self.half_window).is_err() {
            return Err(format!("half_window {} is too large", self.half_window));
        }
        Ok(())
    }

    pub fn pseudo_layer(&self) -> PseudoLayer {
        PseudoLayer::new(self.pitch)
    }
}
