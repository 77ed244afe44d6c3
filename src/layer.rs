//! Pseudo-layer quantization of the longitudinal coordinate.

use serde::Serialize;

/// Maps a longitudinal coordinate to an integer layer index with a fixed pitch.
///
/// `layer_of(l)` returns the largest `k` with `position_of(k) <= l`, which
/// makes `layer_of(position_of(k)) == k` hold exactly even where
/// `(k * pitch) / pitch` rounds below `k`. Coordinates beyond the `i32`
/// range saturate to `i32::MIN` / `i32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PseudoLayer {
    pitch: f32,
}

impl PseudoLayer {
    /// Wire pitch (cm) used when nothing else is configured.
    pub const DEFAULT_PITCH: f32 = 0.3;

    /// # Panics
    /// If `pitch` is not a positive finite number.
    pub fn new(pitch: f32) -> Self {
        assert!(
            pitch.is_finite() && pitch > 0.0,
            "pseudo-layer pitch must be positive, got {pitch}"
        );
        Self { pitch }
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// NaN maps to layer 0; [`PseudoLayer::try_layer_of`] rejects it.
    #[inline]
    pub fn layer_of(&self, l: f32) -> i32 {
        // Float-to-int casts saturate, so only the correction step can overflow.
        let layer = (l / self.pitch).floor() as i32;
        if self.position_of(layer) > l {
            layer.saturating_sub(1)
        } else if self.position_of(layer.saturating_add(1)) <= l {
            layer.saturating_add(1)
        } else {
            layer
        }
    }

    /// Like [`PseudoLayer::layer_of`], but `None` for NaN.
    #[inline]
    pub fn try_layer_of(&self, l: f32) -> Option<i32> {
        (!l.is_nan()).then(|| self.layer_of(l))
    }

    #[inline]
    pub fn position_of(&self, layer: i32) -> f32 {
        layer as f32 * self.pitch
    }
}

impl Default for PseudoLayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PITCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_of_position_is_identity() {
        let layers = PseudoLayer::new(0.3);
        for k in -2000..2000 {
            assert_eq!(layers.layer_of(layers.position_of(k)), k, "layer {k}");
        }
        let odd = PseudoLayer::new(0.47);
        for k in -500..500 {
            assert_eq!(odd.layer_of(odd.position_of(k)), k, "layer {k}");
        }
    }

    #[test]
    fn layer_of_floors_negative_coordinates() {
        let layers = PseudoLayer::new(0.5);
        assert_eq!(layers.layer_of(0.0), 0);
        assert_eq!(layers.layer_of(0.49), 0);
        assert_eq!(layers.layer_of(0.51), 1);
        assert_eq!(layers.layer_of(-0.01), -1);
        assert_eq!(layers.layer_of(-0.5), -1);
        assert_eq!(layers.layer_of(-0.51), -2);
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let layers = PseudoLayer::new(0.3);
        assert_eq!(layers.layer_of(1.0e12), i32::MAX);
        assert_eq!(layers.layer_of(-1.0e12), i32::MIN);
        assert_eq!(layers.layer_of(f32::INFINITY), i32::MAX);
        assert_eq!(layers.layer_of(f32::NEG_INFINITY), i32::MIN);
        assert_eq!(layers.try_layer_of(f32::NAN), None);
        assert_eq!(layers.try_layer_of(0.31), Some(1));
    }

    #[test]
    #[should_panic]
    fn rejects_non_positive_pitch() {
        let _ = PseudoLayer::new(0.0);
    }
}
