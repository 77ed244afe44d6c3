//! Bracket search over the sparse layer map.

use super::error::FitError;
use super::result::{LayerFitResult, SlidingFitResult};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::Bound::{Excluded, Unbounded};

/// Global coordinate used by coordinate-mode queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinate {
    X,
    Z,
}

impl Coordinate {
    #[inline]
    pub fn of(self, v: &Vector3<f32>) -> f32 {
        match self {
            Coordinate::X => v.x,
            Coordinate::Z => v.z,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coordinate::X => f.write_str("x"),
            Coordinate::Z => f.write_str("z"),
        }
    }
}

/// The one or two populated layers surrounding a query and their blend weights.
///
/// `first_weight + second_weight == 1`. When both layers coincide the
/// weights are `(0.5, 0.5)` and interpolation returns the single layer as is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub first_layer: i32,
    pub second_layer: i32,
    pub first_weight: f32,
    pub second_weight: f32,
}

impl Bracket {
    fn single(layer: i32) -> Self {
        Self {
            first_layer: layer,
            second_layer: layer,
            first_weight: 0.5,
            second_weight: 0.5,
        }
    }

    fn between(first_layer: i32, second_layer: i32, offset: f32, separation: f32) -> Result<Self, FitError> {
        if separation.abs() < f32::EPSILON {
            return Err(FitError::DegenerateSeparation {
                first_layer,
                second_layer,
            });
        }
        let second_weight = offset / separation;
        Ok(Self {
            first_layer,
            second_layer,
            first_weight: 1.0 - second_weight,
            second_weight,
        })
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.first_layer == self.second_layer
    }
}

impl SlidingFitResult {
    /// Brackets a longitudinal coordinate with weights linear in `L`.
    pub fn locate(&self, l: f32) -> Result<Bracket, FitError> {
        let target = self.target_layer(l)?;
        if target == self.min_layer() || target == self.max_layer() {
            return Ok(Bracket::single(target));
        }

        let (&first_layer, first) = self
            .layer_fits()
            .range(..=target)
            .next_back()
            .ok_or(FitError::LayerNotFound { layer: target })?;
        let (&second_layer, second) = self
            .layer_fits()
            .range((Excluded(target), Unbounded))
            .next()
            .ok_or(FitError::LayerNotFound {
                layer: target.saturating_add(1),
            })?;

        Bracket::between(first_layer, second_layer, l - first.l, second.l - first.l)
    }

    /// Brackets a global X or Z coordinate with weights linear in that
    /// coordinate.
    ///
    /// The layer-to-coordinate mapping need not be monotonic, so the search
    /// runs in two phases: an anchor layer is taken at the inverted axis
    /// projection, then the map is walked away from it, in the direction that
    /// moves the coordinate towards the target, up to the first layer lying on
    /// the other side of the target. The walk is linear in the number of
    /// populated layers in the worst case.
    pub fn locate_by_coordinate(&self, p: f32, coordinate: Coordinate) -> Result<Bracket, FitError> {
        let axis_component = coordinate.of(self.axis().direction());
        if axis_component.abs() < f32::EPSILON {
            return Err(FitError::InvalidAxis { coordinate });
        }

        let l_estimate = (p - coordinate.of(self.axis().intercept())) / axis_component;
        let target = self.target_layer(l_estimate)?;
        if target == self.min_layer() || target == self.max_layer() {
            return Ok(Bracket::single(target));
        }

        let (anchor_layer, anchor_value) = self.anchor_layer(target, coordinate)?;
        let anchor_offset = p - anchor_value;
        if anchor_offset.abs() < f32::EPSILON {
            return Ok(Bracket::single(anchor_layer));
        }

        let anchor_ahead = anchor_value > p;
        let increases_with_layer = axis_component > 0.0;
        let step: i32 = if anchor_ahead == increases_with_layer { -1 } else { 1 };

        let crossing = if step < 0 {
            self.first_crossing(
                self.layer_fits().range(..anchor_layer).rev(),
                p,
                anchor_ahead,
                coordinate,
            )
        } else {
            self.first_crossing(
                self.layer_fits().range((Excluded(anchor_layer), Unbounded)),
                p,
                anchor_ahead,
                coordinate,
            )
        };
        let (second_layer, second_value) = crossing.ok_or(FitError::OutOfRange {
            layer: target,
            min_layer: self.min_layer(),
            max_layer: self.max_layer(),
        })?;

        Bracket::between(
            anchor_layer,
            second_layer,
            anchor_offset,
            second_value - anchor_value,
        )
    }

    /// Layer of `l`, required to lie inside the fitted layer range.
    fn target_layer(&self, l: f32) -> Result<i32, FitError> {
        let target = self
            .pseudo_layer()
            .try_layer_of(l)
            .ok_or(FitError::NotANumber)?;
        self.check_in_range(target)?;
        Ok(target)
    }

    /// Nearest populated layer at or above `target`, with its global coordinate.
    fn anchor_layer(&self, target: i32, coordinate: Coordinate) -> Result<(i32, f32), FitError> {
        let (&layer, fit) = self
            .layer_fits()
            .range(target..)
            .next()
            .ok_or(FitError::LayerNotFound { layer: target })?;
        Ok((layer, coordinate.of(&self.layer_position(fit))))
    }

    fn first_crossing<'a, I>(
        &self,
        candidates: I,
        p: f32,
        anchor_ahead: bool,
        coordinate: Coordinate,
    ) -> Option<(i32, f32)>
    where
        I: Iterator<Item = (&'a i32, &'a LayerFitResult)>,
    {
        candidates
            .map(|(&layer, fit)| (layer, coordinate.of(&self.layer_position(fit))))
            .find(|&(_, value)| (value > p) != anchor_ahead)
    }
}
