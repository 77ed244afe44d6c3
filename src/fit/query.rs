//! Interpolated position, direction and RMS queries.

use super::error::FitError;
use super::locate::{Bracket, Coordinate};
use super::result::SlidingFitResult;
use nalgebra::Vector3;

impl SlidingFitResult {
    pub fn global_position_at(&self, l: f32) -> Result<Vector3<f32>, FitError> {
        let bracket = self.locate(l)?;
        self.interpolated_position(&bracket)
    }

    pub fn global_direction_at(&self, l: f32) -> Result<Vector3<f32>, FitError> {
        let bracket = self.locate(l)?;
        self.interpolated_direction(&bracket)
    }

    pub fn rms_at(&self, l: f32) -> Result<f32, FitError> {
        let bracket = self.locate(l)?;
        let first = self.require_layer(bracket.first_layer)?;
        if bracket.is_single() {
            return Ok(first.rms);
        }
        let second = self.require_layer(bracket.second_layer)?;
        Ok(first.rms * bracket.first_weight + second.rms * bracket.second_weight)
    }

    /// Fit position at the longitudinal coordinate of `position`.
    pub fn project_onto_fit(&self, position: &Vector3<f32>) -> Result<Vector3<f32>, FitError> {
        let (l, _) = self.to_local(position);
        self.global_position_at(l)
    }

    pub fn global_position_at_coordinate(
        &self,
        p: f32,
        coordinate: Coordinate,
    ) -> Result<Vector3<f32>, FitError> {
        let bracket = self.locate_by_coordinate(p, coordinate)?;
        self.interpolated_position(&bracket)
    }

    pub fn global_direction_at_coordinate(
        &self,
        p: f32,
        coordinate: Coordinate,
    ) -> Result<Vector3<f32>, FitError> {
        let bracket = self.locate_by_coordinate(p, coordinate)?;
        self.interpolated_direction(&bracket)
    }

    /// Fit position at global `x`, expressed as `(L, T, layer)`.
    pub fn local_fit_position(&self, x: f32) -> Result<(f32, f32, i32), FitError> {
        let position = self.global_position_at_coordinate(x, Coordinate::X)?;
        let (l, t) = self.to_local(&position);
        Ok((l, t, self.pseudo_layer().layer_of(l)))
    }

    pub fn interpolated_position(&self, bracket: &Bracket) -> Result<Vector3<f32>, FitError> {
        let first = self.layer_position(self.require_layer(bracket.first_layer)?);
        if bracket.is_single() {
            return Ok(first);
        }
        let second = self.layer_position(self.require_layer(bracket.second_layer)?);
        Ok(first * bracket.first_weight + second * bracket.second_weight)
    }

    /// Blends the two layer directions and re-normalizes the result.
    pub fn interpolated_direction(&self, bracket: &Bracket) -> Result<Vector3<f32>, FitError> {
        let first = self.layer_direction(self.require_layer(bracket.first_layer)?);
        if bracket.is_single() {
            return Ok(first);
        }
        let second = self.layer_direction(self.require_layer(bracket.second_layer)?);
        (first * bracket.first_weight + second * bracket.second_weight)
            .try_normalize(f32::EPSILON)
            .ok_or(FitError::DegenerateSeparation {
                first_layer: bracket.first_layer,
                second_layer: bracket.second_layer,
            })
    }
}
