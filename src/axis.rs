//! Primary-axis frame and the (L, T) coordinate transform.
//!
//! A cluster is described in a local frame made of an origin ("intercept")
//! and a unit direction. For a point `p` with `d = p - intercept`:
//!
//! - `L = d · direction`
//! - `T = ±|d × direction|`, negative when the Y component of the cross
//!   product is negative.
//!
//! The positive-T axis is `direction × Ŷ`, so for points in the XZ plane the
//! transform round-trips exactly (up to rounding). The Y-based sign choice is
//! a fixed orientation convention kept for compatibility with existing fits.

use crate::fit::FitError;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisFrame {
    intercept: Vector3<f32>,
    direction: Vector3<f32>,
}

impl AxisFrame {
    /// Builds a frame from an origin and a (not necessarily unit) direction.
    /// Returns `None` for a zero or non-finite direction.
    pub fn new(intercept: Vector3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let norm = direction.norm();
        if !norm.is_finite() || norm <= f32::EPSILON {
            return None;
        }
        Some(Self {
            intercept,
            direction: direction / norm,
        })
    }

    /// Detector Z axis through the origin; T then measures (minus) X.
    pub fn z_axis() -> Self {
        Self {
            intercept: Vector3::zeros(),
            direction: Vector3::z(),
        }
    }

    /// Least-squares principal axis of a point set.
    ///
    /// The intercept is the centroid and the direction the eigenvector of the
    /// largest covariance eigenvalue, oriented towards +Z (or +X when the
    /// axis is perpendicular to Z).
    pub fn from_points<'a, I>(points: I) -> Result<Self, FitError>
    where
        I: IntoIterator<Item = &'a Vector3<f32>>,
    {
        let points: Vec<Vector3<f64>> = points.into_iter().map(|p| p.cast::<f64>()).collect();
        if points.len() < 2 {
            return Err(FitError::InsufficientData {
                found: points.len(),
                minimum: 2,
            });
        }

        let n = points.len() as f64;
        let centroid = points.iter().fold(Vector3::<f64>::zeros(), |acc, p| acc + p) / n;
        let mut cov = Matrix3::<f64>::zeros();
        for p in &points {
            let d = p - centroid;
            cov += d * d.transpose();
        }
        cov /= n;

        let eig = SymmetricEigen::new(cov);
        let (imax, lambda) = eig
            .eigenvalues
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f64::NEG_INFINITY), |best, (i, v)| {
                if v > best.1 {
                    (i, v)
                } else {
                    best
                }
            });
        if lambda <= f64::from(f32::EPSILON) {
            return Err(FitError::InsufficientData {
                found: 1,
                minimum: 2,
            });
        }

        let mut direction: Vector3<f32> = eig.eigenvectors.column(imax).into_owned().cast::<f32>();
        let flip = if direction.z.abs() > f32::EPSILON {
            direction.z < 0.0
        } else {
            direction.x < 0.0
        };
        if flip {
            direction = -direction;
        }

        Self::new(centroid.cast::<f32>(), direction).ok_or(FitError::InsufficientData {
            found: 1,
            minimum: 2,
        })
    }

    #[inline]
    pub fn intercept(&self) -> &Vector3<f32> {
        &self.intercept
    }

    #[inline]
    pub fn direction(&self) -> &Vector3<f32> {
        &self.direction
    }

    /// Unit vector of increasing T.
    #[inline]
    pub fn transverse_direction(&self) -> Vector3<f32> {
        self.direction.cross(&Vector3::y())
    }

    /// Projects a global point into `(L, T)`.
    pub fn to_local(&self, position: &Vector3<f32>) -> (f32, f32) {
        let displacement = position - self.intercept;
        let cross = displacement.cross(&self.direction);
        let l = displacement.dot(&self.direction);
        let t = if cross.y < 0.0 {
            -cross.norm()
        } else {
            cross.norm()
        };
        (l, t)
    }

    pub fn to_global(&self, l: f32, t: f32) -> Vector3<f32> {
        self.intercept + self.direction * l + self.transverse_direction() * t
    }

    /// Global unit direction of a local line with slope `dT/dL = gradient`.
    pub fn direction_from_gradient(&self, gradient: f32) -> Vector3<f32> {
        let norm = (1.0 + gradient * gradient).sqrt();
        let step = self.direction * (1.0 / norm) + self.transverse_direction() * (gradient / norm);
        step.normalize()
    }
}
