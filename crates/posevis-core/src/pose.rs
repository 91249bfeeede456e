//! Pose reconstruction.
//!
//! A pose record stores the world-to-camera transform of one image as a unit
//! quaternion `(w, x, y, z)` followed by a translation, the convention used by
//! COLMAP's `images.txt`. The functions here turn that record into the
//! camera-to-world matrix used to place a frustum in the scene.

use glam::{DMat3, DMat4, DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::error::{PosevisError, Result};

/// Number of scalars in a pose record.
pub const POSE_RECORD_LEN: usize = 7;

/// Smallest `|det|` accepted when inverting a world-to-camera matrix.
pub const SINGULARITY_EPSILON: f64 = 1e-12;

/// World-to-camera pose: quaternion `(w, x, y, z)` and translation.
///
/// The quaternion is expected to have unit norm. This is not checked; a
/// non-unit quaternion yields a scaled, non-rigid transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 7]")]
pub struct PoseRecord {
    /// Rotation quaternion in `(w, x, y, z)` order.
    pub qvec: [f64; 4],
    /// Translation of the world-to-camera transform.
    pub tvec: DVec3,
}

impl PoseRecord {
    /// Creates a pose record from its parts.
    #[must_use]
    pub fn new(qvec: [f64; 4], tvec: DVec3) -> Self {
        Self { qvec, tvec }
    }

    /// The identity pose: camera at the origin looking down `+Z`.
    #[must_use]
    pub fn identity() -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0], DVec3::ZERO)
    }

    /// Parses a `[qw, qx, qy, qz, tx, ty, tz]` slice.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != POSE_RECORD_LEN {
            return Err(PosevisError::InvalidInput(format!(
                "pose record must have {POSE_RECORD_LEN} values, got {}",
                values.len()
            )));
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            return Err(PosevisError::InvalidInput(format!(
                "pose record value at index {bad} is not finite"
            )));
        }
        Ok(Self {
            qvec: [values[0], values[1], values[2], values[3]],
            tvec: DVec3::new(values[4], values[5], values[6]),
        })
    }

    /// Returns the record as `[qw, qx, qy, qz, tx, ty, tz]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 7] {
        let [w, x, y, z] = self.qvec;
        [w, x, y, z, self.tvec.x, self.tvec.y, self.tvec.z]
    }

    /// Rotation block of the world-to-camera transform.
    #[must_use]
    pub fn rotation(&self) -> DMat3 {
        quat_to_rotation_matrix(self.qvec)
    }

    /// The 4x4 world-to-camera matrix `[R | t; 0 0 0 1]`.
    #[must_use]
    pub fn world_to_camera(&self) -> DMat4 {
        let r = self.rotation();
        DMat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            DVec4::new(self.tvec.x, self.tvec.y, self.tvec.z, 1.0),
        )
    }

    /// The camera-to-world matrix, see [`camera_to_world`].
    pub fn camera_to_world(&self) -> Result<DMat4> {
        camera_to_world(self)
    }
}

impl TryFrom<Vec<f64>> for PoseRecord {
    type Error = PosevisError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<PoseRecord> for [f64; 7] {
    fn from(pose: PoseRecord) -> Self {
        pose.to_array()
    }
}

/// Converts a `(w, x, y, z)` quaternion to a rotation matrix.
///
/// Uses the closed-form expansion without normalizing, so the result is only
/// orthonormal when `q` has unit norm.
#[must_use]
pub fn quat_to_rotation_matrix(q: [f64; 4]) -> DMat3 {
    let [q0, q1, q2, q3] = q;
    // glam matrices are column-major; rows are spelled out and transposed.
    let rows = DMat3::from_cols(
        DVec3::new(
            1.0 - 2.0 * q2 * q2 - 2.0 * q3 * q3,
            2.0 * q1 * q2 - 2.0 * q0 * q3,
            2.0 * q3 * q1 + 2.0 * q0 * q2,
        ),
        DVec3::new(
            2.0 * q1 * q2 + 2.0 * q0 * q3,
            1.0 - 2.0 * q1 * q1 - 2.0 * q3 * q3,
            2.0 * q2 * q3 - 2.0 * q0 * q1,
        ),
        DVec3::new(
            2.0 * q3 * q1 - 2.0 * q0 * q2,
            2.0 * q2 * q3 + 2.0 * q0 * q1,
            1.0 - 2.0 * q1 * q1 - 2.0 * q2 * q2,
        ),
    );
    rows.transpose()
}

/// Builds the world-to-camera matrix of `pose` and returns its inverse.
///
/// # Errors
///
/// Returns [`PosevisError::Numerical`] when the world-to-camera matrix is
/// singular, which only happens for a degenerate quaternion.
pub fn camera_to_world(pose: &PoseRecord) -> Result<DMat4> {
    invert(&pose.world_to_camera())
}

/// Inverts a 4x4 matrix, rejecting singular input.
pub fn invert(m: &DMat4) -> Result<DMat4> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < SINGULARITY_EPSILON {
        return Err(PosevisError::Numerical(format!(
            "matrix is singular (determinant {det:e})"
        )));
    }
    Ok(m.inverse())
}

/// Returns the matrix as row-major nested arrays.
#[must_use]
pub fn to_row_major(m: &DMat4) -> [[f64; 4]; 4] {
    m.transpose().to_cols_array_2d()
}

/// Camera center in world coordinates, the translation column of `c2w`.
#[must_use]
pub fn camera_center(c2w: &DMat4) -> DVec3 {
    c2w.w_axis.truncate()
}
