//! Camera frustum wireframes.

use glam::{DMat4, DVec3, Vec3};

use crate::error::{PosevisError, Result};
use crate::geometry::LineSet;
use crate::scene::CameraIntrinsics;

/// Default frustum color (red).
pub const DEFAULT_FRUSTUM_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Edges of the frustum pyramid: four struts from the apex, then the base cycle.
pub const FRUSTUM_EDGES: [[u32; 2]; 8] = [
    [0, 1],
    [0, 2],
    [0, 3],
    [0, 4],
    [1, 2],
    [2, 3],
    [3, 4],
    [4, 1],
];

/// A pyramidal wireframe depicting a camera.
///
/// Point 0 is the camera center; points 1-4 are the base corners at depth
/// `size` along the camera's `+Z` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Apex followed by the four base corners.
    pub points: [DVec3; 5],
    /// Index pairs into `points`.
    pub edges: [[u32; 2]; 8],
    /// Uniform line color.
    pub color: Vec3,
}

impl Frustum {
    /// Builds the frustum in the camera's local frame.
    ///
    /// The base half-width is `size`; the half-height is `size` scaled by the
    /// image aspect when intrinsics are given.
    pub fn local(size: f64, intrinsics: Option<CameraIntrinsics>, color: Vec3) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(PosevisError::InvalidInput(format!(
                "frustum size must be positive, got {size}"
            )));
        }
        let wid = size;
        let hei = match intrinsics {
            Some(cam) => {
                if cam.width == 0 || cam.height == 0 {
                    return Err(PosevisError::InvalidInput(format!(
                        "camera size must be non-zero, got {}x{}",
                        cam.width, cam.height
                    )));
                }
                wid * f64::from(cam.height) / f64::from(cam.width)
            }
            None => wid,
        };

        let points = [
            DVec3::ZERO,
            DVec3::new(wid, hei, size),
            DVec3::new(-wid, hei, size),
            DVec3::new(-wid, -hei, size),
            DVec3::new(wid, -hei, size),
        ];

        Ok(Self {
            points,
            edges: FRUSTUM_EDGES,
            color,
        })
    }

    /// Applies a rigid transform to every point; topology is unchanged.
    #[must_use]
    pub fn transformed(&self, m: &DMat4) -> Self {
        Self {
            points: self.points.map(|p| m.transform_point3(p)),
            ..*self
        }
    }

    /// The camera center (apex).
    #[must_use]
    pub fn apex(&self) -> DVec3 {
        self.points[0]
    }

    /// The four base corners.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 4] {
        [self.points[1], self.points[2], self.points[3], self.points[4]]
    }
}

impl From<Frustum> for LineSet {
    fn from(frustum: Frustum) -> Self {
        LineSet::with_uniform_color(
            frustum.points.to_vec(),
            frustum.edges.to_vec(),
            frustum.color,
        )
    }
}

/// Builds a frustum for a camera with camera-to-world transform `c2w`.
///
/// # Errors
///
/// Returns [`PosevisError::InvalidInput`] for a non-positive size or a zero
/// image dimension.
pub fn build_frustum(
    c2w: &DMat4,
    size: f64,
    intrinsics: Option<CameraIntrinsics>,
    color: Vec3,
) -> Result<Frustum> {
    Ok(Frustum::local(size, intrinsics, color)?.transformed(c2w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseRecord;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_topology() {
        let f = build_frustum(&DMat4::IDENTITY, 0.2, None, DEFAULT_FRUSTUM_COLOR).unwrap();
        assert_eq!(f.points.len(), 5);
        assert_eq!(f.edges.len(), 8);
        for [a, b] in f.edges {
            assert!(a < 5 && b < 5);
            assert_ne!(a, b);
        }
        // Every corner has one strut and two base neighbours.
        for corner in 1..5u32 {
            let degree = f
                .edges
                .iter()
                .filter(|e| e[0] == corner || e[1] == corner)
                .count();
            assert_eq!(degree, 3);
        }
    }

    #[test]
    fn test_square_without_intrinsics() {
        let f = Frustum::local(0.5, None, DEFAULT_FRUSTUM_COLOR).unwrap();
        assert_eq!(f.apex(), DVec3::ZERO);
        for c in f.corners() {
            assert!((c.x.abs() - 0.5).abs() < EPS);
            assert!((c.y.abs() - 0.5).abs() < EPS);
            assert!((c.z - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_aspect_scaling() {
        let cam = CameraIntrinsics::new(480, 854);
        let f = build_frustum(&DMat4::IDENTITY, 1.0, Some(cam), DEFAULT_FRUSTUM_COLOR).unwrap();
        let expected = 480.0 / 854.0;
        for c in f.corners() {
            assert!((c.y.abs() - expected).abs() < EPS);
            assert!((c.x.abs() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let err = build_frustum(&DMat4::IDENTITY, 0.0, None, DEFAULT_FRUSTUM_COLOR).unwrap_err();
        assert!(matches!(err, PosevisError::InvalidInput(_)));
        let err = build_frustum(&DMat4::IDENTITY, -1.0, None, DEFAULT_FRUSTUM_COLOR).unwrap_err();
        assert!(matches!(err, PosevisError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let cam = CameraIntrinsics::new(480, 0);
        let err = build_frustum(&DMat4::IDENTITY, 1.0, Some(cam), DEFAULT_FRUSTUM_COLOR).unwrap_err();
        assert!(matches!(err, PosevisError::InvalidInput(_)));
    }

    #[test]
    fn test_transform_places_apex_at_camera_center() {
        let pose = PoseRecord::new([1.0, 0.0, 0.0, 0.0], DVec3::new(1.0, 2.0, 3.0));
        let c2w = pose.camera_to_world().unwrap();
        let f = build_frustum(&c2w, 0.1, None, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(f.apex().abs_diff_eq(DVec3::new(-1.0, -2.0, -3.0), EPS));
        assert_eq!(f.color, Vec3::new(0.0, 1.0, 0.0));
        // Rigid transforms keep edge lengths.
        let local = Frustum::local(0.1, None, f.color).unwrap();
        for [a, b] in FRUSTUM_EDGES {
            let (a, b) = (a as usize, b as usize);
            let before = local.points[a].distance(local.points[b]);
            let after = f.points[a].distance(f.points[b]);
            assert!((before - after).abs() < EPS);
        }
    }

    #[test]
    fn test_into_line_set() {
        let f = Frustum::local(1.0, None, DEFAULT_FRUSTUM_COLOR).unwrap();
        let lines = LineSet::from(f);
        assert_eq!(lines.points.len(), 5);
        assert_eq!(lines.edges.len(), 8);
        assert_eq!(lines.colors, vec![DEFAULT_FRUSTUM_COLOR; 8]);
    }
}
