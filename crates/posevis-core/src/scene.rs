//! Scene model produced by the reconstruction pipeline.
//!
//! The JSON layout is:
//!
//! ```json
//! {
//!   "camera": { "height": 480, "width": 854 },
//!   "images": { "frame_0001.jpg": [qw, qx, qy, qz, tx, ty, tz], ... },
//!   "points": [[x, y, z, r, g, b], ...]
//! }
//! ```
//!
//! Poses are world-to-camera; colors are 0-255.

use std::collections::BTreeMap;
use std::path::Path;

use glam::{DMat4, DVec3, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PosevisError, Result};
use crate::geometry::PointCloud;
use crate::pose::PoseRecord;

/// Image size shared by every camera in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
}

impl CameraIntrinsics {
    /// Creates intrinsics from a pixel height and width.
    #[must_use]
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Height divided by width.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }
}

#[derive(Deserialize)]
struct RawScene {
    camera: CameraIntrinsics,
    images: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    points: Option<Vec<Vec<Value>>>,
}

/// A loaded scene: intrinsics, named poses and the sparse point cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneModel {
    /// Camera image size.
    pub camera: CameraIntrinsics,
    /// World-to-camera poses keyed by image name, in name order.
    pub images: BTreeMap<String, PoseRecord>,
    /// Sparse reconstruction points.
    pub points: PointCloud,
}

impl SceneModel {
    /// Parses a scene from JSON text.
    ///
    /// # Errors
    ///
    /// [`PosevisError::Json`] for malformed JSON or a missing `camera`/`images`
    /// entry, [`PosevisError::InvalidInput`] for malformed pose records or
    /// points.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawScene = serde_json::from_str(json)?;

        let images = raw
            .images
            .into_iter()
            .map(|(name, values)| {
                let pose = numbers(&values)
                    .and_then(|v| PoseRecord::from_slice(&v))
                    .map_err(|e| PosevisError::InvalidInput(format!("image '{name}': {e}")))?;
                Ok((name, pose))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let raw_points = raw.points.unwrap_or_default();
        let mut positions = Vec::with_capacity(raw_points.len());
        let mut colors = Vec::with_capacity(raw_points.len());
        for (i, row) in raw_points.iter().enumerate() {
            let v = numbers(row)?;
            if v.len() < 6 {
                return Err(PosevisError::InvalidInput(format!(
                    "point {i} must have 6 values [x, y, z, r, g, b], got {}",
                    v.len()
                )));
            }
            positions.push(DVec3::new(v[0], v[1], v[2]));
            colors.push(Vec3::new(v[3] as f32, v[4] as f32, v[5] as f32) / 255.0);
        }

        Ok(Self {
            camera: raw.camera,
            images,
            points: PointCloud::new(positions, colors)?,
        })
    }

    /// Reads and parses a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&json)?;
        log::info!(
            "loaded scene {}: {} images, {} points, camera {}x{}",
            path.display(),
            model.images.len(),
            model.points.len(),
            model.camera.width,
            model.camera.height
        );
        Ok(model)
    }

    /// Number of posed images.
    #[must_use]
    pub fn num_images(&self) -> usize {
        self.images.len()
    }

    /// Looks up a pose by image name.
    pub fn pose(&self, name: &str) -> Result<&PoseRecord> {
        self.images
            .get(name)
            .ok_or_else(|| PosevisError::FrameNotFound(name.to_string()))
    }

    /// Camera-to-world transform of one image.
    pub fn camera_to_world(&self, name: &str) -> Result<DMat4> {
        self.pose(name)?.camera_to_world()
    }

    /// Camera-to-world transforms of every image, in name order.
    pub fn camera_to_world_all(&self) -> Result<Vec<(&str, DMat4)>> {
        self.images
            .iter()
            .map(|(name, pose)| Ok((name.as_str(), pose.camera_to_world()?)))
            .collect()
    }
}

fn numbers(values: &[Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| PosevisError::InvalidInput(format!("expected a number, got {v}")))
        })
        .collect()
}
