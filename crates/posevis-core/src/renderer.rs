//! The renderer interface.
//!
//! Scene assembly only talks to a [`Renderer`]; the windowed wgpu backend and
//! the headless recorder both live in the `posevis` crate.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Geometry;

/// Initial view: the camera looks at `lookat` from the `front` direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    /// Direction from the look-at point towards the eye.
    pub front: DVec3,
    /// Point the view is centered on.
    pub lookat: DVec3,
    /// Up direction of the view.
    pub up: DVec3,
    /// Distance multiplier; 1 fits the scene bounds, smaller is closer.
    pub zoom: f64,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            front: DVec3::ONE,
            lookat: DVec3::ZERO,
            up: DVec3::Z,
            zoom: 1.0,
        }
    }
}

/// A backend that can display geometry.
pub trait Renderer {
    /// Adds a named geometry to the scene.
    ///
    /// When `reset_bounding_box` is set the geometry contributes to the scene
    /// bounds used to frame the view.
    fn add_geometry(&mut self, name: &str, geometry: Geometry, reset_bounding_box: bool)
        -> Result<()>;

    /// Sets the initial viewpoint.
    fn set_viewpoint(&mut self, viewpoint: Viewpoint) -> Result<()>;

    /// Shows the scene, blocking until the viewer is closed.
    fn run(&mut self) -> Result<()>;
}
