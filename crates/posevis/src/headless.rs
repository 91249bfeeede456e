//! A renderer that records the scene without opening a window.
//!
//! Useful for integration tests and for checking what a scene file would
//! display on machines without a GPU.

use posevis_core::{union_bounds, DVec3, Geometry, Renderer, Result, Viewpoint};

/// A geometry as it was handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGeometry {
    /// Name passed to [`Renderer::add_geometry`].
    pub name: String,
    /// The geometry itself.
    pub geometry: Geometry,
    /// Whether it contributes to the scene bounds.
    pub reset_bounding_box: bool,
}

/// Records geometries and the viewpoint; [`run`](Renderer::run) only logs.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    geometries: Vec<RecordedGeometry>,
    viewpoint: Option<Viewpoint>,
    bounds: Option<(DVec3, DVec3)>,
    runs: usize,
}

impl HeadlessRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometries in the order they were added.
    pub fn geometries(&self) -> &[RecordedGeometry] {
        &self.geometries
    }

    /// The first geometry added under `name`.
    pub fn geometry(&self, name: &str) -> Option<&Geometry> {
        self.geometries
            .iter()
            .find(|g| g.name == name)
            .map(|g| &g.geometry)
    }

    /// Number of recorded line sets.
    pub fn num_line_sets(&self) -> usize {
        self.geometries
            .iter()
            .filter(|g| matches!(g.geometry, Geometry::LineSet(_)))
            .count()
    }

    /// Number of recorded point clouds.
    pub fn num_point_clouds(&self) -> usize {
        self.geometries
            .iter()
            .filter(|g| matches!(g.geometry, Geometry::PointCloud(_)))
            .count()
    }

    /// The last viewpoint set.
    pub fn viewpoint(&self) -> Option<Viewpoint> {
        self.viewpoint
    }

    /// Union of the bounds of geometries added with `reset_bounding_box`.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        self.bounds
    }

    /// How many times [`run`](Renderer::run) was called.
    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl Renderer for HeadlessRenderer {
    fn add_geometry(
        &mut self,
        name: &str,
        geometry: Geometry,
        reset_bounding_box: bool,
    ) -> Result<()> {
        if reset_bounding_box {
            self.bounds = union_bounds(self.bounds, geometry.bounding_box());
        }
        log::debug!("recorded {} '{name}'", geometry.type_name());
        self.geometries.push(RecordedGeometry {
            name: name.to_owned(),
            geometry,
            reset_bounding_box,
        });
        Ok(())
    }

    fn set_viewpoint(&mut self, viewpoint: Viewpoint) -> Result<()> {
        self.viewpoint = Some(viewpoint);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.runs += 1;
        log::info!(
            "headless scene: {} point clouds, {} line sets",
            self.num_point_clouds(),
            self.num_line_sets()
        );
        if let Some((min, max)) = self.bounds {
            log::info!("scene bounds: {min} .. {max}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posevis_core::{coordinate_frame, PointCloud};

    #[test]
    fn test_records_in_order() {
        let mut renderer = HeadlessRenderer::new();
        let cloud = PointCloud::new(vec![DVec3::ZERO], vec![]).unwrap();
        renderer.add_geometry("a", cloud.into(), true).unwrap();
        renderer
            .add_geometry("b", coordinate_frame(1.0).into(), false)
            .unwrap();

        let names: Vec<_> = renderer.geometries().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(renderer.num_point_clouds(), 1);
        assert_eq!(renderer.num_line_sets(), 1);
        assert!(renderer.geometry("b").is_some());
        assert!(renderer.geometry("c").is_none());
    }

    #[test]
    fn test_bounds_skip_non_resetting_geometry() {
        let mut renderer = HeadlessRenderer::new();
        assert_eq!(renderer.bounds(), None);

        let cloud = PointCloud::new(vec![DVec3::ZERO, DVec3::ONE], vec![]).unwrap();
        renderer.add_geometry("cloud", cloud.into(), true).unwrap();
        renderer
            .add_geometry("frame", coordinate_frame(10.0).into(), false)
            .unwrap();
        assert_eq!(renderer.bounds(), Some((DVec3::ZERO, DVec3::ONE)));
    }

    #[test]
    fn test_run_and_viewpoint() {
        let mut renderer = HeadlessRenderer::new();
        assert_eq!(renderer.viewpoint(), None);
        renderer.set_viewpoint(Viewpoint::default()).unwrap();
        renderer.run().unwrap();
        assert_eq!(renderer.viewpoint(), Some(Viewpoint::default()));
        assert_eq!(renderer.runs(), 1);
    }
}
