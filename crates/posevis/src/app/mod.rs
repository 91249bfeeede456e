//! Application window and event loop management.

mod input;
mod render;

pub(super) use std::sync::Arc;

pub(super) use pollster::FutureExt;
pub(super) use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub(super) use posevis_core::{
    union_bounds, DVec3, Geometry, PosevisError, Renderer, Result, Vec3, Viewpoint,
};
pub(super) use posevis_render::{RenderEngine, RenderError, SceneVertices};

/// Background color of the viewer window.
const DEFAULT_BACKGROUND: Vec3 = Vec3::ONE;

/// Window state for a single viewer run.
pub(super) struct App {
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    pub(super) title: String,
    pub(super) close_requested: bool,
    pub(super) background_color: Vec3,
    pub(super) vertices: SceneVertices,
    pub(super) viewpoint: Viewpoint,
    pub(super) bounds: Option<(DVec3, DVec3)>,
    // Mouse state for camera control
    pub(super) mouse_pos: (f64, f64),
    pub(super) left_mouse_down: bool,
    pub(super) right_mouse_down: bool,
    pub(super) shift_down: bool,
    // First fatal error; the event loop exits once it is set
    pub(super) error: Option<PosevisError>,
}

impl App {
    fn new(renderer: &WindowRenderer) -> Self {
        Self {
            window: None,
            engine: None,
            title: renderer.title.clone(),
            close_requested: false,
            background_color: renderer.background_color,
            vertices: SceneVertices::from_geometries(&renderer.geometries),
            viewpoint: renderer.viewpoint,
            bounds: renderer.bounds,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
            right_mouse_down: false,
            shift_down: false,
            error: None,
        }
    }

    /// Records a fatal error and asks the event loop to stop.
    pub(super) fn fail(&mut self, error: PosevisError) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.close_requested = true;
    }

    /// Frames the engine camera from the viewpoint and scene bounds.
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn apply_viewpoint(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let vp = self.viewpoint;
        engine.camera.set_viewpoint(
            vp.front.as_vec3(),
            vp.lookat.as_vec3(),
            vp.up.as_vec3(),
            vp.zoom as f32,
            self.bounds.map(|(min, max)| (min.as_vec3(), max.as_vec3())),
        );
    }
}

/// A [`Renderer`] that shows the scene in a wgpu window.
///
/// Geometry is collected until [`run`](Renderer::run), which opens the window
/// and blocks until it is closed. Left drag orbits, right drag or shift+left
/// drag pans, the wheel zooms and Escape closes the window.
pub struct WindowRenderer {
    title: String,
    background_color: Vec3,
    geometries: Vec<Geometry>,
    viewpoint: Viewpoint,
    bounds: Option<(DVec3, DVec3)>,
}

impl WindowRenderer {
    /// Creates a renderer with a white background.
    pub fn new() -> Self {
        Self {
            title: "posevis".to_owned(),
            background_color: DEFAULT_BACKGROUND,
            geometries: Vec::new(),
            viewpoint: Viewpoint::default(),
            bounds: None,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn with_background(mut self, color: Vec3) -> Self {
        self.background_color = color;
        self
    }

    /// Number of geometries added so far.
    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }
}

impl Default for WindowRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for WindowRenderer {
    fn add_geometry(
        &mut self,
        name: &str,
        geometry: Geometry,
        reset_bounding_box: bool,
    ) -> Result<()> {
        if reset_bounding_box {
            self.bounds = union_bounds(self.bounds, geometry.bounding_box());
        }
        log::debug!("added {} '{name}'", geometry.type_name());
        self.geometries.push(geometry);
        Ok(())
    }

    fn set_viewpoint(&mut self, viewpoint: Viewpoint) -> Result<()> {
        self.viewpoint = viewpoint;
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| PosevisError::Render(format!("failed to create event loop: {e}")))?;
        let mut app = App::new(self);
        log::info!(
            "showing {} geometries ({} line vertices, {} points)",
            self.geometries.len(),
            app.vertices.lines.len(),
            app.vertices.points.len()
        );
        event_loop
            .run_app(&mut app)
            .map_err(|e| PosevisError::Render(format!("event loop error: {e}")))?;
        app.error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posevis_core::{coordinate_frame, PointCloud};

    #[test]
    fn test_collects_geometry_and_bounds() {
        let mut renderer = WindowRenderer::new().with_title("test");
        let cloud = PointCloud::new(vec![DVec3::splat(-1.0), DVec3::ONE], vec![]).unwrap();
        renderer.add_geometry("cloud", cloud.into(), true).unwrap();
        renderer
            .add_geometry("frame", coordinate_frame(10.0).into(), false)
            .unwrap();

        assert_eq!(renderer.num_geometries(), 2);
        assert_eq!(renderer.bounds, Some((DVec3::splat(-1.0), DVec3::ONE)));
        assert_eq!(renderer.title, "test");
    }

    #[test]
    fn test_app_flattens_geometry() {
        let mut renderer = WindowRenderer::new().with_background(Vec3::ZERO);
        renderer
            .add_geometry("frame", coordinate_frame(1.0).into(), true)
            .unwrap();
        let app = App::new(&renderer);
        assert_eq!(app.vertices.lines.len(), 6);
        assert!(app.vertices.points.is_empty());
        assert_eq!(app.background_color, Vec3::ZERO);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_fail_keeps_first_error() {
        let renderer = WindowRenderer::new();
        let mut app = App::new(&renderer);
        app.fail(PosevisError::Render("first".into()));
        app.fail(PosevisError::Render("second".into()));
        assert!(app.close_requested);
        assert!(matches!(app.error, Some(PosevisError::Render(ref m)) if m == "first"));
    }
}
