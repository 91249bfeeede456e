//! posevis: a viewer for reconstructed camera poses and sparse point clouds.
//!
//! A scene written by the reconstruction pipeline holds one world-to-camera
//! pose per image plus the sparse points. posevis turns each pose into a
//! camera-to-world transform, draws a wireframe frustum at it and shows the
//! frustums together with the point cloud.
//!
//! # Quick Start
//!
//! ```no_run
//! use posevis::*;
//!
//! fn main() -> Result<()> {
//!     let mut config = ViewerConfig::new("model.json");
//!     config.num_display_poses = 100;
//!     config.show_mesh_frame = true;
//!
//!     let mut renderer = WindowRenderer::new();
//!     run(&config, &mut renderer)
//! }
//! ```
//!
//! # Scene contents
//!
//! - The point cloud, from the scene or from a `.ply` override
//! - An optional RGB coordinate frame at the origin
//! - A frustum per sampled pose, or for a single named frame
//! - An optional black guide line
//!
//! Every piece is handed to a [`Renderer`]. [`WindowRenderer`] opens a wgpu
//! window; [`HeadlessRenderer`] only records what it was given.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
mod headless;

pub use app::WindowRenderer;
pub use headless::{HeadlessRenderer, RecordedGeometry};

// Re-export core types
pub use posevis_core::{
    build_frustum, camera_to_world, coordinate_frame, guide_line, load_line_data,
    load_ply_point_cloud, quat_to_rotation_matrix, rng_from_seed, sample_indices, to_row_major,
    CameraIntrinsics, DMat3, DMat4, DVec3, Frustum, Geometry, LineSet, PipelineConfig,
    PipelineStage, PointCloud, PoseRecord, PosevisError, Renderer, Result, SceneModel, Vec3,
    ViewerConfig, Viewpoint, VocabTreeSize, COORDINATE_FRAME_SIZE, DEFAULT_FRUSTUM_COLOR,
    FRUSTUM_EDGES,
};

use rand::Rng;

/// Name under which the point cloud is added.
pub const POINT_CLOUD_NAME: &str = "point cloud";
/// Name under which the coordinate frame is added.
pub const MESH_FRAME_NAME: &str = "mesh frame";
/// Name under which the guide line is added.
pub const GUIDE_LINE_NAME: &str = "guide line";

/// Name under which the frustum of `image` is added.
pub fn frustum_name(image: &str) -> String {
    format!("frustum {image}")
}

/// What [`build_scene`] handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
    /// Number of points in the displayed cloud.
    pub num_points: usize,
    /// Images whose frustum was drawn, in the order they were added.
    pub frustum_images: Vec<String>,
    /// Whether the coordinate frame was added.
    pub mesh_frame: bool,
    /// Whether the guide line was added.
    pub guide_line: bool,
}

/// Adds the configured scene to `renderer` and sets the initial viewpoint.
///
/// Poses are sampled with `rng` unless a single frame is requested.
///
/// # Errors
///
/// - [`PosevisError::FrameNotFound`] if the requested frame is not in the scene
/// - [`PosevisError::Numerical`] if any pose cannot be inverted
/// - [`PosevisError::InvalidInput`] for a bad frustum size or point cloud path
/// - I/O, JSON and PLY errors from the optional inputs
pub fn build_scene<R: Rng + ?Sized>(
    config: &ViewerConfig,
    model: &SceneModel,
    rng: &mut R,
    renderer: &mut dyn Renderer,
) -> Result<SceneSummary> {
    config.validate()?;
    let mut summary = SceneSummary::default();

    let cloud = match &config.pcd_path {
        Some(path) => load_ply_point_cloud(path)?,
        None => model.points.clone(),
    };
    summary.num_points = cloud.len();
    renderer.add_geometry(POINT_CLOUD_NAME, cloud.into(), true)?;

    if config.show_mesh_frame {
        renderer.add_geometry(
            MESH_FRAME_NAME,
            coordinate_frame(COORDINATE_FRAME_SIZE).into(),
            true,
        )?;
        summary.mesh_frame = true;
    }

    let selected = match &config.specify_frame_name {
        Some(name) => vec![(name.as_str(), model.camera_to_world(name)?)],
        None => {
            let all = model.camera_to_world_all()?;
            let indices = sample_indices(rng, all.len(), config.num_display_poses);
            log::info!("displaying {} of {} poses", indices.len(), all.len());
            indices.into_iter().map(|i| all[i]).collect()
        }
    };

    for (image, c2w) in selected {
        let frustum = build_frustum(
            &c2w,
            config.frustum_size,
            Some(model.camera),
            config.frustum_color,
        )?;
        renderer.add_geometry(&frustum_name(image), LineSet::from(frustum).into(), true)?;
        summary.frustum_images.push(image.to_owned());
    }

    if let Some(path) = &config.line_data {
        renderer.add_geometry(GUIDE_LINE_NAME, load_line_data(path)?.into(), true)?;
        summary.guide_line = true;
    }

    renderer.set_viewpoint(config.viewpoint)?;
    Ok(summary)
}

/// Loads the scene named by `config`, assembles it and runs `renderer`.
pub fn run(config: &ViewerConfig, renderer: &mut dyn Renderer) -> Result<()> {
    let model = SceneModel::from_path(&config.json_data)?;
    let mut rng = rng_from_seed(config.seed);
    let summary = build_scene(config, &model, &mut rng, renderer)?;
    log::debug!(
        "scene has {} points and {} frustums",
        summary.num_points,
        summary.frustum_images.len()
    );
    renderer.run()
}
