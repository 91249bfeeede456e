//! Core types for posevis.
//!
//! This crate holds everything that does not touch a window or a GPU:
//! - [`PoseRecord`] and the quaternion/translation to camera-to-world math
//! - [`Frustum`] wireframes placed at a camera pose
//! - [`SceneModel`], the JSON scene written by the reconstruction pipeline
//! - [`Geometry`] and the [`Renderer`] trait backends implement
//! - [`ViewerConfig`] and [`PipelineConfig`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Config structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]

pub mod config;
pub mod error;
pub mod frustum;
pub mod geometry;
pub mod ply;
pub mod pose;
pub mod renderer;
pub mod sampling;
pub mod scene;

pub use config::{PipelineConfig, PipelineStage, ViewerConfig, VocabTreeSize, VocabTrees};
pub use error::{PosevisError, Result};
pub use frustum::{build_frustum, Frustum, DEFAULT_FRUSTUM_COLOR, FRUSTUM_EDGES};
pub use geometry::{
    coordinate_frame, guide_line, load_line_data, union_bounds, Geometry, LineSet, PointCloud,
    COORDINATE_FRAME_SIZE,
};
pub use ply::load_ply_point_cloud;
pub use pose::{camera_to_world, quat_to_rotation_matrix, to_row_major, PoseRecord};
pub use renderer::{Renderer, Viewpoint};
pub use sampling::{rng_from_seed, sample_indices};
pub use scene::{CameraIntrinsics, SceneModel};

// Re-export glam types for convenience
pub use glam::{DMat3, DMat4, DVec3, Vec3};
