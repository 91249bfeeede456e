//! Rendering backend for posevis.
//!
//! This crate provides the wgpu-based rendering engine:
//! - An orbit [`Camera`] framed from a [`Viewpoint`](posevis_core::Viewpoint)
//! - Line and point pipelines over a shared colored-vertex layout
//! - Flattening of [`Geometry`](posevis_core::Geometry) into GPU buffers

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod engine;
pub mod error;
pub mod scene_render;

pub use camera::Camera;
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use scene_render::{
    line_vertices, point_vertices, ColoredVertex, SceneRenderData, SceneVertices,
    DEFAULT_POINT_COLOR,
};
