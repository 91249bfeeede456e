//! Flattening geometry into GPU vertex streams.
//!
//! Line sets become a `LineList` stream (two vertices per edge) and point
//! clouds a `PointList` stream. Positions are narrowed to f32 here.

use glam::Vec3;
use posevis_core::{Geometry, LineSet, PointCloud};

use wgpu::util::DeviceExt;

/// Color used for points of an uncolored cloud.
pub const DEFAULT_POINT_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Vertex layout shared by the line and point pipelines.
/// Must match `VertexInput` in `scene.wgsl` (24 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl ColoredVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout for pipelines.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(position: glam::DVec3, color: Vec3) -> Self {
        Self {
            position: position.as_vec3().to_array(),
            color: color.to_array(),
        }
    }
}

/// Two vertices per edge, carrying the edge color.
#[must_use]
pub fn line_vertices(lines: &LineSet) -> Vec<ColoredVertex> {
    lines
        .edges
        .iter()
        .zip(&lines.colors)
        .flat_map(|([a, b], color)| {
            [
                ColoredVertex::new(lines.points[*a as usize], *color),
                ColoredVertex::new(lines.points[*b as usize], *color),
            ]
        })
        .collect()
}

/// One vertex per point.
#[must_use]
pub fn point_vertices(cloud: &PointCloud) -> Vec<ColoredVertex> {
    cloud
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| ColoredVertex::new(*p, cloud.color_or(i, DEFAULT_POINT_COLOR)))
        .collect()
}

/// CPU-side vertex streams for a whole scene.
#[derive(Debug, Clone, Default)]
pub struct SceneVertices {
    /// `LineList` vertices.
    pub lines: Vec<ColoredVertex>,
    /// `PointList` vertices.
    pub points: Vec<ColoredVertex>,
}

impl SceneVertices {
    /// Flattens every geometry into the two streams.
    #[must_use]
    pub fn from_geometries<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Self {
        let mut out = Self::default();
        for geometry in geometries {
            match geometry {
                Geometry::LineSet(lines) => out.lines.extend(line_vertices(lines)),
                Geometry::PointCloud(cloud) => out.points.extend(point_vertices(cloud)),
            }
        }
        out
    }
}

/// GPU resources for a scene.
pub struct SceneRenderData {
    /// Line vertex buffer, absent when there are no lines.
    pub line_buffer: Option<wgpu::Buffer>,
    /// Number of line vertices.
    pub num_line_vertices: u32,
    /// Point vertex buffer, absent when there are no points.
    pub point_buffer: Option<wgpu::Buffer>,
    /// Number of point vertices.
    pub num_point_vertices: u32,
}

impl SceneRenderData {
    /// Uploads the vertex streams.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(device: &wgpu::Device, vertices: &SceneVertices) -> Self {
        let upload = |data: &[ColoredVertex], label: &str| {
            (!data.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
        };
        Self {
            line_buffer: upload(&vertices.lines, "scene line vertices"),
            num_line_vertices: vertices.lines.len() as u32,
            point_buffer: upload(&vertices.points, "scene point vertices"),
            num_point_vertices: vertices.points.len() as u32,
        }
    }
}
