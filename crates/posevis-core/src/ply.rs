//! PLY point cloud loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::{DVec3, Vec3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{PosevisError, Result};
use crate::geometry::PointCloud;

/// Loads the `vertex` element of a PLY file as a point cloud.
///
/// Reads `x`, `y`, `z` and, when all three are present, `red`, `green` and
/// `blue`. Integer colors are scaled from 0-255; float colors are taken as-is.
pub fn load_ply_point_cloud(path: impl AsRef<Path>) -> Result<PointCloud> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some("ply") {
        return Err(PosevisError::InvalidInput(format!(
            "point cloud path must end in .ply: {}",
            path.display()
        )));
    }

    let mut reader = BufReader::new(File::open(path)?);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| PosevisError::Ply(format!("{}: {e}", path.display())))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| PosevisError::Ply(format!("{}: no vertex element", path.display())))?;

    let mut points = Vec::with_capacity(vertices.len());
    let mut colors = Vec::with_capacity(vertices.len());
    for (i, vertex) in vertices.iter().enumerate() {
        let coord = |key: &str| {
            scalar(vertex, key)
                .ok_or_else(|| PosevisError::Ply(format!("vertex {i} has no numeric '{key}'")))
        };
        points.push(DVec3::new(coord("x")?, coord("y")?, coord("z")?));
        if let (Some(r), Some(g), Some(b)) = (
            color(vertex, "red"),
            color(vertex, "green"),
            color(vertex, "blue"),
        ) {
            colors.push(Vec3::new(r, g, b));
        }
    }

    if colors.len() != points.len() {
        colors.clear();
    }

    log::info!(
        "loaded {} points from {}{}",
        points.len(),
        path.display(),
        if colors.is_empty() { " (uncolored)" } else { "" }
    );
    PointCloud::new(points, colors)
}

fn scalar(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn color(element: &DefaultElement, key: &str) -> Option<f32> {
    match element.get(key)? {
        Property::UChar(v) => Some(f32::from(*v) / 255.0),
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        _ => scalar(element, key).map(|v| (v / 255.0) as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_PLY: &str = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 255 0 0
1 2 3 0 0 255
";

    #[test]
    fn test_load_ascii_ply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.ply");
        std::fs::write(&path, ASCII_PLY).unwrap();

        let pc = load_ply_point_cloud(&path).unwrap();
        assert_eq!(pc.len(), 2);
        assert_eq!(pc.points[1], DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(pc.colors[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(pc.colors[1], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_uncolored_ply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty double x\nproperty double y\nproperty double z\nend_header\n0.5 0.25 1\n",
        )
        .unwrap();

        let pc = load_ply_point_cloud(&path).unwrap();
        assert_eq!(pc.points, vec![DVec3::new(0.5, 0.25, 1.0)]);
        assert!(pc.colors.is_empty());
    }

    #[test]
    fn test_wrong_extension() {
        assert!(matches!(
            load_ply_point_cloud("cloud.pcd"),
            Err(PosevisError::InvalidInput(_))
        ));
    }
}
