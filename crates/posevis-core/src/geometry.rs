//! Renderable geometry handed to a [`Renderer`](crate::Renderer).

use std::path::Path;

use glam::{DVec3, Vec3};

use crate::error::{PosevisError, Result};

/// Length of the axes drawn by [`coordinate_frame`].
pub const COORDINATE_FRAME_SIZE: f64 = 10.0;

/// Line segments over a shared set of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSet {
    /// Segment endpoints.
    pub points: Vec<DVec3>,
    /// Index pairs into `points`.
    pub edges: Vec<[u32; 2]>,
    /// One RGB color per edge, components in `[0, 1]`.
    pub colors: Vec<Vec3>,
}

impl LineSet {
    /// Creates a line set, checking indices and color count.
    pub fn new(points: Vec<DVec3>, edges: Vec<[u32; 2]>, colors: Vec<Vec3>) -> Result<Self> {
        if colors.len() != edges.len() {
            return Err(PosevisError::InvalidInput(format!(
                "line set has {} edges but {} colors",
                edges.len(),
                colors.len()
            )));
        }
        let n = points.len();
        if let Some(edge) = edges
            .iter()
            .find(|[a, b]| *a as usize >= n || *b as usize >= n)
        {
            return Err(PosevisError::InvalidInput(format!(
                "edge {edge:?} out of range for {n} points"
            )));
        }
        Ok(Self {
            points,
            edges,
            colors,
        })
    }

    /// Creates a line set where every edge has the same color.
    ///
    /// Indices are not validated; callers pass fixed topologies.
    #[must_use]
    pub fn with_uniform_color(points: Vec<DVec3>, edges: Vec<[u32; 2]>, color: Vec3) -> Self {
        let colors = vec![color; edges.len()];
        Self {
            points,
            edges,
            colors,
        }
    }

    /// Overwrites every edge color.
    pub fn paint_uniform_color(&mut self, color: Vec3) {
        self.colors.fill(color);
    }

    /// Number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Axis-aligned bounds of the points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        bounds(&self.points)
    }
}

/// A colored point cloud.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    /// Point positions.
    pub points: Vec<DVec3>,
    /// Per-point RGB colors in `[0, 1]`; may be empty for uncolored clouds.
    pub colors: Vec<Vec3>,
}

impl PointCloud {
    /// Creates a point cloud. `colors` must be empty or match `points`.
    pub fn new(points: Vec<DVec3>, colors: Vec<Vec3>) -> Result<Self> {
        if !colors.is_empty() && colors.len() != points.len() {
            return Err(PosevisError::InvalidInput(format!(
                "point cloud has {} points but {} colors",
                points.len(),
                colors.len()
            )));
        }
        Ok(Self { points, colors })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Color of point `i`, falling back to `default` for uncolored clouds.
    #[must_use]
    pub fn color_or(&self, i: usize, default: Vec3) -> Vec3 {
        self.colors.get(i).copied().unwrap_or(default)
    }

    /// Axis-aligned bounds of the points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        bounds(&self.points)
    }
}

/// Anything a renderer can display.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Colored points.
    PointCloud(PointCloud),
    /// Colored line segments.
    LineSet(LineSet),
}

impl Geometry {
    /// Short type name for logging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::PointCloud(_) => "PointCloud",
            Geometry::LineSet(_) => "LineSet",
        }
    }

    /// Axis-aligned bounds, or `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        match self {
            Geometry::PointCloud(pc) => pc.bounding_box(),
            Geometry::LineSet(ls) => ls.bounding_box(),
        }
    }
}

impl From<PointCloud> for Geometry {
    fn from(pc: PointCloud) -> Self {
        Geometry::PointCloud(pc)
    }
}

impl From<LineSet> for Geometry {
    fn from(ls: LineSet) -> Self {
        Geometry::LineSet(ls)
    }
}

/// Merges two optional bounding boxes.
#[must_use]
pub fn union_bounds(
    a: Option<(DVec3, DVec3)>,
    b: Option<(DVec3, DVec3)>,
) -> Option<(DVec3, DVec3)> {
    match (a, b) {
        (Some((amin, amax)), Some((bmin, bmax))) => Some((amin.min(bmin), amax.max(bmax))),
        (a, None) => a,
        (None, b) => b,
    }
}

fn bounds(points: &[DVec3]) -> Option<(DVec3, DVec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
    )
}

/// RGB axes of length `size` at the origin: X red, Y green, Z blue.
#[must_use]
pub fn coordinate_frame(size: f64) -> LineSet {
    LineSet {
        points: vec![
            DVec3::ZERO,
            DVec3::X * size,
            DVec3::Y * size,
            DVec3::Z * size,
        ],
        edges: vec![[0, 1], [0, 2], [0, 3]],
        colors: vec![Vec3::X, Vec3::Y, Vec3::Z],
    }
}

/// Extends the segment `p0 -> p1` to `c + 2d .. c - 2d` about its midpoint.
#[must_use]
pub fn guide_line(p0: DVec3, p1: DVec3) -> LineSet {
    let center = (p0 + p1) * 0.5;
    let dir = p1 - p0;
    LineSet::with_uniform_color(
        vec![center + 2.0 * dir, center - 2.0 * dir],
        vec![[0, 1]],
        Vec3::ZERO,
    )
}

/// Parses guide-line JSON: six numbers, as a flat list or two triples.
pub fn parse_line_data(json: &str) -> Result<(DVec3, DVec3)> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let mut flat = Vec::with_capacity(6);
    flatten_numbers(&value, &mut flat)?;
    if flat.len() != 6 {
        return Err(PosevisError::InvalidInput(format!(
            "line data must contain 6 numbers, got {}",
            flat.len()
        )));
    }
    Ok((
        DVec3::new(flat[0], flat[1], flat[2]),
        DVec3::new(flat[3], flat[4], flat[5]),
    ))
}

/// Reads a guide-line JSON file and builds the extended segment.
pub fn load_line_data(path: impl AsRef<Path>) -> Result<LineSet> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let (p0, p1) = parse_line_data(&json)?;
    log::debug!("loaded guide line from {}", path.display());
    Ok(guide_line(p0, p1))
}

fn flatten_numbers(value: &serde_json::Value, out: &mut Vec<f64>) -> Result<()> {
    match value {
        serde_json::Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| {
                PosevisError::InvalidInput(format!("line data value {n} is not representable"))
            })?;
            out.push(v);
            Ok(())
        }
        serde_json::Value::Array(items) => items.iter().try_for_each(|v| flatten_numbers(v, out)),
        other => Err(PosevisError::InvalidInput(format!(
            "line data must be numeric, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_set_rejects_bad_index() {
        let err = LineSet::new(vec![DVec3::ZERO], vec![[0, 1]], vec![Vec3::ONE]).unwrap_err();
        assert!(matches!(err, PosevisError::InvalidInput(_)));
    }

    #[test]
    fn test_line_set_rejects_color_mismatch() {
        let err = LineSet::new(vec![DVec3::ZERO, DVec3::X], vec![[0, 1]], vec![]).unwrap_err();
        assert!(matches!(err, PosevisError::InvalidInput(_)));
    }

    #[test]
    fn test_paint_uniform_color() {
        let mut ls = coordinate_frame(1.0);
        ls.paint_uniform_color(Vec3::ONE);
        assert!(ls.colors.iter().all(|c| *c == Vec3::ONE));
    }

    #[test]
    fn test_point_cloud_color_mismatch() {
        assert!(PointCloud::new(vec![DVec3::ZERO], vec![Vec3::ONE, Vec3::ONE]).is_err());
        assert!(PointCloud::new(vec![DVec3::ZERO], vec![]).is_ok());
    }

    #[test]
    fn test_bounding_box() {
        let pc = PointCloud::new(
            vec![DVec3::new(1.0, -2.0, 0.0), DVec3::new(-1.0, 3.0, 5.0)],
            vec![],
        )
        .unwrap();
        let (lo, hi) = pc.bounding_box().unwrap();
        assert_eq!(lo, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, DVec3::new(1.0, 3.0, 5.0));
        assert!(PointCloud::default().bounding_box().is_none());
    }

    #[test]
    fn test_union_bounds() {
        let a = Some((DVec3::ZERO, DVec3::ONE));
        let b = Some((DVec3::splat(-1.0), DVec3::splat(0.5)));
        assert_eq!(union_bounds(a, b), Some((DVec3::splat(-1.0), DVec3::ONE)));
        assert_eq!(union_bounds(a, None), a);
        assert_eq!(union_bounds(None, None), None);
    }

    #[test]
    fn test_coordinate_frame() {
        let frame = coordinate_frame(COORDINATE_FRAME_SIZE);
        assert_eq!(frame.num_edges(), 3);
        assert_eq!(frame.points[3], DVec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_guide_line() {
        let ls = guide_line(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(ls.points[0], DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(ls.points[1], DVec3::new(-3.0, 0.0, 0.0));
        assert_eq!(ls.edges, vec![[0, 1]]);
    }

    #[test]
    fn test_parse_line_data_shapes() {
        let nested = parse_line_data("[[0, 0, 0], [1, 2, 3]]").unwrap();
        let flat = parse_line_data("[0, 0, 0, 1, 2, 3]").unwrap();
        assert_eq!(nested, flat);
        assert_eq!(flat.1, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_line_data_errors() {
        assert!(matches!(
            parse_line_data("[1, 2, 3]"),
            Err(PosevisError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_line_data("[1, 2, 3, \"x\", 5, 6]"),
            Err(PosevisError::InvalidInput(_))
        ));
        assert!(matches!(parse_line_data("not json"), Err(PosevisError::Json(_))));
    }
}
