//! Scene assembly tests driven through the headless renderer.

use std::path::{Path, PathBuf};

use posevis::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f64 = 1e-9;

/// Writes a scene with `n` cameras translated along x, plus two points.
fn write_scene(dir: &Path, n: usize) -> PathBuf {
    let images: Vec<String> = (0..n)
        .map(|i| format!(r#""frame_{i:04}.jpg": [1, 0, 0, 0, {i}, 0, 0]"#))
        .collect();
    let json = format!(
        r#"{{
            "camera": {{ "height": 480, "width": 854 }},
            "images": {{ {} }},
            "points": [[0, 0, 0, 255, 0, 0], [1, 2, 3, 0, 255, 51]]
        }}"#,
        images.join(", ")
    );
    let path = dir.join("model.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn build(config: &ViewerConfig, seed: u64) -> (HeadlessRenderer, Result<SceneSummary>) {
    let model = SceneModel::from_path(&config.json_data).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut renderer = HeadlessRenderer::new();
    let summary = build_scene(config, &model, &mut rng, &mut renderer);
    (renderer, summary)
}

#[test]
fn test_samples_at_most_num_display_poses() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ViewerConfig::new(write_scene(dir.path(), 20));
    config.num_display_poses = 5;

    let (renderer, summary) = build(&config, 7);
    let summary = summary.unwrap();

    assert_eq!(summary.frustum_images.len(), 5);
    assert_eq!(renderer.num_point_clouds(), 1);
    assert_eq!(renderer.num_line_sets(), 5);

    let mut unique = summary.frustum_images.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

#[test]
fn test_all_poses_when_fewer_than_limit() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::new(write_scene(dir.path(), 3));

    let (renderer, summary) = build(&config, 1);
    assert_eq!(summary.unwrap().frustum_images.len(), 3);
    assert_eq!(renderer.num_line_sets(), 3);
}

#[test]
fn test_sampling_is_reproducible_under_seed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ViewerConfig::new(write_scene(dir.path(), 50));
    config.num_display_poses = 10;

    let (_, a) = build(&config, 42);
    let (_, b) = build(&config, 42);
    assert_eq!(a.unwrap().frustum_images, b.unwrap().frustum_images);
}

#[test]
fn test_frustum_geometry_at_camera_center() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ViewerConfig::new(write_scene(dir.path(), 4));
    config.specify_frame_name = Some("frame_0003.jpg".to_owned());
    config.frustum_size = 0.5;

    let (renderer, summary) = build(&config, 0);
    assert_eq!(summary.unwrap().frustum_images, ["frame_0003.jpg"]);

    let Some(Geometry::LineSet(lines)) = renderer.geometry(&frustum_name("frame_0003.jpg")) else {
        panic!("frustum not recorded");
    };
    assert_eq!(lines.points.len(), 5);
    assert_eq!(lines.edges, FRUSTUM_EDGES.to_vec());
    // Identity rotation with t = (3, 0, 0) puts the camera center at (-3, 0, 0).
    assert!(lines.points[0].abs_diff_eq(DVec3::new(-3.0, 0.0, 0.0), EPS));
    let hei = 0.5 * 480.0 / 854.0;
    assert!(lines.points[1].abs_diff_eq(DVec3::new(-2.5, hei, 0.5), EPS));
    assert!(lines.colors.iter().all(|c| *c == DEFAULT_FRUSTUM_COLOR));
}

#[test]
fn test_unknown_frame_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ViewerConfig::new(write_scene(dir.path(), 2));
    config.specify_frame_name = Some("missing.jpg".to_owned());

    let (_, summary) = build(&config, 0);
    assert!(matches!(summary, Err(PosevisError::FrameNotFound(name)) if name == "missing.jpg"));
}

#[test]
fn test_scene_point_colors() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::new(write_scene(dir.path(), 1));

    let (renderer, summary) = build(&config, 0);
    assert_eq!(summary.unwrap().num_points, 2);
    let Some(Geometry::PointCloud(cloud)) = renderer.geometry(POINT_CLOUD_NAME) else {
        panic!("point cloud not recorded");
    };
    assert_eq!(cloud.points[1], DVec3::new(1.0, 2.0, 3.0));
    assert!((cloud.colors[1] - Vec3::new(0.0, 1.0, 0.2)).abs().max_element() < 1e-6);
}

#[test]
fn test_ply_override() {
    let dir = tempfile::tempdir().unwrap();
    let ply = dir.path().join("cloud.ply");
    std::fs::write(
        &ply,
        "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n1 0 0\n0 1 0\n",
    )
    .unwrap();

    let mut config = ViewerConfig::new(write_scene(dir.path(), 1));
    config.pcd_path = Some(ply);

    let (renderer, summary) = build(&config, 0);
    assert_eq!(summary.unwrap().num_points, 3);
    let Some(Geometry::PointCloud(cloud)) = renderer.geometry(POINT_CLOUD_NAME) else {
        panic!("point cloud not recorded");
    };
    assert_eq!(cloud.points[1], DVec3::X);
}

#[test]
fn test_ply_override_requires_ply_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ViewerConfig::new(write_scene(dir.path(), 1));
    config.pcd_path = Some(dir.path().join("cloud.pcd"));

    let (renderer, summary) = build(&config, 0);
    assert!(matches!(summary, Err(PosevisError::InvalidInput(_))));
    assert!(renderer.geometries().is_empty());
}

#[test]
fn test_guide_line_and_mesh_frame() {
    let dir = tempfile::tempdir().unwrap();
    let line = dir.path().join("line.json");
    std::fs::write(&line, "[[0, 0, 0], [1, 0, 0]]").unwrap();

    let mut config = ViewerConfig::new(write_scene(dir.path(), 1));
    config.line_data = Some(line);
    config.show_mesh_frame = true;

    let (renderer, summary) = build(&config, 0);
    let summary = summary.unwrap();
    assert!(summary.guide_line);
    assert!(summary.mesh_frame);

    let Some(Geometry::LineSet(guide)) = renderer.geometry(GUIDE_LINE_NAME) else {
        panic!("guide line not recorded");
    };
    assert_eq!(guide.points, [DVec3::new(2.5, 0.0, 0.0), DVec3::new(-1.5, 0.0, 0.0)]);
    assert_eq!(guide.colors, [Vec3::ZERO]);

    let Some(Geometry::LineSet(frame)) = renderer.geometry(MESH_FRAME_NAME) else {
        panic!("mesh frame not recorded");
    };
    assert_eq!(frame.points[1], DVec3::X * COORDINATE_FRAME_SIZE);

    let (min, max) = renderer.bounds().unwrap();
    assert!(min.x <= -1.5 && max.x >= COORDINATE_FRAME_SIZE);
}

#[test]
fn test_default_viewpoint_and_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::new(write_scene(dir.path(), 2));

    let mut renderer = HeadlessRenderer::new();
    run(&config, &mut renderer).unwrap();

    let vp = renderer.viewpoint().unwrap();
    assert_eq!(vp.front, DVec3::ONE);
    assert_eq!(vp.lookat, DVec3::ZERO);
    assert_eq!(vp.up, DVec3::Z);
    assert!((vp.zoom - 1.0).abs() < EPS);
    assert_eq!(renderer.runs(), 1);
}

#[test]
fn test_missing_scene_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::new(dir.path().join("absent.json"));
    let mut renderer = HeadlessRenderer::new();
    assert!(matches!(
        run(&config, &mut renderer),
        Err(PosevisError::Io(_))
    ));
    assert_eq!(renderer.runs(), 0);
}
