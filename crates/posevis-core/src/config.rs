//! Configuration.
//!
//! [`ViewerConfig`] drives a single viewer run. [`PipelineConfig`] describes
//! the on-disk layout and stage names of the reconstruction pipeline that
//! produced the scene; its defaults are the layout the pipeline scripts use.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PosevisError, Result};
use crate::frustum::DEFAULT_FRUSTUM_COLOR;
use crate::renderer::Viewpoint;
use crate::scene::CameraIntrinsics;

/// Settings for one viewer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Scene model JSON.
    pub json_data: PathBuf,
    /// Optional guide line JSON (two 3D points).
    pub line_data: Option<PathBuf>,
    /// Optional PLY point cloud replacing the scene's points.
    pub pcd_path: Option<PathBuf>,
    /// Draw RGB axes at the origin.
    pub show_mesh_frame: bool,
    /// Draw only this frame instead of a random sample.
    pub specify_frame_name: Option<String>,
    /// Maximum number of frustums to draw.
    pub num_display_poses: usize,
    /// Frustum half-width in world units.
    pub frustum_size: f64,
    /// Frustum line color.
    pub frustum_color: Vec3,
    /// Seed for pose sampling; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Initial view.
    pub viewpoint: Viewpoint,
}

impl ViewerConfig {
    /// Creates a configuration with default settings for `json_data`.
    pub fn new(json_data: impl Into<PathBuf>) -> Self {
        Self {
            json_data: json_data.into(),
            line_data: None,
            pcd_path: None,
            show_mesh_frame: false,
            specify_frame_name: None,
            num_display_poses: 500,
            frustum_size: 0.1,
            frustum_color: DEFAULT_FRUSTUM_COLOR,
            seed: None,
            viewpoint: Viewpoint::default(),
        }
    }

    /// Checks values that would otherwise fail late.
    pub fn validate(&self) -> Result<()> {
        if !self.frustum_size.is_finite() || self.frustum_size <= 0.0 {
            return Err(PosevisError::InvalidInput(format!(
                "frustum size must be positive, got {}",
                self.frustum_size
            )));
        }
        if let Some(pcd) = &self.pcd_path {
            if pcd.extension().and_then(|e| e.to_str()) != Some("ply") {
                return Err(PosevisError::InvalidInput(format!(
                    "point cloud path must end in .ply: {}",
                    pcd.display()
                )));
            }
        }
        Ok(())
    }
}

/// Reconstruction pipeline stages, named as the mapper expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Image import.
    ImageReader,
    /// SIFT feature extraction.
    SiftExtraction,
    /// Exhaustive SIFT matching.
    SiftMatching,
    /// Vocabulary-tree matching.
    VocabTreeMatching,
    /// Incremental mapping.
    Mapper,
}

impl PipelineStage {
    /// All stages in pipeline order.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::ImageReader,
        PipelineStage::SiftExtraction,
        PipelineStage::SiftMatching,
        PipelineStage::VocabTreeMatching,
        PipelineStage::Mapper,
    ];

    /// The stage name string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::ImageReader => "ImageReader",
            PipelineStage::SiftExtraction => "SiftExtraction",
            PipelineStage::SiftMatching => "SiftMatching",
            PipelineStage::VocabTreeMatching => "VocabTreeMatching",
            PipelineStage::Mapper => "Mapper",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = PosevisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| PosevisError::InvalidInput(format!("unknown pipeline stage '{s}'")))
    }
}

/// Vocabulary tree sizes available for vocab-tree matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VocabTreeSize {
    /// 32K visual words.
    #[default]
    Words32K,
    /// 256K visual words.
    Words256K,
    /// 1M visual words.
    Words1M,
}

/// Vocabulary tree binaries by size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabTrees {
    /// 32K-word tree.
    pub words_32k: PathBuf,
    /// 256K-word tree.
    pub words_256k: PathBuf,
    /// 1M-word tree.
    pub words_1m: PathBuf,
}

impl Default for VocabTrees {
    fn default() -> Self {
        let root = Path::new("./vocab_bins");
        Self {
            words_32k: root.join("vocab_tree_flickr100K_words32K.bin"),
            words_256k: root.join("vocab_tree_flickr100K_words256K.bin"),
            words_1m: root.join("vocab_tree_flickr100K_words1M.bin"),
        }
    }
}

/// On-disk layout of a reconstruction project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of all projects.
    pub project_root: PathBuf,
    /// Base projects shared between runs.
    pub project_bases: PathBuf,
    /// Root of the image data.
    pub data_root: PathBuf,
    /// Full resolution frames.
    pub image_root: PathBuf,
    /// Medium resolution frames.
    pub image_medium_root: PathBuf,
    /// Colored segmentation masks.
    pub mask_root: PathBuf,
    /// Binary masks at full resolution.
    pub binary_mask_root: PathBuf,
    /// Binary masks at medium resolution.
    pub binary_mask_medium_root: PathBuf,
    /// Size of frames under `image_root`.
    pub image_size: CameraIntrinsics,
    /// Size of frames under `image_medium_root`.
    pub image_medium_size: CameraIntrinsics,
    /// Vocabulary tree binaries.
    pub vocab_trees: VocabTrees,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let project_root = PathBuf::from("./projects");
        let data_root = PathBuf::from("./visor_data");
        Self {
            project_bases: project_root.join("bases"),
            project_root,
            image_root: data_root.join("sparse_images"),
            image_medium_root: data_root.join("sparse_images_medium"),
            mask_root: data_root.join("sparse_masks"),
            binary_mask_root: data_root.join("sparse_binary_masks"),
            binary_mask_medium_root: data_root.join("sparse_binary_masks_medium"),
            data_root,
            image_size: CameraIntrinsics::new(1080, 1920),
            image_medium_size: CameraIntrinsics::new(480, 854),
            vocab_trees: VocabTrees::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from JSON; missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        log::debug!("loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Path of the vocabulary tree binary for `size`.
    #[must_use]
    pub fn vocab_tree(&self, size: VocabTreeSize) -> &Path {
        match size {
            VocabTreeSize::Words32K => &self.vocab_trees.words_32k,
            VocabTreeSize::Words256K => &self.vocab_trees.words_256k,
            VocabTreeSize::Words1M => &self.vocab_trees.words_1m,
        }
    }

    /// Returns a copy with every relative path joined onto `base`.
    #[must_use]
    pub fn resolved(&self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        Self {
            project_root: join(&self.project_root),
            project_bases: join(&self.project_bases),
            data_root: join(&self.data_root),
            image_root: join(&self.image_root),
            image_medium_root: join(&self.image_medium_root),
            mask_root: join(&self.mask_root),
            binary_mask_root: join(&self.binary_mask_root),
            binary_mask_medium_root: join(&self.binary_mask_medium_root),
            image_size: self.image_size,
            image_medium_size: self.image_medium_size,
            vocab_trees: VocabTrees {
                words_32k: join(&self.vocab_trees.words_32k),
                words_256k: join(&self.vocab_trees.words_256k),
                words_1m: join(&self.vocab_trees.words_1m),
            },
        }
    }
}
