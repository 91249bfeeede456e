//! Command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use posevis::{
    HeadlessRenderer, PipelineConfig, Renderer, Result, ViewerConfig, WindowRenderer,
};

#[derive(Debug, Parser)]
#[command(name = "posevis", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show camera poses and the point cloud stored in a scene JSON file
    View(ViewArgs),
    /// Print the pipeline configuration as JSON
    PipelineConfig(PipelineConfigArgs),
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Scene JSON with camera, images and points
    #[arg(long)]
    json_data: PathBuf,

    /// JSON file holding two 3D points for a guide line
    #[arg(long)]
    line_data: Option<PathBuf>,

    /// PLY point cloud to show instead of the scene's points
    #[arg(long)]
    pcd_path: Option<PathBuf>,

    /// Draw RGB axes at the origin
    #[arg(long)]
    show_mesh_frame: bool,

    /// Show only the frustum of this image
    #[arg(long)]
    specify_frame_name: Option<String>,

    /// Randomly display at most this many poses
    #[arg(long, default_value_t = 500)]
    num_display_poses: usize,

    /// Frustum half-width in world units
    #[arg(long, default_value_t = 0.1)]
    frustum_size: f64,

    /// Seed for pose sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Record the scene and log a summary instead of opening a window
    #[arg(long)]
    headless: bool,
}

impl ViewArgs {
    fn to_config(&self) -> ViewerConfig {
        let mut config = ViewerConfig::new(&self.json_data);
        config.line_data.clone_from(&self.line_data);
        config.pcd_path.clone_from(&self.pcd_path);
        config.show_mesh_frame = self.show_mesh_frame;
        config.specify_frame_name.clone_from(&self.specify_frame_name);
        config.num_display_poses = self.num_display_poses;
        config.frustum_size = self.frustum_size;
        config.seed = self.seed;
        config
    }
}

#[derive(Debug, Args)]
struct PipelineConfigArgs {
    /// JSON file overriding the default layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolve relative paths against this directory
    #[arg(long)]
    base: Option<PathBuf>,
}

fn view(args: &ViewArgs) -> Result<()> {
    let config = args.to_config();
    let mut renderer: Box<dyn Renderer> = if args.headless {
        Box::new(HeadlessRenderer::new())
    } else {
        Box::new(WindowRenderer::new())
    };
    posevis::run(&config, renderer.as_mut())
}

fn pipeline_config(args: &PipelineConfigArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(base) = &args.base {
        config = config.resolved(base);
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::View(args) => view(args),
        Command::PipelineConfig(args) => pipeline_config(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
