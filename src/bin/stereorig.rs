use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::DVec3;

use stereorig::{
    AnimationJob, CamMode, CameraRig, Fps, Frame, FrameIndex, FrameWindow, RaytracerJob,
    Resolution, SnapshotNaming, SystemRunner, interpolate, load_waypoints, pipeline,
};

#[derive(Parser, Debug)]
#[command(name = "stereorig", version)]
struct Cli {
    /// Only report errors.
    #[arg(long, global = true)]
    silent: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the full render -> merge -> encode pipeline.
    Render(RenderArgs),
    /// Print the interpolated frame plan without invoking anything.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Waypoint file (whitespace-delimited records).
    #[arg(long, required_unless_present = "skip_render")]
    waypoints: Option<PathBuf>,

    /// Scene loader switch understood by the raytracer (e.g. `nff`).
    #[arg(long, required_unless_present = "skip_render")]
    model_type: Option<String>,

    /// Scene file handed to the raytracer.
    #[arg(long, required_unless_present = "skip_render")]
    model_path: Option<PathBuf>,

    /// Directory for snapshots and merged frames.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Raytracer executable (default: `$RAYTRACER_HOME/raytracer`, then PATH).
    #[arg(long)]
    raytracer: Option<PathBuf>,

    /// Right-eye offset direction and camera right vector.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [1.0, 0.0, 0.0])]
    cam_right: Vec<f64>,

    /// Camera up vector.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [0.0, 1.0, 0.0])]
    cam_up: Vec<f64>,

    /// Camera forward vector.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [0.0, 0.0, 1.0])]
    cam_fwd: Vec<f64>,

    /// Light definition (8 values), repeatable.
    #[arg(long, num_args = 8, action = clap::ArgAction::Append, allow_negative_numbers = true)]
    light: Vec<f64>,

    /// Render and video rate; overridden by --fps-render / --fps-video.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Interpolation rate, frames per second of path time.
    #[arg(long)]
    fps_render: Option<f64>,

    /// Keyframe interval hint for the video muxer.
    #[arg(long)]
    fps_video: Option<f64>,

    /// Horizontal render resolution.
    #[arg(long, default_value_t = 320)]
    x_res: u32,

    /// Vertical render resolution.
    #[arg(long, default_value_t = 240)]
    y_res: u32,

    /// Supersampling factors, forwarded as `-anti_alias X Y`.
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    anti_alias: Option<Vec<u32>>,

    /// JPEG quality for snapshots.
    #[arg(long, default_value_t = 100)]
    jpeg_quality: u32,

    /// First frame to render (earlier frames are counted but skipped).
    #[arg(long, default_value_t = 0)]
    start_at: u64,

    /// Stop before this frame (exclusive); omitted means unbounded.
    #[arg(long)]
    end_at: Option<u64>,

    /// Which eyes to render and composite.
    #[arg(long, value_enum, default_value_t = CamModeArg::Both)]
    cam_mode: CamModeArg,

    /// Left-eye snapshot template (`%d` is the frame index).
    #[arg(long)]
    left_cam: Option<String>,

    /// Right-eye snapshot template (`%d` is the frame index).
    #[arg(long)]
    right_cam: Option<String>,

    /// Output video file.
    #[arg(long, default_value = "output.avi")]
    out_vid_name: PathBuf,

    /// Fail instead of overwriting an existing output video.
    #[arg(long)]
    no_overwrite: bool,

    /// Reuse snapshots already on disk instead of rendering.
    #[arg(long)]
    skip_render: bool,

    /// Keep existing merged frames instead of re-running `convert`.
    #[arg(long)]
    dont_merge: bool,

    /// Delete per-eye snapshots once merged.
    #[arg(long)]
    remove_pics_after_merge: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Waypoint file (whitespace-delimited records).
    #[arg(long)]
    waypoints: PathBuf,

    /// Interpolation rate, frames per second of path time.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Right-eye offset direction.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [1.0, 0.0, 0.0])]
    cam_right: Vec<f64>,

    /// First frame to emit.
    #[arg(long, default_value_t = 0)]
    start_at: u64,

    /// Stop before this frame (exclusive); omitted means unbounded.
    #[arg(long)]
    end_at: Option<u64>,

    /// Emit the plan as a JSON array instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CamModeArg {
    Left,
    Right,
    Both,
}

impl From<CamModeArg> for CamMode {
    fn from(arg: CamModeArg) -> Self {
        match arg {
            CamModeArg::Left => Self::Left,
            CamModeArg::Right => Self::Right,
            CamModeArg::Both => Self::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.silent);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(silent: bool) {
    let filter = if silent {
        tracing_subscriber::EnvFilter::new("error")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn vec3(v: &[f64]) -> DVec3 {
    DVec3::new(v[0], v[1], v[2])
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cam_mode = CamMode::from(args.cam_mode);

    let records = if args.skip_render {
        Vec::new()
    } else {
        let path = args
            .waypoints
            .as_ref()
            .context("--waypoints is required unless --skip-render is set")?;
        load_waypoints(path)?
    };

    let mut naming = match cam_mode {
        CamMode::Both => SnapshotNaming::stereo(&args.output_dir),
        CamMode::Left | CamMode::Right => SnapshotNaming::mono(&args.output_dir),
    };
    if let Some(template) = args.left_cam {
        naming.left_template = template;
    }
    if let Some(template) = args.right_cam {
        naming.right_template = template;
    }

    let raytracer = RaytracerJob {
        program: RaytracerJob::locate_program(args.raytracer),
        model_type: args.model_type.unwrap_or_default(),
        model_path: args.model_path.unwrap_or_default(),
        rig: CameraRig {
            right: vec3(&args.cam_right),
            up: vec3(&args.cam_up),
            forward: vec3(&args.cam_fwd),
        },
        resolution: Resolution::new(args.x_res, args.y_res)?,
        lights: args
            .light
            .chunks_exact(8)
            .map(|c| {
                let mut light = [0.0; 8];
                light.copy_from_slice(c);
                light
            })
            .collect(),
        anti_alias: args.anti_alias.map(|aa| (aa[0], aa[1])),
        jpeg_quality: args.jpeg_quality,
    };

    let job = AnimationJob {
        records,
        fps_render: Fps::new(args.fps_render.unwrap_or(args.fps))?,
        fps_video: Fps::new(args.fps_video.unwrap_or(args.fps))?,
        window: FrameWindow::new(FrameIndex(args.start_at), args.end_at.map(FrameIndex))?,
        cam_mode,
        raytracer,
        naming,
        out_video: args.out_vid_name,
        overwrite_video: !args.no_overwrite,
        skip_render: args.skip_render,
        remerge: !args.dont_merge,
        remove_after_merge: args.remove_pics_after_merge,
    };

    let mut runner = SystemRunner;
    let stats = pipeline::run(&job, &mut runner)?;
    eprintln!(
        "rendered {} stereo frames ({} snapshots), merged {}",
        stats.frames_rendered, stats.snapshots_rendered, stats.frames_merged
    );
    eprintln!("wrote {}", job.out_video.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let records = load_waypoints(&args.waypoints)?;
    let window = FrameWindow::new(FrameIndex(args.start_at), args.end_at.map(FrameIndex))?;
    let frames = interpolate(
        &records,
        Fps::new(args.fps)?,
        vec3(&args.cam_right),
        window,
    )?;

    if args.json {
        let all: Vec<Frame> = frames.collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    for f in frames {
        println!(
            "{:>6}  left {:+.6} {:+.6} {:+.6}  right {:+.6} {:+.6} {:+.6}  angle {:+.4}",
            f.index.0, f.left.x, f.left.y, f.left.z, f.right.x, f.right.y, f.right.z,
            f.convergence_deg,
        );
    }
    Ok(())
}
