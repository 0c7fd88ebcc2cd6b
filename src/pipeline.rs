use std::path::PathBuf;

use anyhow::Context as _;

use crate::composite::{MergeOpts, merge_frames};
use crate::core::{Fps, FrameWindow};
use crate::encode_ffmpeg::{EncodeJob, encode};
use crate::error::StereorigResult;
use crate::interp::interpolate;
use crate::invoke::ProcessRunner;
use crate::raytracer::{RaytracerJob, SnapshotNaming};
use crate::rig::{CamMode, Eye};
use crate::waypoint::WaypointRecord;

/// Everything one animation run needs.
#[derive(Clone, Debug)]
pub struct AnimationJob {
    /// Waypoint records in file order; unused when `skip_render` is set.
    pub records: Vec<WaypointRecord>,
    pub fps_render: Fps,
    pub fps_video: Fps,
    pub window: FrameWindow,
    pub cam_mode: CamMode,
    pub raytracer: RaytracerJob,
    pub naming: SnapshotNaming,
    pub out_video: PathBuf,
    pub overwrite_video: bool,
    /// Reuse snapshots already on disk instead of rendering.
    pub skip_render: bool,
    /// Re-run `convert` for frames that already have a merged file.
    pub remerge: bool,
    /// Delete per-eye snapshots once merged.
    pub remove_after_merge: bool,
}

/// Counters for one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Stereo frames emitted by the interpolator.
    pub frames_rendered: u64,
    /// Raytracer invocations (one per rendered eye).
    pub snapshots_rendered: u64,
    /// `convert` invocations issued by the merge pass.
    pub frames_merged: u64,
}

/// Drive the full render -> merge -> encode pipeline.
///
/// Stages run strictly in order, single-threaded; any collaborator failure
/// aborts the run.
pub fn run(job: &AnimationJob, runner: &mut dyn ProcessRunner) -> StereorigResult<RenderStats> {
    let mut stats = RenderStats::default();

    if job.skip_render {
        tracing::info!("skipping render pass");
    } else {
        std::fs::create_dir_all(&job.naming.output_dir).with_context(|| {
            format!(
                "create output directory '{}'",
                job.naming.output_dir.display()
            )
        })?;

        let frames = interpolate(
            &job.records,
            job.fps_render,
            job.raytracer.rig.right,
            job.window,
        )?;
        for frame in frames {
            for eye in [Eye::Left, Eye::Right] {
                if !job.cam_mode.renders(eye) {
                    continue;
                }
                runner.run(&job.raytracer.invocation(&job.naming, &frame, eye))?;
                stats.snapshots_rendered += 1;
            }
            stats.frames_rendered += 1;
        }
        tracing::info!(frames = stats.frames_rendered, "render pass complete");
    }

    let rendered = !job.skip_render;
    if job.cam_mode == CamMode::Both {
        let opts = MergeOpts {
            remerge: job.remerge,
            remove_after: job.remove_after_merge,
            rendered,
        };
        stats.frames_merged = merge_frames(&job.naming, job.window, &opts, runner)?;
        tracing::info!(frames = stats.frames_merged, "merge pass complete");
    }

    let input_pattern = match job.cam_mode {
        CamMode::Both => job.naming.merged_pattern(),
        CamMode::Left => job.naming.eye_pattern(Eye::Left, rendered),
        CamMode::Right => job.naming.eye_pattern(Eye::Right, rendered),
    };
    encode(
        &EncodeJob {
            input_pattern,
            fps_video: job.fps_video,
            out_path: job.out_video.clone(),
            overwrite: job.overwrite_video,
        },
        runner,
    )?;

    Ok(stats)
}
