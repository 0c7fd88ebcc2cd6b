use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::core::Fps;
use crate::error::{StereorigError, StereorigResult};
use crate::invoke::{Invocation, ProcessRunner};

/// Video muxing configuration for the external `ffmpeg` binary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodeJob {
    /// printf-style image sequence pattern (`%d` is the frame index).
    pub input_pattern: String,
    /// Keyframe interval hint (`-g`), matched to the render rate.
    pub fps_video: Fps,
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it already exists (`-y` vs `-n`).
    pub overwrite: bool,
}

impl EncodeJob {
    pub fn validate(&self) -> StereorigResult<()> {
        if self.input_pattern.is_empty() {
            return Err(StereorigError::validation(
                "encode input pattern must be non-empty",
            ));
        }
        if self.out_path.as_os_str().is_empty() {
            return Err(StereorigError::validation(
                "encode output path must be non-empty",
            ));
        }
        Ok(())
    }

    /// Build the muxing invocation.
    pub fn invocation(&self) -> Invocation {
        Invocation::new("ffmpeg")
            .arg("-g")
            .arg_f64(self.fps_video.as_f64())
            .args(["-flags", "+bitexact", "-flags2", "+wpred", "-qscale", "1"])
            .args(["-i".to_string(), self.input_pattern.clone()])
            .arg(if self.overwrite { "-y" } else { "-n" })
            .arg(self.out_path.display().to_string())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StereorigResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Mux an image sequence into a video file.
pub fn encode(job: &EncodeJob, runner: &mut dyn ProcessRunner) -> StereorigResult<()> {
    job.validate()?;
    ensure_parent_dir(&job.out_path)?;

    if !job.overwrite && job.out_path.exists() {
        return Err(StereorigError::validation(format!(
            "output file '{}' already exists",
            job.out_path.display()
        )));
    }

    if !runner.is_available(Path::new("ffmpeg")) {
        return Err(StereorigError::process(
            "ffmpeg is required for video muxing, but was not found on PATH",
        ));
    }

    tracing::info!(out = %job.out_path.display(), "muxing frame sequence");
    runner.run(&job.invocation())
}
