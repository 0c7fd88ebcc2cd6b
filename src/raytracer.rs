use std::path::PathBuf;

use crate::core::{FrameIndex, Resolution};
use crate::interp::Frame;
use crate::invoke::Invocation;
use crate::rig::{CameraRig, Eye};

/// External raytracer configuration, constant across a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RaytracerJob {
    pub program: PathBuf,
    /// Scene loader switch, passed as `-<model_type>`.
    pub model_type: String,
    pub model_path: PathBuf,
    pub rig: CameraRig,
    pub resolution: Resolution,
    /// Light definitions forwarded verbatim as `-light` groups, 8 values each.
    pub lights: Vec<[f64; 8]>,
    /// Supersampling factors, forwarded as `-anti_alias X Y` when set.
    pub anti_alias: Option<(u32, u32)>,
    /// JPEG quality for snapshots.
    pub jpeg_quality: u32,
}

impl RaytracerJob {
    /// Locate the raytracer executable: explicit override first, then
    /// `$RAYTRACER_HOME/raytracer`, then `raytracer` from `PATH`.
    pub fn locate_program(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(p) = explicit {
            return p;
        }
        if let Some(home) = std::env::var_os("RAYTRACER_HOME") {
            return PathBuf::from(home).join("raytracer");
        }
        PathBuf::from("raytracer")
    }

    /// Build the render invocation for one eye of one frame.
    ///
    /// The camera position comes from the interpolated path; the toe-in is
    /// applied by the raytracer itself through `-ry ±convergence`.
    pub fn invocation(&self, naming: &SnapshotNaming, frame: &Frame, eye: Eye) -> Invocation {
        let mut inv = Invocation::new(&self.program)
            .arg(format!("-{}", self.model_type))
            .arg(self.model_path.display().to_string())
            .arg("-cam")
            .arg_vec3(frame.position_for(eye))
            .arg("-jpg")
            .arg(naming.snapshot_stem(eye, frame.index))
            .arg(self.jpeg_quality.to_string())
            .arg("-dx")
            .arg_vec3(self.rig.right)
            .arg("-dy")
            .arg_vec3(self.rig.up)
            .arg("-dz")
            .arg_vec3(self.rig.forward);

        if let Some((x, y)) = self.anti_alias {
            inv = inv.args(["-anti_alias".to_string(), x.to_string(), y.to_string()]);
        }

        inv = inv
            .args([
                "-res".to_string(),
                self.resolution.width.to_string(),
                self.resolution.height.to_string(),
            ])
            .args(["-rx", "0"])
            .arg("-ry")
            .arg_f64(frame.angle_for(eye));

        for light in &self.lights {
            inv = inv.arg("-light");
            for v in light {
                inv = inv.arg_f64(*v);
            }
        }
        inv
    }
}

/// Deterministic snapshot naming derived from the global frame index.
///
/// `%d` in the per-eye template is replaced with the index; the result is
/// joined under `output_dir`. The raytracer appends `_0.jpg` to the stem it
/// is given, so the on-disk snapshot differs from the stem handed to it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotNaming {
    pub output_dir: PathBuf,
    pub left_template: String,
    pub right_template: String,
}

impl SnapshotNaming {
    /// Stereo naming with the default per-eye templates.
    pub fn stereo(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            left_template: "%d_left_0".to_string(),
            right_template: "%d_right_0".to_string(),
        }
    }

    /// Single-eye naming: both eyes share the bare index template.
    pub fn mono(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            left_template: "%d".to_string(),
            right_template: "%d".to_string(),
        }
    }

    fn template(&self, eye: Eye) -> &str {
        match eye {
            Eye::Left => &self.left_template,
            Eye::Right => &self.right_template,
        }
    }

    /// Path stem handed to the raytracer (no extension).
    pub fn snapshot_stem(&self, eye: Eye, index: FrameIndex) -> String {
        self.output_dir
            .join(self.template(eye).replace("%d", &index.0.to_string()))
            .display()
            .to_string()
    }

    /// Snapshot file on disk. `rendered` selects the raytracer's `_0.jpg`
    /// suffix; pre-existing snapshots from a skipped render are plain `.jpg`.
    pub fn snapshot_path(&self, eye: Eye, index: FrameIndex, rendered: bool) -> PathBuf {
        PathBuf::from(format!(
            "{}{}",
            self.snapshot_stem(eye, index),
            Self::suffix(rendered)
        ))
    }

    /// Side-by-side composite for one stereo frame.
    pub fn merged_path(&self, index: FrameIndex) -> PathBuf {
        self.output_dir.join(format!("{}.jpg", index.0))
    }

    /// ffmpeg input pattern for the merged sequence.
    pub fn merged_pattern(&self) -> String {
        self.output_dir.join("%d.jpg").display().to_string()
    }

    /// ffmpeg input pattern for a single-eye sequence.
    pub fn eye_pattern(&self, eye: Eye, rendered: bool) -> String {
        format!(
            "{}{}",
            self.output_dir.join(self.template(eye)).display(),
            Self::suffix(rendered)
        )
    }

    fn suffix(rendered: bool) -> &'static str {
        if rendered { "_0.jpg" } else { ".jpg" }
    }
}
