use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use glam::DVec3;

use crate::error::{StereorigError, StereorigResult};

/// A fully resolved external command: program plus structured argument list.
///
/// Invocations are executed directly, never through a shell, so argument
/// values need no quoting.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg_f64(self, v: f64) -> Self {
        self.arg(format!("{v}"))
    }

    /// Push the three components of `v` as separate arguments.
    pub fn arg_vec3(self, v: DVec3) -> Self {
        self.arg_f64(v.x).arg_f64(v.y).arg_f64(v.z)
    }
}

impl fmt::Display for Invocation {
    /// Shell-like preview for logging only; execution never goes through a
    /// shell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Seam between the pipeline and the operating system.
pub trait ProcessRunner {
    /// Run `inv` to completion, failing on spawn error or non-zero exit.
    fn run(&mut self, inv: &Invocation) -> StereorigResult<()>;

    /// Cheap availability probe for `program` (via its `-version` flag).
    fn is_available(&mut self, program: &Path) -> bool;
}

/// Runner that spawns real processes.
///
/// Stdout is inherited so collaborator output stays visible on the console;
/// stderr is captured and folded into the error on non-zero exit.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, inv: &Invocation) -> StereorigResult<()> {
        tracing::debug!(invocation = %inv, "spawning");
        let output = Command::new(&inv.program)
            .args(&inv.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                StereorigError::process(format!(
                    "failed to spawn '{}': {e}",
                    inv.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StereorigError::process(format!(
                "'{}' exited with status {}: {}",
                inv.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn is_available(&mut self, program: &Path) -> bool {
        Command::new(program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// In-memory runner for tests: records invocations and reports success.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub invocations: Vec<Invocation>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, inv: &Invocation) -> StereorigResult<()> {
        self.invocations.push(inv.clone());
        Ok(())
    }

    fn is_available(&mut self, _program: &Path) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_args() {
        let inv = Invocation::new("raytracer")
            .arg("-cam")
            .arg_vec3(DVec3::new(1.0, -2.5, 0.0))
            .args(["-res", "320", "240"]);
        assert_eq!(inv.args, vec!["-cam", "1", "-2.5", "0", "-res", "320", "240"]);
    }

    #[test]
    fn display_previews_program_and_args() {
        let inv = Invocation::new("ffmpeg").args(["-i", "in.jpg", "out.avi"]);
        assert_eq!(inv.to_string(), "ffmpeg -i in.jpg out.avi");
    }

    #[test]
    fn recording_runner_captures_in_order() {
        let mut runner = RecordingRunner::new();
        runner.run(&Invocation::new("a")).unwrap();
        runner.run(&Invocation::new("b")).unwrap();
        let programs: Vec<_> = runner
            .invocations
            .iter()
            .map(|i| i.program.display().to_string())
            .collect();
        assert_eq!(programs, vec!["a", "b"]);
    }

    #[test]
    fn system_runner_reports_missing_program() {
        let mut runner = SystemRunner;
        let err = runner
            .run(&Invocation::new("stereorig-no-such-program"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
