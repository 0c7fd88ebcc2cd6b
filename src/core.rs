use crate::error::{StereorigError, StereorigResult};

/// Absolute 0-based stereo frame index, global across the whole waypoint path.
///
/// One index covers both eyes of a frame; the counter advances once per
/// stereo pair, never per eye.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second for rendering or muxing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fps(f64);

impl Fps {
    /// Create a validated FPS value (finite, `> 0`).
    pub fn new(fps: f64) -> StereorigResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(StereorigError::validation("fps must be finite and > 0"));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Whole frames covering `secs` seconds, floor semantics.
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        (self.0 * secs).floor().max(0.0) as u64
    }
}

/// Cropping window over the global frame counter.
///
/// `start` is inclusive; frames before it are counted but not emitted, so
/// cropping only filters output and never renumbers. `end` is exclusive and
/// halts iteration exactly when the counter reaches it; `None` means
/// unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameWindow {
    pub start: FrameIndex,
    pub end: Option<FrameIndex>,
}

impl FrameWindow {
    /// Create a validated window with `start <= end` when `end` is bounded.
    pub fn new(start: FrameIndex, end: Option<FrameIndex>) -> StereorigResult<Self> {
        if let Some(end) = end
            && end.0 < start.0
        {
            return Err(StereorigError::validation(
                "frame window end must be >= start",
            ));
        }
        Ok(Self { start, end })
    }

    /// Window covering every frame.
    pub fn unbounded() -> Self {
        Self {
            start: FrameIndex(0),
            end: None,
        }
    }

    /// Return `true` when `f` falls before the window start.
    pub fn starts_after(self, f: FrameIndex) -> bool {
        f.0 < self.start.0
    }

    /// Return `true` when the exclusive end has been reached at `f`.
    pub fn ends_at(self, f: FrameIndex) -> bool {
        self.end.is_some_and(|end| end.0 <= f.0)
    }
}

impl Default for FrameWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Render target size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution (both dimensions non-zero).
    pub fn new(width: u32, height: u32) -> StereorigResult<Self> {
        if width == 0 || height == 0 {
            return Err(StereorigError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}
