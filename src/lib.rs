//! Stereorig drives a stereoscopic animation rendering pipeline.
//!
//! The crate's own work is camera-path interpolation: an ordered waypoint
//! file is turned into a lazy sequence of left/right-eye camera positions
//! with a derived convergence angle. Everything heavy is delegated to
//! external collaborators invoked through typed argument lists:
//!
//! - an external `raytracer` binary renders each eye of each frame,
//! - ImageMagick `convert` composites the two eyes side by side,
//! - `ffmpeg` muxes the composited sequence into a video.
#![forbid(unsafe_code)]

pub mod composite;
pub mod core;
pub mod encode_ffmpeg;
pub mod error;
pub mod interp;
pub mod invoke;
pub mod pipeline;
pub mod raytracer;
pub mod rig;
pub mod waypoint;

pub use crate::core::{Fps, FrameIndex, FrameWindow, Resolution};
pub use crate::error::{StereorigError, StereorigResult};
pub use crate::interp::{Frame, Frames, interpolate};
pub use crate::invoke::{Invocation, ProcessRunner, RecordingRunner, SystemRunner};
pub use crate::pipeline::{AnimationJob, RenderStats};
pub use crate::raytracer::{RaytracerJob, SnapshotNaming};
pub use crate::rig::{CamMode, CameraRig, Eye};
pub use crate::waypoint::{Waypoint, WaypointRecord, load_waypoints, parse_waypoints};
