use glam::DVec3;

/// Fixed stereo camera basis, constant for a whole run.
///
/// `right` doubles as the right-eye offset direction: the right-eye path is
/// the left-eye path translated by `right * eye_separation`. All three
/// vectors are also forwarded to the raytracer as its view basis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraRig {
    pub right: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            right: DVec3::X,
            up: DVec3::Y,
            forward: DVec3::Z,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Sign applied to the convergence angle for this eye.
    pub fn angle_sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Which eyes a run renders and composites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CamMode {
    Left,
    Right,
    Both,
}

impl CamMode {
    /// Return `true` when this mode renders `eye`.
    pub fn renders(self, eye: Eye) -> bool {
        matches!(
            (self, eye),
            (Self::Both, _) | (Self::Left, Eye::Left) | (Self::Right, Eye::Right)
        )
    }
}
