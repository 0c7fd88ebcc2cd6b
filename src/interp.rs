use glam::DVec3;

use crate::core::{Fps, FrameIndex, FrameWindow};
use crate::error::StereorigResult;
use crate::rig::Eye;
use crate::waypoint::{Waypoint, WaypointRecord, validate_for_interpolation};

/// One interpolated stereo camera sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub index: FrameIndex,
    pub left: DVec3,
    pub right: DVec3,
    /// Convergence half-angle in degrees; the left eye rotates by `+angle`,
    /// the right eye by `-angle`.
    pub convergence_deg: f64,
}

impl Frame {
    pub fn position_for(&self, eye: Eye) -> DVec3 {
        match eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        }
    }

    pub fn angle_for(&self, eye: Eye) -> f64 {
        self.convergence_deg * eye.angle_sign()
    }
}

/// Interpolate a waypoint path into a lazy sequence of stereo frames.
///
/// Configuration errors (fewer than 2 active waypoints, non-positive focus
/// distance, negative duration) surface here, before the first frame; the
/// returned iterator itself is infallible. The global frame counter is
/// iterator state threaded across segments, so numbering stays contiguous
/// over the whole path and window cropping only filters output.
pub fn interpolate(
    records: &[WaypointRecord],
    fps: Fps,
    right_offset: DVec3,
    window: FrameWindow,
) -> StereorigResult<Frames<'_>> {
    validate_for_interpolation(records)?;
    Ok(Frames {
        records,
        fps,
        right_offset,
        window,
        pair: 1,
        segment: None,
        counter: 0,
        done: false,
    })
}

/// Lazy frame sequence over a waypoint path. Created by [`interpolate`].
pub struct Frames<'a> {
    records: &'a [WaypointRecord],
    fps: Fps,
    right_offset: DVec3,
    window: FrameWindow,
    /// Index of the record ending the current pair.
    pair: usize,
    segment: Option<Segment>,
    /// Global stereo-frame counter, never reset per segment.
    counter: u64,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            if self.done {
                return None;
            }

            if let Some(seg) = self.segment.as_mut() {
                while seg.emitted < seg.num_frames {
                    if self.window.ends_at(FrameIndex(self.counter)) {
                        self.done = true;
                        return None;
                    }
                    let i = seg.emitted;
                    let index = FrameIndex(self.counter);
                    seg.emitted += 1;
                    self.counter += 1;
                    if self.window.starts_after(index) {
                        continue;
                    }
                    let left = seg.sample(i);
                    return Some(Frame {
                        index,
                        left,
                        right: left + seg.eye_offset,
                        convergence_deg: seg.convergence_deg,
                    });
                }
                self.segment = None;
            }

            loop {
                if self.pair >= self.records.len() {
                    self.done = true;
                    return None;
                }
                let a = &self.records[self.pair - 1];
                let b = &self.records[self.pair];
                self.pair += 1;
                if let (Some(a), Some(b)) = (a.point(), b.point()) {
                    let seg = Segment::from_pair(a, b, self.fps, self.right_offset);
                    tracing::debug!(
                        frames = seg.num_frames,
                        convergence_deg = seg.convergence_deg,
                        "interpolating segment"
                    );
                    self.segment = Some(seg);
                    break;
                }
            }
        }
    }
}

/// Derived state for the span between two active waypoints.
#[derive(Clone, Copy, Debug)]
struct Segment {
    start: DVec3,
    delta: DVec3,
    /// Rigid right-eye translation for this segment.
    eye_offset: DVec3,
    convergence_deg: f64,
    num_frames: u64,
    emitted: u64,
}

impl Segment {
    fn from_pair(a: &Waypoint, b: &Waypoint, fps: Fps, right_offset: DVec3) -> Self {
        Self {
            start: a.position,
            delta: b.position - a.position,
            eye_offset: right_offset * a.eye_separation,
            convergence_deg: (a.eye_separation / a.focus_distance).atan().to_degrees(),
            num_frames: fps.frames_for_secs(a.duration_secs),
            emitted: 0,
        }
    }

    fn sample(&self, i: u64) -> DVec3 {
        self.start + self.delta * (i as f64 / self.num_frames as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoint::parse_waypoints;

    fn frames(
        text: &str,
        fps: f64,
        right: DVec3,
        window: FrameWindow,
    ) -> StereorigResult<Vec<Frame>> {
        let records = parse_waypoints(text)?;
        Ok(interpolate(&records, Fps::new(fps)?, right, window)?.collect())
    }

    fn assert_vec_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    const TWO_POINT_PATH: &str = "0 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n";

    #[test]
    fn example_path_yields_ten_unit_steps() {
        let out = frames(TWO_POINT_PATH, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        assert_eq!(out.len(), 10);
        let expected_angle = (1.0f64 / 10.0).atan().to_degrees();
        for (i, f) in out.iter().enumerate() {
            assert_eq!(f.index, FrameIndex(i as u64));
            assert_vec_close(f.left, DVec3::new(i as f64, 0.0, 0.0));
            assert_vec_close(f.right, f.left + DVec3::Y);
            assert!((f.angle_for(Eye::Left) - expected_angle).abs() < 1e-12);
            assert!((f.angle_for(Eye::Right) + expected_angle).abs() < 1e-12);
        }
    }

    #[test]
    fn interpolation_is_exact_linear() {
        let out = frames(
            "1 2 3 2.0 10.0 0.5\n5 -2 11 1.0 10.0 0.5\n",
            5.0,
            DVec3::X,
            FrameWindow::unbounded(),
        )
        .unwrap();
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(5.0, -2.0, 11.0);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].left, a);
        for (i, f) in out.iter().enumerate() {
            assert_vec_close(f.left, a + (b - a) * (i as f64 / 10.0));
        }
    }

    #[test]
    fn right_path_is_rigid_translation() {
        let right = DVec3::new(0.3, 0.0, -0.4);
        let out = frames(
            "0 0 0 1.0 4.0 2.0\n3 3 3 1.0 4.0 2.0\n",
            8.0,
            right,
            FrameWindow::unbounded(),
        )
        .unwrap();
        for f in &out {
            assert_vec_close(f.right - f.left, right * 2.0);
        }
    }

    #[test]
    fn convergence_angle_is_symmetric() {
        let out = frames(TWO_POINT_PATH, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        for f in &out {
            assert_eq!(f.angle_for(Eye::Left), -f.angle_for(Eye::Right));
        }
    }

    #[test]
    fn end_is_exclusive_across_segments() {
        let text = "0 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n20 0 0 1.0 10.0 1.0\n";
        let window = FrameWindow::new(FrameIndex(0), Some(FrameIndex(13))).unwrap();
        let out = frames(text, 10.0, DVec3::Y, window).unwrap();
        assert_eq!(out.len(), 13);
        assert_eq!(out.last().unwrap().index, FrameIndex(12));
    }

    #[test]
    fn start_cropping_filters_without_renumbering() {
        let all = frames(TWO_POINT_PATH, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        let window = FrameWindow::new(FrameIndex(5), None).unwrap();
        let cropped = frames(TWO_POINT_PATH, 10.0, DVec3::Y, window).unwrap();
        assert_eq!(cropped.len(), 5);
        for f in &cropped {
            let reference = &all[f.index.0 as usize];
            assert_eq!(f.index, reference.index);
            assert_eq!(f.left, reference.left);
            assert_eq!(f.right, reference.right);
        }
    }

    #[test]
    fn counter_is_contiguous_across_segments() {
        let text = "0 0 0 1.0 10.0 1.0\n10 0 0 0.5 10.0 1.0\n20 0 0 1.0 10.0 1.0\n";
        let out = frames(text, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        // 10 frames from the first segment, 5 from the second.
        assert_eq!(out.len(), 15);
        for (i, f) in out.iter().enumerate() {
            assert_eq!(f.index, FrameIndex(i as u64));
        }
        assert_vec_close(out[10].left, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn zero_length_segment_contributes_no_frames() {
        let text = "0 0 0 0.05 10.0 1.0\n10 0 0 1.0 10.0 1.0\n20 0 0 1.0 10.0 1.0\n";
        let out = frames(text, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        // First segment floors to zero frames; numbering starts at the second.
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].index, FrameIndex(0));
        assert_vec_close(out[0].left, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn commented_record_suppresses_both_adjacent_segments() {
        let text = "0 0 0 1.0 10.0 1.0\n# 5 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n";
        let out = frames(text, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_comment_only_drops_last_segment() {
        let text = "0 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n# 20 0 0 1.0 10.0 1.0\n";
        let out = frames(text, 10.0, DVec3::Y, FrameWindow::unbounded()).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn zero_focus_distance_is_rejected_before_any_frame() {
        let err = frames(
            "0 0 0 1.0 0.0 1.0\n10 0 0 1.0 10.0 1.0\n",
            10.0,
            DVec3::Y,
            FrameWindow::unbounded(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::StereorigError::Validation(_)));
    }

    #[test]
    fn single_waypoint_is_rejected() {
        assert!(
            frames(
                "0 0 0 1.0 10.0 1.0\n",
                10.0,
                DVec3::Y,
                FrameWindow::unbounded()
            )
            .is_err()
        );
    }
}
