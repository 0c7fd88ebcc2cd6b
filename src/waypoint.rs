use std::path::Path;

use anyhow::Context as _;
use glam::DVec3;

use crate::error::{StereorigError, StereorigResult};

/// A control point along the camera path.
///
/// `duration_secs` is the time spent travelling from this waypoint to the
/// next one; the last waypoint's duration is unused.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waypoint {
    pub position: DVec3,
    pub duration_secs: f64,
    pub focus_distance: f64,
    pub eye_separation: f64,
}

/// One record of a waypoint file.
///
/// Comment records stay in the sequence: segment pairing is over adjacent
/// records, not adjacent active waypoints, so a commented-out line suppresses
/// both segments it touches instead of splicing its neighbours together.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WaypointRecord {
    Point(Waypoint),
    Comment,
}

impl WaypointRecord {
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment)
    }

    pub fn point(&self) -> Option<&Waypoint> {
        match self {
            Self::Point(w) => Some(w),
            Self::Comment => None,
        }
    }
}

/// Read and parse a waypoint file.
pub fn load_waypoints(path: &Path) -> StereorigResult<Vec<WaypointRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read waypoint file '{}'", path.display()))?;
    parse_waypoints(&text)
}

/// Parse whitespace-delimited waypoint records.
///
/// Each active record needs at least 6 numeric fields
/// (`x y z duration focus_distance eye_separation`); extra fields are
/// ignored. A record whose first token begins with `#` is a comment and is
/// exempt from field validation. Blank lines are not records.
pub fn parse_waypoints(text: &str) -> StereorigResult<Vec<WaypointRecord>> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        let Some(first) = fields.first() else {
            continue;
        };
        if first.starts_with('#') {
            records.push(WaypointRecord::Comment);
            continue;
        }

        if fields.len() < 6 {
            return Err(StereorigError::waypoint(
                line_no,
                format!("expected at least 6 fields, found {}", fields.len()),
            ));
        }

        let mut nums = [0f64; 6];
        for (slot, raw) in nums.iter_mut().zip(&fields) {
            *slot = raw.parse::<f64>().map_err(|_| {
                StereorigError::waypoint(line_no, format!("non-numeric field '{raw}'"))
            })?;
        }

        records.push(WaypointRecord::Point(Waypoint {
            position: DVec3::new(nums[0], nums[1], nums[2]),
            duration_secs: nums[3],
            focus_distance: nums[4],
            eye_separation: nums[5],
        }));
    }
    Ok(records)
}

/// Validate a waypoint path before interpolation.
///
/// Fatal configuration errors, surfaced before any frame is produced: fewer
/// than 2 active waypoints, a negative or non-finite duration, a
/// non-positive focus distance (the convergence angle would be undefined), or
/// a non-finite eye separation.
pub fn validate_for_interpolation(records: &[WaypointRecord]) -> StereorigResult<()> {
    let active = records.iter().filter(|r| !r.is_comment()).count();
    if active < 2 {
        return Err(StereorigError::validation(format!(
            "waypoint path needs at least 2 active waypoints, found {active}"
        )));
    }
    for w in records.iter().filter_map(WaypointRecord::point) {
        if !w.duration_secs.is_finite() || w.duration_secs < 0.0 {
            return Err(StereorigError::validation(
                "waypoint duration must be finite and >= 0",
            ));
        }
        if !w.focus_distance.is_finite() || w.focus_distance <= 0.0 {
            return Err(StereorigError::validation(
                "waypoint focus distance must be finite and > 0",
            ));
        }
        if !w.eye_separation.is_finite() {
            return Err(StereorigError::validation(
                "waypoint eye separation must be finite",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_and_comments() {
        let records = parse_waypoints(
            "0 0 0 1.0 10.0 1.0\n\
             # disabled 0 0 2.0 10.0 1.0\n\
             10 0 0 1.0 10.0 1.0\n",
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[1].is_comment());
        let first = records[0].point().unwrap();
        assert_eq!(first.position, DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(first.duration_secs, 1.0);
        assert_eq!(first.focus_distance, 10.0);
        assert_eq!(first.eye_separation, 1.0);
    }

    #[test]
    fn extra_fields_are_ignored_and_blank_lines_skipped() {
        let records = parse_waypoints("\n1 2 3 4 5 6 extra stuff\n\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].point().unwrap().eye_separation, 6.0);
    }

    #[test]
    fn short_record_reports_line() {
        let err = parse_waypoints("0 0 0 1.0 10.0 1.0\n1 2 3\n").unwrap_err();
        match err {
            StereorigError::Waypoint { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_reports_line_and_token() {
        let err = parse_waypoints("0 0 zero 1.0 10.0 1.0\n").unwrap_err();
        match err {
            StereorigError::Waypoint { line, msg } => {
                assert_eq!(line, 1);
                assert!(msg.contains("'zero'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validation_requires_two_active_waypoints() {
        let records = parse_waypoints("0 0 0 1.0 10.0 1.0\n# off\n").unwrap();
        assert!(validate_for_interpolation(&records).is_err());
    }

    #[test]
    fn validation_rejects_zero_focus_distance() {
        let records = parse_waypoints("0 0 0 1.0 0.0 1.0\n1 0 0 1.0 10.0 1.0\n").unwrap();
        assert!(validate_for_interpolation(&records).is_err());
    }

    #[test]
    fn validation_rejects_negative_duration() {
        let records = parse_waypoints("0 0 0 -1.0 10.0 1.0\n1 0 0 1.0 10.0 1.0\n").unwrap();
        assert!(validate_for_interpolation(&records).is_err());
    }
}
