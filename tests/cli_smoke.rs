use std::path::PathBuf;
use std::process::Command;

#[test]
fn cli_plan_emits_json_frames() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let waypoints = dir.join("line.waypoints");
    std::fs::write(&waypoints, "0 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stereorig"))
        .args([
            "--silent",
            "plan",
            "--waypoints",
            waypoints.to_string_lossy().as_ref(),
            "--fps",
            "10",
            "--cam-right",
            "0",
            "1",
            "0",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let frames: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let frames = frames.as_array().unwrap();
    assert_eq!(frames.len(), 10);
    assert_eq!(frames[0]["index"], 0);
    assert_eq!(frames[0]["left"][0], 0.0);
    assert_eq!(frames[9]["left"][0], 9.0);
    assert_eq!(frames[3]["right"][1], 1.0);
}

#[test]
fn cli_plan_respects_exclusive_end() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let waypoints = dir.join("end.waypoints");
    std::fs::write(&waypoints, "0 0 0 1.0 10.0 1.0\n10 0 0 1.0 10.0 1.0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stereorig"))
        .args([
            "--silent",
            "plan",
            "--waypoints",
            waypoints.to_string_lossy().as_ref(),
            "--fps",
            "10",
            "--end-at",
            "5",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let frames: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(frames.as_array().unwrap().len(), 5);
}

#[test]
fn cli_plan_rejects_bad_waypoint_file() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let waypoints = dir.join("bad.waypoints");
    std::fs::write(&waypoints, "0 0 zero 1.0 10.0 1.0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stereorig"))
        .args([
            "--silent",
            "plan",
            "--waypoints",
            waypoints.to_string_lossy().as_ref(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
