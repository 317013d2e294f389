use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "pbsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn write_benchmarks(label: &str, json: &str) -> std::path::PathBuf {
    let path = temp_path(label);
    std::fs::write(&path, json).expect("write benchmarks");
    path
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_pbsim-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    for key in ["league", "power", "contact", "aces"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_json_report_covers_every_scenario_and_seed() {
    let exe = env!("CARGO_BIN_EXE_pbsim-tester");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "league,aces",
            "--seeds",
            "1..=2",
            "--games",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pbsim Calibration Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let runs = value.as_array().expect("array of runs");
    assert_eq!(runs.len(), 4);
    assert!(runs.iter().all(|run| run["games_played"] == 2));
    assert_eq!(runs[0]["scenario_name"], "league");
    assert_eq!(runs[3]["scenario_name"], "aces");
    assert_eq!(runs[3]["seed"], 2);
}

#[test]
fn cli_enforced_targets_fail_on_a_miss() {
    let exe = env!("CARGO_BIN_EXE_pbsim-tester");
    let benchmarks = write_benchmarks(
        "miss",
        r#"{ "runs_per_game": { "target": 100.0, "tolerance": 0.1 } }"#,
    );
    let output = Command::new(exe)
        .args(["--games", "1", "--report", "csv", "--enforce-targets", "--benchmarks"])
        .arg(&benchmarks)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("scenario,seed,games,metric"));
    assert!(stdout.contains("runs_per_game"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("runs_per_game"));
}

#[test]
fn cli_enforced_targets_pass_inside_tolerance() {
    let exe = env!("CARGO_BIN_EXE_pbsim-tester");
    let benchmarks = write_benchmarks(
        "hit",
        r#"{ "runs_per_game": { "target": 4.0, "tolerance": 100.0 } }"#,
    );
    let status = Command::new(exe)
        .args(["--games", "1", "--report", "markdown", "--enforce-targets", "--benchmarks"])
        .arg(&benchmarks)
        .status()
        .expect("run cli");
    assert!(status.success());
}

#[test]
fn cli_rejects_bad_seeds_and_unknown_scenarios() {
    let exe = env!("CARGO_BIN_EXE_pbsim-tester");
    let bad_seed = Command::new(exe)
        .args(["--seeds", "banana", "--games", "1"])
        .output()
        .expect("run cli");
    assert!(!bad_seed.status.success());
    assert!(String::from_utf8_lossy(&bad_seed.stderr).contains("Unrecognized seed token"));

    let unknown = Command::new(exe)
        .args(["--scenarios", "cricket", "--games", "1"])
        .output()
        .expect("run cli");
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Unknown scenario"));
}
