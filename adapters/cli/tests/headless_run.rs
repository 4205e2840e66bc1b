use std::process::Command;

#[test]
fn headless_run_prints_banner_and_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_haunted-dreams"))
        .args(["--headless", "1", "--seed", "42"])
        .output()
        .expect("failed to launch haunted-dreams binary");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Haunted Dreams. Stay near the telephone."));
    assert!(stdout.contains("tutorial: Idle"), "unexpected summary: {stdout}");
    assert!(stdout.contains("nightmare: 1/6"), "unexpected summary: {stdout}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_haunted-dreams"))
        .args(["--headless", "0", "--config", "does-not-exist.toml"])
        .output()
        .expect("failed to launch haunted-dreams binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config"), "stderr: {stderr}");
}
