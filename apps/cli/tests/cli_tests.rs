//! etee-cli 端到端测试
//!
//! 所有运行命令都使用模拟 dongle，`--settle-ms 0` 跳过连接等待。

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("etee-cli").unwrap()
}

const FAST: [&str; 4] = ["--settle-ms", "0", "--interval-ms", "1"];

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("osc"))
        .stdout(predicate::str::contains("fingers"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_monitor_prints_one_line_per_cycle() {
    let output = cli()
        .args(["monitor", "--cycles", "3", "--channels", "index_pull", "--hands", "left"])
        .args(FAST)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| l.contains("L_index_pull:")).collect();
    assert_eq!(lines.len(), 3);

    let pattern = predicate::str::is_match(r"^\d{2}:\d{2}:\d{2}\.\d{6} \| L_index_pull:[ \d]{3}$").unwrap();
    for line in lines {
        assert!(pattern.eval(line), "unexpected line: {line}");
    }
}

#[test]
fn test_monitor_without_dongle_fails() {
    cli()
        .args(["monitor", "--no-dongle", "--cycles", "1"])
        .args(FAST)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No etee dongle found"));
}

#[test]
fn test_unplugged_dongle_exits_with_code_one() {
    cli()
        .args(["monitor", "--unplug-after", "2", "--channels", "thumb_pull"])
        .args(FAST)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Dongle disconnected. Please reconnect and restart."));
}

#[test]
fn test_osc_dry_run_prints_messages() {
    cli()
        .args(["osc", "--dry-run", "--cycles", "1", "--channels", "quaternion", "--hands", "right"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sending OSC data to 127.0.0.1:8000"))
        .stdout(predicate::str::contains("/right/quaternion/w "))
        .stdout(predicate::str::contains("/right/quaternion/z "))
        .stdout(predicate::str::contains("/right/quaternion ").not())
        .stdout(predicate::str::contains("R_quaternion:["));
}

#[test]
fn test_osc_sends_to_local_port() {
    let receiver = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = receiver.local_addr().unwrap().port().to_string();

    cli()
        .args(["osc", "--port", &port, "--cycles", "2", "--channels", "index_pull"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("L_index_pull:"));

    receiver.set_read_timeout(Some(std::time::Duration::from_secs(2))).unwrap();
    let mut buf = [0u8; 1536];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    assert!(n > 0);
    assert!(buf[..n].starts_with(b"/left/index_pull"));
}

#[test]
fn test_fingers_table() {
    cli()
        .args(["fingers", "--table", "--cycles", "1"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Finger"))
        .stdout(predicate::str::contains("Pinky"));
}

#[test]
fn test_fingers_line() {
    cli()
        .args(["fingers", "--cycles", "1"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("| Thumb  L: pull="))
        .stdout(predicate::str::contains("| Middle L: pull="));
}

#[test]
fn test_invalid_hand_rejected() {
    cli()
        .args(["monitor", "--hands", "middle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid hand"));
}

#[test]
fn test_config_init_show_and_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monitor.toml");
    let path_str = path.to_str().unwrap();

    cli()
        .args(["--config", path_str, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(path.exists());

    cli()
        .args(["--config", path_str, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .args(["--config", path_str, "config", "init", "--force"])
        .assert()
        .success();

    cli()
        .args(["--config", path_str, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("index_pull"))
        .stdout(predicate::str::contains("port = 8000"));

    cli()
        .args(["--config", path_str, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor.toml"));
}

#[test]
fn test_config_file_drives_monitor() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monitor.toml");
    fs::write(&path, "channels = [\"battery_level\"]\nhands = [\"right\"]\n").unwrap();

    cli()
        .args(["--config", path.to_str().unwrap(), "monitor", "--cycles", "1"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("R_battery_level:"))
        .stdout(predicate::str::contains("L_battery_level:").not());
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempdir().unwrap();
    cli()
        .args(["--config", dir.path().join("absent.toml").to_str().unwrap(), "monitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_monitor_shows_online_hand_when_other_is_offline() {
    let output = cli()
        .args(["monitor", "--offline", "right", "--cycles", "2", "--channels", "index_pull"])
        .args(FAST)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| l.contains("L_index_pull:")).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(!line.contains("L_index_pull:---"), "unexpected line: {line}");
        assert!(line.ends_with("R_index_pull:---"), "unexpected line: {line}");
    }
    assert!(!stdout.contains("controller not detected"));
}

#[test]
fn test_osc_sends_zero_for_offline_hand() {
    cli()
        .args(["osc", "--dry-run", "--offline", "right", "--cycles", "1", "--channels", "index_pull"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("/left/index_pull "))
        .stdout(predicate::str::contains("/right/index_pull 0.000"))
        .stdout(predicate::str::contains("controller not detected").not());
}

#[test]
fn test_fingers_reports_missing_right_controller() {
    cli()
        .args(["fingers", "--offline", "right", "--cycles", "2"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Right etee controller not detected. Please reconnect controller."))
        .stdout(predicate::str::contains("| Thumb  L: pull=").not());
}
