#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub fn pilaris_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pilaris").unwrap();
    cmd.env_remove("PILARIS_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Initialize a ledger in `dir`
pub fn init_ledger(dir: &Path) {
    pilaris_cmd().arg("init").arg(dir).assert().success();
}

/// Run `pilaris` inside `dir` and return its stdout; the command must succeed
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = pilaris_cmd().current_dir(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "pilaris {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Seat ids listed under `time` in `pilaris show` output
pub fn seat_ids(show_output: &str, time: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut in_slot = false;

    for line in show_output.lines() {
        if !line.starts_with(' ') {
            in_slot = line.starts_with(time);
            continue;
        }
        if in_slot {
            if let Some(id) = line.split_whitespace().next() {
                if id.starts_with("id_") {
                    ids.push(id.to_string());
                }
            }
        }
    }
    ids
}
