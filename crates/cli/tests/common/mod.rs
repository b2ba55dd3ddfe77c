//! Shared helpers for `fieldtag` CLI tests.

#![allow(unreachable_pub, dead_code)]

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use assert_cmd::cargo;

pub fn fieldtag_cmd() -> Command {
    Command::new(cargo::cargo_bin!("fieldtag"))
}

/// Run `fieldtag` with `args`, panicking if it cannot be spawned.
pub fn run(args: &[&str]) -> Output {
    fieldtag_cmd()
        .args(args)
        .output()
        .expect("run fieldtag command")
}

/// Run `fieldtag` with `stdin_body` piped to its standard input.
pub fn run_with_stdin(args: &[&str], stdin_body: &str) -> Output {
    let mut child = fieldtag_cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn fieldtag command");

    {
        let stdin = child.stdin.as_mut().expect("stdin handle");
        stdin
            .write_all(stdin_body.as_bytes())
            .expect("write stdin body");
    }

    child.wait_with_output().expect("wait for output")
}

/// Write `content` to `name` inside a fresh temp dir.
/// Keep the returned dir alive for as long as the path is used.
pub fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path.to_string_lossy().to_string())
}

/// Parse stdout as JSON, panicking with the raw text on failure.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"))
}
