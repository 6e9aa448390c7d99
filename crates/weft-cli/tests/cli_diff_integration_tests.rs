//! CLI integration tests
//!
//! Run the built binary against JSON documents in a temporary directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn weft(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weft"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_cli_diff_prints_patch() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"nodes": {}}"#);
    let new = write(
        &dir,
        "new.json",
        r#"{"nodes": {"root:1": {"name": "A"}, "root:11": {"name": "B"}}}"#,
    );

    let output = weft(&[
        "diff",
        old.to_str().unwrap(),
        new.to_str().unwrap(),
        "--target-type",
        "workflow",
    ]);
    let patch = stdout_json(&output);

    assert_eq!(patch["targetTypeId"], "workflow");
    let ops = patch["ops"].as_array().unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0]["op"], "add");
    assert_eq!(ops[0]["path"], "/nodes/root:1");
    assert_eq!(ops[1]["path"], "/nodes/root:11");
}

#[test]
fn test_cli_diff_then_apply_round_trips() {
    let dir = TempDir::new().unwrap();
    let old_doc = r#"{"annotations": ["anno1", "anno2", "anno3"], "name": "wf"}"#;
    let new_doc = r#"{"annotations": ["anno3"], "name": "wf", "linked": true}"#;
    let old = write(&dir, "old.json", old_doc);
    let new = write(&dir, "new.json", new_doc);

    let diff_output = weft(&["diff", old.to_str().unwrap(), new.to_str().unwrap(), "--pretty"]);
    assert!(diff_output.status.success());
    let patch = write(&dir, "patch.json", &String::from_utf8_lossy(&diff_output.stdout));

    let apply_output = weft(&["apply", old.to_str().unwrap(), patch.to_str().unwrap()]);
    let result = stdout_json(&apply_output);

    let expected: serde_json::Value = serde_json::from_str(new_doc).unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_cli_apply_rejects_patch_that_does_not_fit() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", r#"{"a": 1}"#);
    let patch = write(
        &dir,
        "patch.json",
        r#"{"ops": [{"op": "remove", "path": "/missing"}]}"#,
    );

    let output = weft(&["apply", base.to_str().unwrap(), patch.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("/missing"), "stderr: {}", stderr);
}

#[test]
fn test_cli_diff_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let new = write(&dir, "new.json", "{}");
    let missing = dir.path().join("nope.json");

    let output = weft(&["diff", missing.to_str().unwrap(), new.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_IO"));
}

#[test]
fn test_cli_json_log_format_is_accepted() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", r#"[1, 2]"#);

    let output = weft(&[
        "--log-format",
        "json",
        "diff",
        doc.to_str().unwrap(),
        doc.to_str().unwrap(),
    ]);
    let patch = stdout_json(&output);

    assert_eq!(patch["ops"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_cli_diff_and_apply_share_output_flag() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", r#"{"a": 1, "b": [true]}"#);
    let patch = write(
        &dir,
        "patch.json",
        r#"{"ops": [{"op": "replace", "path": "/a", "value": 2}]}"#,
    );

    for command in ["diff", "apply"] {
        let second = if command == "diff" { &base } else { &patch };
        let compact = weft(&[command, base.to_str().unwrap(), second.to_str().unwrap()]);
        let pretty = weft(&[
            command,
            base.to_str().unwrap(),
            second.to_str().unwrap(),
            "--pretty",
        ]);

        assert_eq!(
            String::from_utf8_lossy(&compact.stdout).trim_end().lines().count(),
            1,
            "{} prints one line by default",
            command
        );
        assert!(String::from_utf8_lossy(&pretty.stdout).lines().count() > 1);
        assert_eq!(stdout_json(&compact), stdout_json(&pretty));
    }
}
