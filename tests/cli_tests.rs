#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::temp_files::descriptor_file;
use std::process::Command;

fn resmodel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_resmodel"));
    cmd.env_remove("RESMODEL_TAGS")
        .env_remove("RUST_LOG")
        .env("RESMODEL_LOG_LEVEL", "error");
    cmd
}

#[test]
fn test_cli_inspect_json_to_stdout() {
    let demo = common::demo_path();
    let output = resmodel()
        .args(["inspect", "--format", "json", "--class", "Colours", "--classes"])
        .arg(&demo)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let methods = value["resources"][0]["resource_methods"].as_array().unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[1]["produces"][0], "application/json");
}

#[test]
fn test_cli_unknown_class_exits_non_zero() {
    let demo = common::demo_path();
    let output = resmodel()
        .args(["inspect", "--class", "Nope", "--classes"])
        .arg(&demo)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown class: Nope"));
}

#[test]
fn test_cli_alternate_tag_table() {
    let classes = descriptor_file(
        r#"
classes:
  - name: Alt
    tags: [ { kind: Route, value: /alt } ]
    methods:
      - name: get
        tags: [ { kind: GET } ]
        parameters:
          - { type: String, tags: [ { kind: Q, value: term } ] }
"#,
        "yaml",
    );
    let tags = descriptor_file("path = \"Route\"\n\n[sources]\nQ = \"query\"\n", "toml");
    let output = resmodel()
        .args(["inspect", "--classes"])
        .arg(classes.path())
        .arg("--tags")
        .arg(tags.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("root resource Alt at /alt"));
    assert!(stdout.contains("QUERY(term) String"));
}

#[test]
fn test_cli_tag_table_from_env() {
    let classes = descriptor_file(
        "classes:\n  - name: Alt\n    tags: [ { kind: Route, value: /alt } ]\n",
        "yaml",
    );
    let tags = descriptor_file("path = \"Route\"\n", "toml");
    let output = resmodel()
        .env("RESMODEL_TAGS", tags.path())
        .args(["list", "--classes"])
        .arg(classes.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "root  Alt /alt");
}

#[test]
fn test_cli_bad_tag_table_fails() {
    let demo = common::demo_path();
    let tags = descriptor_file("[sources]\nBody = \"entity\"\n", "toml");
    let output = resmodel()
        .args(["list", "--classes"])
        .arg(&demo)
        .arg("--tags")
        .arg(tags.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
}
