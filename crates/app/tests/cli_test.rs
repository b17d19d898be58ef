//! End-to-end tests driving the `cirrus` binary.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const SETTINGS: &str = r#"
ufshost = "ufs.example.com"

[s3]
host = "objects.example.com"
"#;

const FIXTURE: &str = r#"{
    "regions": [{"name": "east", "ec2_endpoint": "http://ufs.example.com:8773/services/compute"}],
    "instance_types": [
        {"name": "m1.small", "cores": 1, "memory": 256, "disk": 5},
        {"name": "c1.medium", "cores": 2, "memory": 512, "disk": 10}
    ],
    "faults": {
        "list_roles": {"status": 403, "code": "AccessDenied", "reason": "Forbidden"}
    }
}"#;

const RECORDS: &str = r#"[
    {"id": "vol-1", "status": "available", "size": 10},
    {"id": "vol-2", "status": "in-use", "size": 20},
    {"id": "vol-3", "status": "available", "size": 30}
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();
        fs::write(dir.path().join("fixture.json"), FIXTURE).unwrap();
        fs::write(dir.path().join("records.json"), RECORDS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> Output {
        cirrus(self.dir.path())
            .arg("--config")
            .arg(self.path("settings.toml"))
            .arg("--fixture")
            .arg(self.path("fixture.json"))
            .args(["--access-key", "AKID", "--secret-key", "secret"])
            .args(args)
            .output()
            .expect("Failed to run cirrus")
    }
}

fn cirrus(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cirrus"));
    command.current_dir(dir).env_clear();
    command
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "cirrus failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_endpoint_command() {
    let workspace = Workspace::new();
    let value = stdout_json(&workspace.run(&["endpoint", "s3"]));
    assert_eq!(value["url"], "http://objects.example.com:8773/services/objectstorage");
    assert_eq!(value["region"], "east");
    assert_eq!(value["cloud_flavor"], "euca");
}

#[test]
fn test_filter_command() {
    let workspace = Workspace::new();
    let records = workspace.path("records.json");
    let value = stdout_json(&workspace.run(&[
        "filter",
        &records,
        "--query",
        "status=available&sort=-size",
    ]));
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["vol-3", "vol-1"]);
}

#[test]
fn test_choices_command() {
    let workspace = Workspace::new();
    let value = stdout_json(&workspace.run(&["choices", "instance-types", "--no-blank"]));
    let keys: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["m1.small", "c1.medium"]);
}

#[test]
fn test_provider_fault_prints_outcome() {
    let workspace = Workspace::new();
    let output = workspace.run(&["choices", "roles"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(r#""outcome": "redirect""#), "{stderr}");
    assert!(stderr.contains(r#""location": "/login""#), "{stderr}");
}

#[test]
fn test_xhr_fault_is_user_notice() {
    let workspace = Workspace::new();
    let output = workspace.run(&["--xhr", "choices", "roles"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(r#""outcome": "user_notice""#), "{stderr}");
    assert!(stderr.contains(r#""status": 403"#), "{stderr}");
}

#[test]
fn test_missing_credentials_fail() {
    let workspace = Workspace::new();
    let output = cirrus(workspace.dir.path())
        .arg("--config")
        .arg(workspace.path("settings.toml"))
        .args(["endpoint", "ec2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
