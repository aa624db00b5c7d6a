//! CLI integration tests: run the apiviz binary against a descriptor file.
//! Uses CARGO_BIN_EXE_apiviz when set (e.g. by `cargo test`).

use std::path::{Path, PathBuf};
use std::process::Command;

const DESCRIPTORS: &str = r#"{
    "types": [
        {"qualified_name": "zoo.Animal", "is_abstract": true},
        {"qualified_name": "zoo.Pet", "kind": "interface"},
        {"qualified_name": "zoo.Cat", "superclass": "zoo.Animal", "interfaces": ["zoo.Pet"]},
        {"qualified_name": "zoo.care.Keeper",
         "references": ["zoo.Cat"],
         "tags": {"@apiviz.owns": ["zoo.Cat - 0..* cats"], "@apiviz.category": ["staff"]}}
    ],
    "packages": [{"name": "zoo"}]
}"#;

fn bin() -> Option<PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_apiviz").map(PathBuf::from)
}

fn write_descriptors(dir: &Path) -> PathBuf {
    let path = dir.join("descriptors.json");
    std::fs::write(&path, DESCRIPTORS).unwrap();
    path
}

#[test]
fn test_cli_help_succeeds() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin).arg("--help").output().expect("run --help");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("overview"));
}

#[test]
fn test_cli_generate_writes_every_diagram() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptors(dir.path());
    let output = dir.path().join("out");

    let out = Command::new(&bin)
        .arg("generate")
        .arg(&descriptors)
        .arg("--output")
        .arg(&output)
        .args(["--validate", "--report"])
        .output()
        .expect("run generate");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    for file in [
        "overview-summary.dot",
        "zoo/package-summary.dot",
        "zoo/care/package-summary.dot",
        "zoo/Cat.dot",
        "zoo/care/Keeper.dot",
    ] {
        assert!(output.join(file).is_file(), "{} written", file);
    }

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["diagrams"].as_array().unwrap().len(), 7);
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 0);
    assert_eq!(report["categories"][0]["name"], "staff");
}

#[test]
fn test_cli_class_prints_dot() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptors(dir.path());

    let out = Command::new(&bin)
        .arg("class")
        .arg(&descriptors)
        .arg("zoo.Cat")
        .output()
        .expect("run class");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("digraph APIVIZ {"));
    assert!(stdout.contains("zoo_care_Keeper"));
}

#[test]
fn test_cli_unknown_class_fails() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptors(dir.path());

    let out = Command::new(&bin)
        .arg("class")
        .arg(&descriptors)
        .arg("zoo.Unicorn")
        .output()
        .expect("run class");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown type"));
}

#[test]
fn test_cli_missing_descriptor_file_fails() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(&bin)
        .args(["overview", "nonexistent_descriptors_12345.json"])
        .output()
        .expect("run overview");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to read input file"));
}

#[test]
fn test_cli_unreadable_couplings_fall_back() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptors(dir.path());
    let output = dir.path().join("out");

    let out = Command::new(&bin)
        .arg("generate")
        .arg(&descriptors)
        .arg("--output")
        .arg(&output)
        .args(["--couplings", "missing_couplings_12345.json", "--report"])
        .output()
        .expect("run generate");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["diagnostics"][0]["subject"], "couplings");
    assert!(output.join("overview-summary.dot").is_file());
}
