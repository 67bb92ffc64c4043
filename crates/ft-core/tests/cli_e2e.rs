//! CLI E2E tests for the `ft-core` binary.
//!
//! Validates:
//! - `run` produces a JSON report with the expected thresholds
//! - `--cost-ratio` overrides the configured ratio
//! - `--format summary` emits one tab-separated line per facet and strategy
//! - config errors, unreadable inputs and bad bundles map to distinct exit codes
//! - `validate-config` and `schema` subcommands

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

/// Command for the ft-core binary, isolated from the user's config.
fn ft_core(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("ft-core");
    cmd.timeout(Duration::from_secs(60))
        .env_remove("FT_CONFIG")
        .env_remove("FT_LOG")
        .env("XDG_CONFIG_HOME", home)
        .env("HOME", home);
    cmd
}

const SCORES: [(&str, &str, f64); 9] = [
    ("a", "1", 0.86),
    ("b", "1", 0.76),
    ("c", "1", 0.74),
    ("d", "1", 0.71),
    ("e", "1", 0.05),
    ("f", "0", 0.86),
    ("g", "0", 0.80),
    ("h", "0", 0.30),
    ("i", "0", 0.10),
];

fn bundle() -> Value {
    let examples: Vec<Value> = SCORES
        .iter()
        .map(|(s, label, _)| json!({"id": format!("ex-{s}"), "data": {"sentence": s, "label": label}}))
        .collect();
    let outputs: Vec<Value> = SCORES
        .iter()
        .map(|(_, _, p)| json!({"probas": [1.0 - p, p]}))
        .collect();
    json!({
        "examples": examples,
        "dataset_spec": {
            "sentence": {"type": "TextSegment"},
            "label": {"type": "CategoryLabel", "vocab": ["0", "1"]}
        },
        "output_spec": [
            {"name": "probas", "type": "MulticlassPreds", "vocab": ["0", "1"], "parent": "label", "null_idx": 0}
        ],
        "model_outputs": outputs
    })
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn write_bundle(dir: &TempDir, bundle: &Value) -> PathBuf {
    write_file(dir, "bundle.json", &bundle.to_string())
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().code(0).get_output().stdout.clone();
    serde_json::from_slice(&output).expect("parse JSON report")
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_default_report() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());

    let report = run_json(ft_core(dir.path()).args(["run", "--input"]).arg(&input));

    assert_eq!(report["schema_version"], "1.0.0");
    assert!(report["run_id"].as_str().unwrap().starts_with("run-"));
    assert_eq!(report["cost_ratio"], 1.0);
    let result = &report["results"][0];
    assert_eq!(result["pred_key"], "probas");
    assert_eq!(result["thresholds"][""]["Single"], 0.71);
    assert_eq!(result["thresholds"][""]["Individual"], 0.71);
    assert_eq!(result["thresholds"][""]["Demographic parity"], 0.71);
    assert_eq!(result["evaluations"][""]["Single"]["fn"], 1);
}

#[test]
fn test_run_cost_ratio_override() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());

    let report = run_json(
        ft_core(dir.path())
            .args(["run", "--cost-ratio", "5", "--input"])
            .arg(&input),
    );

    assert_eq!(report["cost_ratio"], 5.0);
    assert_eq!(report["results"][0]["thresholds"][""]["Single"], 0.86);
}

#[test]
fn test_run_with_toml_facets() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());
    let config = write_file(
        &dir,
        "config.toml",
        r#"
cost_ratio = 1.0

[facets."label:0"]
ids = ["ex-f", "ex-g", "ex-h", "ex-i"]

[facets."label:1"]
ids = ["ex-a", "ex-b", "ex-c", "ex-d", "ex-e"]
"#,
    );

    let report = run_json(
        ft_core(dir.path())
            .args(["run", "--input"])
            .arg(&input)
            .arg("--config")
            .arg(&config),
    );

    let thresholds = &report["results"][0]["thresholds"];
    assert_eq!(thresholds["label:0"]["Single"], 0.71);
    assert_eq!(thresholds["label:0"]["Individual"], 0.86);
    assert_eq!(thresholds["label:1"]["Individual"], 0.0);
    assert_eq!(thresholds["label:0"]["Demographic parity"], 0.0);
    assert!(thresholds.get("").is_none());
}

#[test]
fn test_run_summary_format() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());

    ft_core(dir.path())
        .args(["run", "--format", "summary", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("probas\t(all)\tSingle\t0.71"))
        .stdout(predicate::str::contains("Demographic parity"));
}

#[test]
fn test_run_config_from_env() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());
    let config = write_file(&dir, "ratio.json", r#"{"cost_ratio": 0.2}"#);

    let report = run_json(
        ft_core(dir.path())
            .env("FT_CONFIG", &config)
            .args(["run", "--input"])
            .arg(&input),
    );

    assert_eq!(report["results"][0]["thresholds"][""]["Single"], 0.0);
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_invalid_cost_ratio_exits_config_error() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());

    ft_core(dir.path())
        .args(["run", "--cost-ratio", "0", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("cost ratio"));
}

#[test]
fn test_malformed_config_exits_config_error() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());
    let config = write_file(&dir, "broken.json", "{ not json");

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_missing_input_exits_io_error() {
    let dir = tempdir().unwrap();

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .code(13)
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_unknown_label_is_rejected() {
    let dir = tempdir().unwrap();
    let mut bundle = bundle();
    bundle["examples"][0]["data"]["label"] = json!("maybe");
    let input = write_bundle(&dir, &bundle);

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("maybe"));
}

#[test]
fn test_unknown_facet_member_exits_config_error() {
    let dir = tempdir().unwrap();
    let input = write_bundle(&dir, &bundle());
    let config = write_file(&dir, "ghost.json", r#"{"facets": {"ghost": {"ids": ["ex-z"]}}}"#);

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("ex-z"));
}

#[test]
fn test_unparseable_bundle_exits_data_error() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "bundle.json", r#"{"examples": "not a list"}"#);

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("invalid input bundle"));
}

#[test]
fn test_truncated_bundle_exits_data_error() {
    let dir = tempdir().unwrap();
    let mut bundle = bundle();
    bundle["model_outputs"][3] = json!({"probas": [0.5]});
    let input = write_bundle(&dir, &bundle);

    ft_core(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("probas"));
}

// ============================================================================
// validate-config / schema
// ============================================================================

#[test]
fn test_validate_config_defaults() {
    let dir = tempdir().unwrap();

    ft_core(dir.path())
        .arg("validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("cost_ratio=1"))
        .stdout(predicate::str::contains("source=Defaults"));
}

#[test]
fn test_validate_config_rejects_empty_grid() {
    let dir = tempdir().unwrap();
    let config = write_file(
        &dir,
        "grid.toml",
        "[candidates]\nuniform = { steps = 0 }\n",
    );

    ft_core(dir.path())
        .arg("validate-config")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_schema_config() {
    let dir = tempdir().unwrap();
    let schema = run_json(ft_core(dir.path()).args(["schema", "config"]));
    assert!(schema["properties"]["cost_ratio"].is_object());
    assert!(schema["properties"]["facets"].is_object());
}

#[test]
fn test_schema_report() {
    let dir = tempdir().unwrap();
    let schema = run_json(ft_core(dir.path()).args(["schema", "report"]));
    assert!(schema["properties"]["results"].is_object());
}
