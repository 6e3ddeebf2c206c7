#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn beacon(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("beacon").unwrap();
    cmd.current_dir(dir)
        .env_remove("GA4_ENABLED")
        .env_remove("BEACON_SEED")
        .env("RUST_LOG", "warn");
    cmd
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("missing {}", path.display()));
    serde_json::from_str(&raw).expect("invalid JSON")
}

/// Dated file name derived from the report's own `generated_on`.
fn dated(dir: &Path, kind: &str, ext: &str) -> std::path::PathBuf {
    let latest = read_json(&dir.join(kind).join("latest.json"));
    let day = latest["meta"]["generated_on"].as_str().unwrap().to_string();
    dir.join(kind).join(format!("{kind}-{day}.{ext}"))
}

#[test]
fn vitals_full_writes_dated_and_latest_files() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "42", "vitals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Core Web Vitals: overall"));

    let reports = dir.path().join("reports");
    for ext in ["json", "md", "html"] {
        assert!(dated(&reports, "vitals", ext).exists(), "missing dated .{ext}");
    }
    assert!(reports.join("vitals/latest.html").exists());
    assert!(!reports.join("vitals/latest.md").exists());

    let v = read_json(&reports.join("vitals/latest.json"));
    assert_eq!(v["meta"]["schema_version"], 1);
    assert_eq!(v["meta"]["kind"], "vitals");
    assert_eq!(v["meta"]["source"], "simulated");
    assert_eq!(v["meta"]["seed"], "42");
    assert_eq!(v["pages"].as_array().unwrap().len(), 5);
    assert_eq!(v["aggregates"].as_array().unwrap().len(), 6);

    let history = read_json(&reports.join("history.json"));
    assert_eq!(history.as_array().unwrap().len(), 1);

    let html = fs::read_to_string(reports.join("vitals/latest.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h2>History</h2>"));
}

#[test]
fn same_seed_reproduces_data() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    for dir in [a.path(), b.path()] {
        beacon(dir)
            .args(["--seed", "1234", "vitals", "--mode", "report"])
            .assert()
            .success();
    }
    let va = read_json(&a.path().join("reports/vitals/latest.json"));
    let vb = read_json(&b.path().join("reports/vitals/latest.json"));
    assert_eq!(va["pages"], vb["pages"]);
    assert_eq!(va["aggregates"], vb["aggregates"]);
    assert_ne!(va["meta"]["run_id"], vb["meta"]["run_id"]);
}

#[test]
fn history_is_capped_across_runs() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("beacon.yaml"),
        "version: 1\nhistory:\n  cap: 2\n",
    )
    .unwrap();
    for seed in ["1", "2", "3"] {
        beacon(dir.path())
            .args(["--seed", seed, "vitals", "--mode", "dashboard"])
            .assert()
            .success();
    }
    let history = read_json(&dir.path().join("reports/history.json"));
    assert_eq!(history.as_array().unwrap().len(), 2);
    // Dashboard mode writes HTML only.
    assert!(dir.path().join("reports/vitals/latest.html").exists());
    assert!(!dir.path().join("reports/vitals/latest.json").exists());
}

#[test]
fn analyze_and_alerts_modes_write_nothing() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "5", "vitals", "--mode", "analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pages,"));
    beacon(dir.path())
        .args(["--seed", "5", "vitals", "--mode", "alerts"])
        .assert()
        .success();
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn fail_on_critical_exits_one() {
    let dir = tempdir().unwrap();
    // Thresholds no simulated LCP can meet.
    fs::write(
        dir.path().join("strict.yaml"),
        "version: 1\nthresholds:\n  LCP:\n    good: 100\n    poor: 200\n",
    )
    .unwrap();
    beacon(dir.path())
        .args(["--config", "strict.yaml", "--seed", "7", "vitals", "--mode", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CRITICAL"));
    beacon(dir.path())
        .args([
            "--config",
            "strict.yaml",
            "--seed",
            "7",
            "vitals",
            "--mode",
            "analyze",
            "--fail-on-critical",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("critical alert(s)"));
}

#[test]
fn quality_gate_exit_codes() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "3", "quality", "--mode", "score", "--min-score", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quality score:"));
    beacon(dir.path())
        .args(["--seed", "3", "quality", "--min-score", "100"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("quality gate failed"));
    // Files are still written when the gate fails.
    let q = read_json(&dir.path().join("reports/quality/latest.json"));
    assert_eq!(q["gate"]["passed"], false);
}

#[test]
fn non_finite_min_score_exits_two() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "3", "quality", "--min-score", "NaN"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("min_score"));
    fs::write(
        dir.path().join("beacon.yaml"),
        "version: 1\nquality:\n  min_score: .nan\n",
    )
    .unwrap();
    beacon(dir.path())
        .args(["--seed", "3", "quality"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("min_score"));
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn missing_explicit_config_exits_two() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--config", "nope.yaml", "vitals"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal:").and(predicate::str::contains("nope.yaml")));
}

#[test]
fn invalid_thresholds_exit_two() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("beacon.yaml"),
        "version: 1\nthresholds:\n  CLS:\n    good: 0.5\n    poor: 0.1\n",
    )
    .unwrap();
    beacon(dir.path())
        .args(["vitals"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CLS"));
}

#[test]
fn unknown_config_field_exits_two() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("beacon.yaml"), "version: 1\nthreshold: {}\n").unwrap();
    beacon(dir.path()).args(["trends"]).assert().code(2);
}

#[test]
fn malformed_iterations_file_exits_three() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("its.json"), "[{\"number\": 1,").unwrap();
    beacon(dir.path())
        .args(["trends", "--iterations", "its.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid iterations JSON"));
}

#[test]
fn trends_from_iterations_file() {
    let dir = tempdir().unwrap();
    let iterations = serde_json::json!([
        {"number": 1, "date": "2026-01-05", "conversion_rate": 0.040, "quality_score": 80.0, "lcp_p75_ms": 2400.0},
        {"number": 2, "date": "2026-01-19", "conversion_rate": 0.036, "quality_score": 76.0, "lcp_p75_ms": 2900.0},
        {"number": 3, "date": "2026-02-02", "conversion_rate": 0.030, "quality_score": 72.0, "lcp_p75_ms": 3400.0, "changes": ["new hero"]}
    ]);
    fs::write(dir.path().join("its.json"), iterations.to_string()).unwrap();
    beacon(dir.path())
        .args(["trends", "--mode", "report", "--iterations", "its.json", "--format", "json"])
        .assert()
        .success();

    let t = read_json(&dir.path().join("reports/trends/latest.json"));
    let signals: Vec<&str> = t["signals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(signals.contains(&"conversion-declining"));
    assert!(signals.contains(&"performance-regressing"));
    assert_eq!(t["actions"][0]["priority"], "P0");
    assert!(t["meta"]["seed"].is_null());
    assert!(!dir.path().join("reports/trends/latest.html").exists());
}

#[test]
fn format_flag_restricts_output() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "8", "--format", "markdown", "experiments", "--mode", "report"])
        .assert()
        .success();
    let exp = dir.path().join("reports/experiments");
    let files: Vec<String> = fs::read_dir(&exp)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1, "{files:?}");
    assert!(files[0].starts_with("experiments-") && files[0].ends_with(".md"));
}

#[test]
fn out_dir_overrides_output_root() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "2", "--out-dir", "custom", "experiments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Experiments:"));
    assert!(dir.path().join("custom/experiments/latest.json").exists());
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn all_runs_every_report() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .args(["--seed", "99", "all"])
        .assert()
        .success();
    let reports = dir.path().join("reports");
    for kind in ["vitals", "experiments", "trends", "quality"] {
        assert!(reports.join(kind).join("latest.json").exists(), "{kind}");
        assert!(dated(&reports, kind, "md").exists(), "{kind}");
    }
    let history = read_json(&reports.join("history.json"));
    assert!(history[0]["quality_score"].is_number());

    let vitals = read_json(&reports.join("vitals/latest.json"));
    let quality = read_json(&reports.join("quality/latest.json"));
    assert_eq!(vitals["meta"]["run_id"], quality["meta"]["run_id"]);
}

#[test]
fn ga4_enabled_falls_back_to_simulation() {
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .env("GA4_ENABLED", "true")
        .env("GA4_PROPERTY_ID", "123456")
        .args(["--seed", "1", "vitals", "--mode", "analyze"])
        .assert()
        .success()
        .stderr(predicate::str::contains("falling back to simulated data"));
}

#[test]
fn ga4_enabled_accepts_numeric_and_word_flags() {
    for on in ["1", "yes", "on"] {
        let dir = tempdir().unwrap();
        beacon(dir.path())
            .env("GA4_ENABLED", on)
            .args(["--seed", "1", "vitals", "--mode", "analyze"])
            .assert()
            .success()
            .stderr(predicate::str::contains("falling back to simulated data"));
    }
    let dir = tempdir().unwrap();
    beacon(dir.path())
        .env("GA4_ENABLED", "0")
        .args(["--seed", "1", "vitals", "--mode", "analyze"])
        .assert()
        .success()
        .stderr(predicate::str::contains("falling back").not());
}
