//! Exit codes and suggestions for failing invocations.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn scaffold(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scaffold").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("SCAFFOLD_FEATURES__CONFIG_PATH")
        .env_remove("SCAFFOLD_TEMPLATES__DIR");
    cmd
}

#[test]
fn invalid_package_name_is_user_error() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["new", "Bad_Name", "--dry-run", "--root"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid package name 'Bad_Name'"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn hidden_package_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["new", ".hidden", "--dry-run", "--root"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot start with '.'"));
}

#[test]
fn refresh_missing_package_is_not_found() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["refresh", "--dry-run"])
        .arg(tmp.path().join("missing"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No package found"));
}

#[test]
fn missing_explicit_config_file_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["--config"])
        .arg(tmp.path().join("nope.toml"))
        .arg("presets")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn malformed_feature_config_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let features = tmp.path().join("features.json");
    fs::write(&features, "{ not json").unwrap();

    scaffold(&tmp)
        .env("SCAFFOLD_FEATURES__CONFIG_PATH", &features)
        .args(["features", "lib"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid feature config"));
}

#[test]
fn unknown_config_key() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["config", "get", "does.not.exist"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn verbose_flag_drops_hint() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .args(["-v", "config", "get", "does.not.exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -v / --verbose").not());
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp).arg("explode").assert().code(2);
}

#[test]
fn missing_templates_dir_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    scaffold(&tmp)
        .env("SCAFFOLD_TEMPLATES__DIR", tmp.path().join("no-templates"))
        .arg("check")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Failed to load templates"));
}
