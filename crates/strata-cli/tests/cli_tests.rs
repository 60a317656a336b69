//! End-to-end tests for the `strata` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"
id = "shop"
name = "shop"
namespace = "com.example.shop"
processor = "rust-workspace"
features = ["license.mit"]

[[layers]]
id = "core"
name = "core"
features = ["quality.rustfmt"]
"#;

fn strata(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("strata").unwrap();
    cmd.current_dir(dir)
        .env_remove("STRATA_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace_with_manifest() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("strata.toml"), MANIFEST).unwrap();
    dir
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("presets"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    strata(dir.path()).arg("frobnicate").assert().code(2);
}

#[test]
fn list_prints_template_ids() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("rust-workspace"));
}

#[test]
fn presets_render_as_manifest() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .args(["presets", "rust-workspace", "--name", "full", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("processor = \"rust-workspace\""))
        .stdout(predicate::str::contains("license.mit"));
}

#[test]
fn unknown_preset_is_not_found() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .args(["presets", "app", "--name", "huge"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("huge"));
}

#[test]
fn generate_writes_the_layer_tree() {
    let dir = workspace_with_manifest();
    let out = dir.path().join("out");

    strata(dir.path())
        .args(["generate", "strata.toml", "-o"])
        .arg(&out)
        .assert()
        .success();

    let root = fs::read_to_string(out.join("Cargo.toml")).unwrap();
    assert!(root.contains("[workspace]"));
    assert!(out.join("core").join("Cargo.toml").is_file());
    assert!(out.join("LICENSE").is_file());
    assert!(out.join("README.md").is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace_with_manifest();
    let out = dir.path().join("out");

    strata(dir.path())
        .args(["generate", "--dry-run", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("cargo.manifest"));

    assert!(!out.exists());
}

#[test]
fn missing_manifest_exits_not_found() {
    let dir = TempDir::new().unwrap();
    strata(dir.path())
        .args(["generate", "absent.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn non_empty_output_requires_force() {
    let dir = workspace_with_manifest();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("keep.txt"), "mine").unwrap();

    strata(dir.path())
        .args(["generate", "-y", "-o"])
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not empty"));

    strata(dir.path())
        .args(["generate", "--force", "-o"])
        .arg(&out)
        .assert()
        .success();
    assert!(out.join("keep.txt").is_file());
    assert!(out.join("Cargo.toml").is_file());
}

#[test]
fn invalid_manifest_is_a_user_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("strata.toml"), "id = \"x\"\nbogus = 1\n").unwrap();

    strata(dir.path()).arg("generate").assert().code(2);
}

#[test]
fn config_get_reads_local_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".strata.toml"),
        "[defaults]\ntemplate = \"rust-workspace\"\n",
    )
    .unwrap();

    strata(dir.path())
        .args(["config", "get", "defaults.template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-workspace"));
}
