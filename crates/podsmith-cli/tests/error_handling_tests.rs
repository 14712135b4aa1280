//! Exit codes and messages for failing commands.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn podsmith(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("podsmith");
    cmd.env("PODSMITH_HOME", home.path())
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

#[test]
fn invalid_module_name_is_a_user_error() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["create", "1bad"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must start with a letter"));
}

#[test]
fn unknown_config_key_is_not_found() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["config", "get", "cocoapods.nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cocoapods.nope"));
}

#[test]
fn removing_unknown_repo_is_not_found() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["repo", "remove", "Nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Nope"));
}

#[test]
fn default_repo_must_be_registered() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["config", "set", "spec_repos.default", "Ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Ghost"));
    podsmith(&home)
        .args(["config", "get", "spec_repos.default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ghost").not());
}

#[test]
fn invalid_repo_url_is_rejected() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["repo", "add", "Specs", "not a url"])
        .assert()
        .code(2);
}

#[test]
fn corrupt_config_falls_back_to_defaults() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.json"), "{ not json").unwrap();
    podsmith(&home)
        .args(["config", "get", "cocoapods.template_name"])
        .assert()
        .success()
        .stdout("NBTemplateModule\n");
}

#[test]
fn importing_corrupt_file_is_a_configuration_error() {
    let home = TempDir::new().unwrap();
    let bad = home.path().join("bad.json");
    std::fs::write(&bad, "[1, 2]").unwrap();
    podsmith(&home)
        .args(["config", "import"])
        .arg(&bad)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not a JSON object"));
}

#[test]
fn importing_missing_file_fails() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["config", "import", "nowhere.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.json"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    podsmith(&home).arg("frobnicate").assert().code(2);
}

#[test]
fn quiet_and_verbose_conflict() {
    let home = TempDir::new().unwrap();
    podsmith(&home)
        .args(["-q", "-v", "config", "path"])
        .assert()
        .code(2);
}
