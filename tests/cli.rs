// ABOUTME: Integration tests for the arangodeploy CLI commands.
// ABOUTME: Validates --help output, init, status and plan checking.

use arangodeploy::api::{ActionRecord, ActionType, ArangoDeployment, DeploymentSpec, MemberStatus};
use arangodeploy::store::FileStatusStore;
use arangodeploy::types::{DeploymentMode, ServerGroup};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn arangodeploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("arangodeploy"))
}

/// Config plus a resource with one dbserver and the given plan.
fn project(dir: &Path, plan: Vec<ActionRecord>) {
    fs::write(dir.join("arangodeploy.yml"), "resource: deployment.yaml\n").unwrap();
    let mut d = ArangoDeployment::new("db", DeploymentSpec::new(DeploymentMode::Cluster));
    d.status.members.dbservers.push(MemberStatus::new("PRMR-1"));
    d.status.plan = plan;
    FileStatusStore::create(dir.join("deployment.yaml"), d).unwrap();
}

#[test]
fn help_shows_commands() {
    arangodeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn init_creates_config_and_resource() {
    let temp_dir = tempfile::tempdir().unwrap();

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--name", "db", "--mode", "Single"])
        .assert()
        .success();

    let config = fs::read_to_string(temp_dir.path().join("arangodeploy.yml")).unwrap();
    assert!(config.contains("endpoints:"));
    let resource = fs::read_to_string(temp_dir.path().join("deployment.yaml")).unwrap();
    assert!(resource.contains("Single"));
}

#[test]
fn init_rejects_unknown_mode() {
    let temp_dir = tempfile::tempdir().unwrap();

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--mode", "ActiveFailover"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown deployment mode"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("arangodeploy.yml"), "{}").unwrap();

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn status_lists_members_and_plan() {
    let temp_dir = tempfile::tempdir().unwrap();
    project(
        temp_dir.path(),
        vec![ActionRecord::new(
            "a1",
            ActionType::CleanOutMember,
            ServerGroup::DBServers,
            "PRMR-1",
        )],
    );

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRMR-1"))
        .stdout(predicate::str::contains("CleanOutMember"));
}

#[test]
fn status_json_is_machine_readable() {
    let temp_dir = tempfile::tempdir().unwrap();
    project(temp_dir.path(), Vec::new());

    let out = arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["event"], "status");
    assert_eq!(first["data"]["name"], "db");
}

#[test]
fn check_accepts_known_plan() {
    let temp_dir = tempfile::tempdir().unwrap();
    project(
        temp_dir.path(),
        vec![ActionRecord::new(
            "a1",
            ActionType::ShutdownMember,
            ServerGroup::DBServers,
            "PRMR-1",
        )],
    );

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn check_fails_on_unknown_action_type() {
    let temp_dir = tempfile::tempdir().unwrap();
    project(
        temp_dir.path(),
        vec![ActionRecord::new(
            "a1",
            ActionType::from("ResizeMember".to_string()),
            ServerGroup::DBServers,
            "PRMR-1",
        )],
    );

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ResizeMember"));
}

#[test]
fn commands_without_config_fail() {
    let temp_dir = tempfile::tempdir().unwrap();

    arangodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}
