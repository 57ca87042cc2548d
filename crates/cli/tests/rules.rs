use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

mod common;
use common::{asserts, java_tree};

const RULES: &str = "rules:\n- id: custom.todo\n  pattern: TODO\n  message: Code has TODO markers\n  risk: low\n";

#[test]
fn custom_rules_run_with_the_scan() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let tree = java_tree()?;
    fs::write(tree.path().join("notes.txt"), "first\nTODO: rotate keys\n")?;
    let rules = tempfile::tempdir()?;
    fs::write(rules.path().join("todo.yaml"), RULES)?;
    let out = asserts(home.path())?
        .args(["scan", "--check", "custom.todo", "--format", "json", "--quiet"])
        .arg("--rules")
        .arg(rules.path())
        .arg(tree.path())
        .output()?;
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(v["reports"].as_array().unwrap().len(), 1);
    assert_eq!(v["reports"][0]["status"], "OPEN");
    assert_eq!(
        v["reports"][0]["vulnerabilities"][0]["specific"],
        serde_json::json!([2])
    );
    Ok(())
}

#[test]
fn rule_colliding_with_builtin_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let tree = java_tree()?;
    let rules = tempfile::tempdir()?;
    fs::write(
        rules.path().join("dup.yml"),
        "rules:\n- id: java.uses_system_exit\n  pattern: exit\n  message: m\n",
    )?;
    asserts(home.path())?
        .args(["scan", "--quiet"])
        .arg("--rules")
        .arg(rules.path())
        .arg(tree.path())
        .assert()
        .failure()
        .stderr(contains("duplicate check id"));
    Ok(())
}

#[test]
fn verify_lists_compiled_rules() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let rules = tempfile::tempdir()?;
    fs::write(rules.path().join("todo.yaml"), RULES)?;
    asserts(home.path())?
        .args(["rules", "verify"])
        .arg(rules.path())
        .assert()
        .success()
        .stdout(contains("custom.todo").and(contains("1 rules compiled")));
    Ok(())
}

#[test]
fn verify_reports_broken_rules() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let rules = tempfile::tempdir()?;
    fs::write(
        rules.path().join("bad.yaml"),
        "rules:\n- id: bad\n  pattern: \"(\"\n  regex: true\n  message: m\n",
    )?;
    asserts(home.path())?
        .args(["rules", "verify"])
        .arg(rules.path())
        .assert()
        .failure()
        .stderr(contains("Invalid rule 'bad'"));
    Ok(())
}
