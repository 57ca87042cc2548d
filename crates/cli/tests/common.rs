#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Command with `HOME` pointed at an empty directory so no user config leaks in.
pub fn asserts(home: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("asserts")?;
    cmd.env("HOME", home).env("NO_COLOR", "1");
    Ok(cmd)
}

pub fn java_tree() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("src"))?;
    fs::write(
        dir.path().join("src/App.java"),
        "class App {\n  void stop() {\n    System.exit(1);\n  }\n}\n",
    )?;
    fs::write(
        dir.path().join("src/Util.java"),
        "class Util {\n  // System.exit(0);\n}\n",
    )?;
    Ok(dir)
}
