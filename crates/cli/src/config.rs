use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("asserts")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("asserts")
}

fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ScanConfig {
    /// Substrings of paths that no scan ever reads.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct RuleConfig {
    /// Rule files or directories loaded on every scan.
    #[serde(default)]
    pub rule_files: Vec<PathBuf>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub rules: RuleConfig,
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_config(&content)
    } else {
        Ok(Config::default())
    }
}

fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("failed to parse config")
}
