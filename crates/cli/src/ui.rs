//! User interface functions for the CLI.
//! Contains helpers for displaying headers, listings, and other visual elements.

use colored::*;
use engine::Check;
use ir::Risk;
use std::env;
use std::io::{self, Write};

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    // Avoid panics when the version exceeds the expected width
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │         ASSERTS  CODE  SCANNER       │
    │                                      │
    │     Grammar based checks for         │
    │     multi-language sources           │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

/// Check if colored output should be used
fn use_colored_output() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" || term == "unknown" {
            return false;
        }
    }
    if env::var("CI").is_ok() || env::var("CONTINUOUS_INTEGRATION").is_ok() {
        return false;
    }
    true
}

fn risk_label(risk: Risk) -> String {
    let text = format!("{:<6}", risk.to_string());
    if !use_colored_output() {
        return text;
    }
    match risk {
        Risk::Low => text.green().to_string(),
        Risk::Medium => text.yellow().to_string(),
        Risk::High => text.bright_red().bold().to_string(),
    }
}

/// One line per check: id, risk and description.
pub fn write_check_list<W: Write>(out: &mut W, checks: &[Check]) -> io::Result<()> {
    let width = checks.iter().map(|c| c.id.len()).max().unwrap_or(0);
    for c in checks {
        writeln!(
            out,
            "{:<width$}  {}  {}",
            c.id,
            risk_label(c.risk),
            c.description
        )?;
    }
    writeln!(out, "\n{} checks", checks.len())
}
