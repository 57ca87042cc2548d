use anyhow::{anyhow, Result};
use colored::*;
use std::io;
use std::path::Path;

use crate::ui;

/// Prints the built-in checks, optionally only those of one language.
pub fn list_checks(language: Option<&str>) -> Result<()> {
    let checks = match language {
        Some(name) => {
            let lang = loader::LanguageSpec::by_name(name)
                .ok_or_else(|| anyhow!("unknown language: {name}"))?;
            checks::for_language(&lang)?
        }
        None => checks::catalog()?,
    };
    let mut out = io::stdout();
    ui::write_check_list(&mut out, &checks)?;
    Ok(())
}

/// Loads every rule file under `path` and reports what compiled.
pub fn verify_rules(path: &Path) -> Result<()> {
    println!("{}", "Verifying rules...".bright_blue().bold());
    println!("Path: {}", path.display().to_string().bright_white());
    let rules = loader::load_rules(path)?;
    if rules.is_empty() {
        println!("{}", "No rules found".bright_yellow());
        return Ok(());
    }
    println!();
    for rule in &rules {
        println!(
            "  {} {} {}",
            "•".bright_white(),
            rule.id.bright_white(),
            format!("({})", rule.source_file.display()).dimmed()
        );
    }
    println!();
    println!(
        "{} {} rules compiled",
        "✔".bright_green(),
        rules.len().to_string().bright_green().bold()
    );
    Ok(())
}
