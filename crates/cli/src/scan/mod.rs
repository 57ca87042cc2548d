use anyhow::{bail, Context, Result};
use engine::{Check, SourceCache};
use ir::{CheckReport, Status};
use loader::LanguageSpec;
use std::collections::HashSet;
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};

use crate::args::ScanArgs;
use crate::config::{load_config, Config};
use crate::output::{print_reports, Format};
use crate::ui;

/// Entry point for `asserts scan`.
pub fn run_scan(args: ScanArgs) -> Result<()> {
    let level = if args.quiet {
        LevelFilter::OFF
    } else if args.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    if args.debug && !args.quiet {
        debug!("Debug mode enabled");
    }
    if args.format == Format::Text && !args.quiet {
        ui::print_header();
    }

    let start_time = Instant::now();
    let cfg = load_config()?;
    // Missing targets are reported as UNKNOWN by each check
    let path = args.path.as_path();
    info!(target = %path.display(), "Scan started");

    let selected = select_checks(&args, &cfg)?;
    info!(count = selected.len(), "Checks loaded");

    let exclude: Vec<String> = cfg
        .scan
        .exclude
        .iter()
        .chain(&args.exclude)
        .cloned()
        .collect();
    debug!(excludes = exclude.len(), "Exclusions collected");

    let mut cache = SourceCache::new();
    let mut reports = Vec::with_capacity(selected.len());
    for check in &selected {
        let report = check
            .report(path, &exclude, &mut cache)
            .with_context(|| format!("check {} failed", check.id))?;
        if report.result.status == Status::Unknown {
            warn!(check = %check.id, message = %report.result.message, "Check could not run");
        }
        reports.push(report);
    }
    let (hits, misses) = cache.stats();
    debug!(hits, misses, "Source cache");

    let scan_info = reporters::ScanInfo {
        checks_run: selected.len(),
        files_read: cache.len(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    print_reports(&reports, args.format, &scan_info)?;

    if let Some(threshold) = args.fail_on {
        if fails(&reports, threshold) {
            std::process::exit(1);
        }
    }
    info!(
        checks = reports.len(),
        open = reports.iter().filter(|r| r.result.is_open()).count(),
        "Scan completed"
    );
    Ok(())
}

/// True when an open report is at or above `threshold`.
fn fails(reports: &[CheckReport], threshold: ir::Risk) -> bool {
    reports
        .iter()
        .any(|r| r.result.is_open() && r.risk >= threshold)
}

/// Built-in checks narrowed by `--language` and `--check`, followed by the
/// checks compiled from rule files.
fn select_checks(args: &ScanArgs, cfg: &Config) -> Result<Vec<Check>> {
    let mut selected = if args.languages.is_empty() {
        checks::catalog()?
    } else {
        let mut by_lang = Vec::new();
        for name in &args.languages {
            let Some(lang) = LanguageSpec::by_name(name) else {
                bail!("unknown language: {name}");
            };
            by_lang.extend(checks::for_language(&lang)?);
        }
        by_lang
    };

    let mut rule_paths: Vec<_> = cfg.rules.rule_files.clone();
    rule_paths.extend(args.rules.clone());
    let mut custom = Vec::new();
    for rp in &rule_paths {
        let rules = loader::load_rules(rp)
            .with_context(|| format!("failed to load rules from {}", rp.display()))?;
        info!(path = %rp.display(), count = rules.len(), "Rules loaded");
        custom.extend(rules.iter().map(Check::from_rule));
    }

    if !args.checks.is_empty() {
        let wanted: HashSet<&str> = args.checks.iter().map(String::as_str).collect();
        for id in &wanted {
            let known = selected.iter().chain(&custom).any(|c| c.id == *id);
            if !known && checks::find(id)?.is_none() {
                bail!("unknown check: {id}");
            }
        }
        // Named checks run even when --language would have left them out
        let mut named = Vec::new();
        for id in &args.checks {
            if let Some(c) = selected.iter().chain(&custom).find(|c| c.id == *id) {
                named.push(c.clone());
            } else if let Some(c) = checks::find(id)? {
                named.push(c);
            }
        }
        let mut seen = HashSet::new();
        named.retain(|c| seen.insert(c.id.clone()));
        return Ok(named);
    }

    let mut ids: HashSet<String> = selected.iter().map(|c| c.id.clone()).collect();
    for c in custom {
        if !ids.insert(c.id.clone()) {
            bail!("duplicate check id: {}", c.id);
        }
        selected.push(c);
    }
    Ok(selected)
}
