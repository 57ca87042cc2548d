//! Formatters for check reports in text, JSON and SARIF.
//! Provide human and tool-friendly output.

use ir::{CheckReport, Risk, Status, Unit};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

mod sarif;

/// Returns the status colored with simple ANSI codes.
fn color_status(status: Status) -> String {
    let code = match status {
        Status::Open => "\x1b[31m",
        Status::Closed => "\x1b[32m",
        Status::Unknown => "\x1b[33m",
    };
    format!("{code}{status}\x1b[0m")
}

fn color_risk(risk: Risk) -> String {
    let code = match risk {
        Risk::Low => "\x1b[32m",
        Risk::Medium => "\x1b[33m",
        Risk::High => "\x1b[31m",
    };
    format!("{code}{risk}\x1b[0m")
}

fn simple_box(title: &str) -> String {
    let width = title.chars().count() + 2;
    format!(
        "╭{}╮\n│ {} │\n╰{}╯\n",
        "─".repeat(width),
        title,
        "─".repeat(width)
    )
}

/// `path: 3, 7` or just `path` for file-level evidence.
fn evidence(unit: &Unit) -> String {
    if unit.specific.iter().all(|l| *l == 0) {
        return unit.location.clone();
    }
    let lines: Vec<String> = unit.specific.iter().map(|l| l.to_string()).collect();
    format!("{}: {}", unit.location, lines.join(", "))
}

fn create_stats(info: &ScanInfo, counts: &Counts) -> String {
    let mut output = simple_box("Scan Status");
    output.push('\n');
    output.push_str(&format!(
        "    Ran {} checks over {} files in {}ms\n",
        info.checks_run, info.files_read, info.duration_ms
    ));
    output.push_str(&format!(
        "    Open {}   Closed {}   Unknown {}\n",
        counts.open, counts.closed, counts.unknown
    ));
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported formats for printing reports.
pub enum Format {
    /// Human-readable output in plain text.
    Text,
    /// JSON structure for integrations.
    Json,
    /// Report conforming to the SARIF specification.
    Sarif,
}

#[derive(Serialize)]
/// Simple wrapper used when serialising to JSON.
struct ReportsOut<'a> {
    reports: &'a [CheckReport],
    open: usize,
}

/// Figures shown above the text report.
#[derive(Debug, Clone, Default)]
pub struct ScanInfo {
    pub checks_run: usize,
    pub files_read: usize,
    pub duration_ms: u64,
}

#[derive(Default)]
struct Counts {
    open: usize,
    closed: usize,
    unknown: usize,
}

impl Counts {
    fn of(reports: &[CheckReport]) -> Self {
        let mut counts = Self::default();
        for r in reports {
            match r.result.status {
                Status::Open => counts.open += 1,
                Status::Closed => counts.closed += 1,
                Status::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

/// Prints reports to stdout in the selected format.
///
/// # Example
/// ```
/// use reporters::{print_reports, Format, ScanInfo};
/// let info = ScanInfo { checks_run: 3, files_read: 10, duration_ms: 12 };
/// print_reports(&[], Format::Text, Some(&info)).unwrap();
/// ```
pub fn print_reports(
    reports: &[CheckReport],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    let mut out = io::stdout();
    write_reports(&mut out, reports, fmt, scan_info)
}

/// Writes reports to a generic `Write`, used for tests.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[CheckReport],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    debug!(reports = reports.len(), format = ?fmt, "Writing reports");
    let counts = Counts::of(reports);
    match fmt {
        Format::Text => {
            if let Some(info) = scan_info {
                writeln!(out, "{}", create_stats(info, &counts))?;
            }
            writeln!(out, "{}", simple_box("Results"))?;
            if counts.open == 0 {
                writeln!(out, "✔ No open findings.")?;
            } else {
                writeln!(out, "⚠ {} check(s) open:\n", counts.open)?;
            }
            for r in reports.iter().filter(|r| r.result.status != Status::Closed) {
                writeln!(
                    out,
                    "{} {} {}",
                    color_status(r.result.status),
                    color_risk(r.risk),
                    r.id
                )?;
                writeln!(out, "    {}", r.result.message)?;
                for unit in &r.result.vulnerabilities {
                    writeln!(out, "    ↳  {}", evidence(unit))?;
                }
                writeln!(out)?;
            }
            writeln!(
                out,
                "Total: {} open, {} closed, {} unknown",
                counts.open, counts.closed, counts.unknown
            )?;
        }
        Format::Json => {
            let json = ReportsOut {
                reports,
                open: counts.open,
            };
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
        }
        Format::Sarif => {
            let sarif = sarif::to_sarif(reports);
            serde_json::to_writer_pretty(&mut *out, &sarif)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
