//! Scan engine: applies grammars to every candidate file under a path and
//! folds the per-file evidence into a single verdict.

use grammar::Grammar;
use ir::{CheckResult, Messages, Status, Unit};
use loader::{LanguageSpec, PathNotFound, SourceFile};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

mod blocks;
mod cache;
mod check;
mod line_index;
mod suppress;

pub use blocks::{scan_blocks, BlockCheck, BlockRule};
pub use cache::SourceCache;
pub use check::{Check, Probe};
pub use line_index::LineIndex;
pub use suppress::{suppressed_lines, SUPPRESSION_MARKER};

/// Message of the UNKNOWN verdict for a missing target.
pub const FILE_NOT_FOUND: &str = "File does not exist";
/// Message when filtering left nothing to scan.
pub const NO_FILES_TESTED: &str = "No files were tested";

/// Matched lines of one file, suppression-filtered and in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub path: PathBuf,
    pub fingerprint: String,
    pub lines: Vec<usize>,
}

impl MatchResult {
    pub fn into_unit(self) -> Unit {
        let location = self.path.display().to_string();
        if self.lines.is_empty() {
            Unit::safe(location, self.fingerprint)
        } else {
            Unit::vulnerable(location, self.lines, self.fingerprint)
        }
    }
}

/// Drops suppressed lines and repeats, keeping first occurrences in order.
pub(crate) fn distinct_lines(mut lines: Vec<usize>, text: &str) -> Vec<usize> {
    let suppressed = suppressed_lines(text);
    lines.retain(|l| !suppressed.contains(l));
    let mut seen = HashSet::new();
    lines.retain(|l| seen.insert(*l));
    lines
}

/// Runs `grammar` over one loaded file.
pub fn scan_file(source: &SourceFile, grammar: &Grammar) -> MatchResult {
    let index = LineIndex::new(&source.text);
    let found: Vec<usize> = grammar
        .scan(&source.text)
        .map(|m| index.line_of(m.start))
        .collect();
    let lines = distinct_lines(found, &source.text);
    debug!(file = %source.path.display(), lines = ?lines, "File scanned");
    MatchResult {
        path: source.path.clone(),
        fingerprint: source.fingerprint.clone(),
        lines,
    }
}

/// Folds per-file units into a verdict: any vulnerable unit opens the
/// result; otherwise scanned files close it; with no files at all the result
/// is closed with [`NO_FILES_TESTED`].
pub fn aggregate(units: Vec<Unit>, messages: &Messages) -> CheckResult {
    let (vulnerabilities, safes): (Vec<Unit>, Vec<Unit>) =
        units.into_iter().partition(Unit::is_vulnerable);
    let (status, message) = if !vulnerabilities.is_empty() {
        (Status::Open, messages.open.clone())
    } else if !safes.is_empty() {
        (Status::Closed, messages.closed.clone())
    } else {
        (Status::Closed, NO_FILES_TESTED.to_string())
    };
    CheckResult {
        status,
        message,
        vulnerabilities,
        safes,
    }
}

/// Walks `path` and evaluates `per_file` on each candidate, reading sources
/// through `cache`. A missing path yields UNKNOWN; other failures propagate.
pub fn scan_with<F>(
    path: &Path,
    extensions: &[String],
    exclude: &[String],
    messages: &Messages,
    cache: &mut SourceCache,
    mut per_file: F,
) -> anyhow::Result<CheckResult>
where
    F: FnMut(&SourceFile) -> MatchResult,
{
    let files = match loader::paths(path, extensions, exclude) {
        Ok(files) => files,
        Err(e) if e.downcast_ref::<PathNotFound>().is_some() => {
            debug!(path = %path.display(), "Target missing");
            return Ok(CheckResult::unknown(FILE_NOT_FOUND));
        }
        Err(e) => return Err(e),
    };
    let mut units = Vec::new();
    for file in files {
        let file = file?;
        let source = cache.load(&file)?;
        units.push(per_file(source).into_unit());
    }
    Ok(aggregate(units, messages))
}

/// Scans every file under `path` accepted by `spec` and not excluded.
///
/// # Example
/// ```no_run
/// use grammar::{keyword, literal, sequence, Grammar};
/// use ir::{Messages, Status};
/// use std::path::Path;
///
/// let g = Grammar::new(sequence([literal("Math"), literal("."), keyword("random")])).unwrap();
/// let msgs = Messages::new("Insecure random", "No insecure random");
/// let res = engine::scan(Path::new("src"), &g, &loader::JAVA, &[], &msgs).unwrap();
/// assert_ne!(res.status, Status::Unknown);
/// ```
pub fn scan(
    path: &Path,
    grammar: &Grammar,
    spec: &LanguageSpec,
    exclude: &[String],
    messages: &Messages,
) -> anyhow::Result<CheckResult> {
    let mut cache = SourceCache::new();
    scan_with(
        path,
        &spec.extension_list(),
        exclude,
        messages,
        &mut cache,
        |src| scan_file(src, grammar),
    )
}
