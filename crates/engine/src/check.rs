use grammar::Grammar;
use ir::{CheckReport, CheckResult, Messages, Risk, Status, Unit};
use loader::{LanguageSpec, SourceFile, TextRule};
use std::path::Path;
use tracing::debug;

use crate::{scan_blocks, scan_file, scan_with, BlockCheck, MatchResult, SourceCache};

/// What a check looks for.
#[derive(Debug, Clone)]
pub enum Probe {
    /// Files where the grammar matches are vulnerable.
    Matches(Grammar),
    /// Heads are found with the grammar, then refined by their block.
    Blocks { head: Grammar, block: BlockCheck },
    /// Files where the grammar never matches are vulnerable.
    Lacks(Grammar),
    /// Vulnerable only when every grammar matches somewhere under the path.
    MatchesAll(Vec<Grammar>),
    /// The path itself being present is the weakness.
    Exists,
    /// The path itself being absent is the weakness.
    Missing,
}

/// A runnable check: a probe plus the files it applies to and how its
/// verdicts are worded.
#[derive(Debug, Clone)]
pub struct Check {
    pub id: String,
    pub description: String,
    pub risk: Risk,
    pub language: &'static str,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub messages: Messages,
    pub probe: Probe,
}

impl Check {
    pub fn new(
        id: &str,
        description: &str,
        risk: Risk,
        language: &LanguageSpec,
        messages: Messages,
        probe: Probe,
    ) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            risk,
            language: language.name,
            extensions: language.extension_list(),
            exclude: Vec::new(),
            messages,
            probe,
        }
    }

    pub fn from_rule(rule: &TextRule) -> Self {
        Self {
            id: rule.id.clone(),
            description: rule.description.clone(),
            risk: rule.risk,
            language: "rule",
            extensions: rule.extensions.clone(),
            exclude: rule.exclude.clone(),
            messages: rule.messages.clone(),
            probe: Probe::Matches(rule.grammar.clone()),
        }
    }

    /// Runs the check against `path`. `exclude` adds to the check's own
    /// exclusions.
    pub fn run(
        &self,
        path: &Path,
        exclude: &[String],
        cache: &mut SourceCache,
    ) -> anyhow::Result<CheckResult> {
        debug!(check = %self.id, path = %path.display(), "Running check");
        let exclude: Vec<String> = self.exclude.iter().chain(exclude).cloned().collect();
        match &self.probe {
            Probe::Matches(grammar) => scan_with(
                path,
                &self.extensions,
                &exclude,
                &self.messages,
                cache,
                |src| scan_file(src, grammar),
            ),
            Probe::Blocks { head, block } => scan_with(
                path,
                &self.extensions,
                &exclude,
                &self.messages,
                cache,
                |src| scan_blocks(src, head, block),
            ),
            Probe::Lacks(grammar) => scan_with(
                path,
                &self.extensions,
                &exclude,
                &self.messages,
                cache,
                |src| invert(scan_file(src, grammar)),
            ),
            Probe::MatchesAll(grammars) => {
                let mut found = CheckResult::new(Status::Open, self.messages.open.clone());
                for grammar in grammars {
                    let res = scan_with(
                        path,
                        &self.extensions,
                        &exclude,
                        &self.messages,
                        cache,
                        |src| scan_file(src, grammar),
                    )?;
                    match res.status {
                        Status::Open => found.vulnerabilities.extend(res.vulnerabilities),
                        Status::Unknown => return Ok(res),
                        Status::Closed => {
                            return Ok(CheckResult {
                                message: self.messages.closed.clone(),
                                ..res
                            })
                        }
                    }
                }
                Ok(found)
            }
            Probe::Exists | Probe::Missing => {
                let exists = path.exists();
                let wanted = matches!(self.probe, Probe::Exists);
                if exists != wanted {
                    return Ok(CheckResult::new(Status::Closed, self.messages.closed.clone()));
                }
                let fingerprint = if path.is_file() {
                    SourceFile::load(path)?.fingerprint
                } else {
                    String::new()
                };
                let mut res = CheckResult::new(Status::Open, self.messages.open.clone());
                res.vulnerabilities.push(Unit::vulnerable(
                    path.display().to_string(),
                    vec![0],
                    fingerprint,
                ));
                Ok(res)
            }
        }
    }

    pub fn report(
        &self,
        path: &Path,
        exclude: &[String],
        cache: &mut SourceCache,
    ) -> anyhow::Result<CheckReport> {
        Ok(CheckReport {
            id: self.id.clone(),
            description: self.description.clone(),
            risk: self.risk,
            result: self.run(path, exclude, cache)?,
        })
    }
}

/// A file without matches becomes evidence, reported at line 0.
fn invert(found: MatchResult) -> MatchResult {
    let lines = if found.lines.is_empty() {
        vec![0]
    } else {
        Vec::new()
    };
    MatchResult { lines, ..found }
}
