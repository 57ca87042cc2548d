use grammar::{Cursor, Grammar};
use loader::SourceFile;
use regex::Regex;
use tracing::debug;

use crate::{distinct_lines, LineIndex, MatchResult};

/// How the first block match following a head decides vulnerability.
#[derive(Debug, Clone)]
pub enum BlockRule {
    /// Vulnerable when nothing matches or the match carries no tokens,
    /// e.g. a `catch` whose braces hold only comments.
    Empty,
    /// Vulnerable when the match's joined token text does not match the
    /// regex, e.g. a `switch` body without `default:`.
    Lacks(Regex),
}

/// Second phase of a two phase check.
#[derive(Debug, Clone)]
pub struct BlockCheck {
    pub body: Grammar,
    pub rule: BlockRule,
    /// Only a body match starting exactly at the head counts.
    pub anchored: bool,
}

impl BlockCheck {
    pub fn new(body: Grammar, rule: BlockRule) -> Self {
        Self {
            body,
            rule,
            anchored: false,
        }
    }

    pub fn anchored(mut self) -> Self {
        self.anchored = true;
        self
    }

    /// Decides whether the construct starting at the beginning of `rest` is
    /// vulnerable.
    pub fn is_vulnerable(&self, rest: &str) -> bool {
        self.is_vulnerable_at(&self.body.cursor(rest), 0)
    }

    /// Same as [`BlockCheck::is_vulnerable`] for the construct at `at`, on
    /// a text already lexed into `cursor`.
    pub fn is_vulnerable_at(&self, cursor: &Cursor<'_, '_>, at: usize) -> bool {
        let found = if self.anchored {
            cursor.parse_at(at)
        } else {
            cursor.search_from(at)
        };
        match &self.rule {
            BlockRule::Empty => found.is_none_or(|m| m.tokens.is_empty()),
            BlockRule::Lacks(re) => found.is_some_and(|m| !re.is_match(&m.joined())),
        }
    }
}

/// Finds `head` constructs in `source` and keeps the lines of those whose
/// block is vulnerable.
pub fn scan_blocks(source: &SourceFile, head: &Grammar, block: &BlockCheck) -> MatchResult {
    let index = LineIndex::new(&source.text);
    let cursor = block.body.cursor(&source.text);
    let heads: Vec<usize> = head
        .scan(&source.text)
        .filter(|m| block.is_vulnerable_at(&cursor, m.start))
        .map(|m| index.line_of(m.start))
        .collect();
    let lines = distinct_lines(heads, &source.text);
    debug!(file = %source.path.display(), lines = ?lines, "Blocks refined");
    MatchResult {
        path: source.path.clone(),
        fingerprint: source.fingerprint.clone(),
        lines,
    }
}
