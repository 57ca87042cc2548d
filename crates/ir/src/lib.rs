//! Result types shared by the scanner, the checks and the reporters.
//!
//! A check produces a [`CheckResult`]: a three valued [`Status`] plus the
//! per-file [`Unit`]s that justify it. [`CheckReport`] tags a result with the
//! check that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute recorded on every unit: the evidence is a list of line numbers.
pub const LINES: &str = "lines";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
/// Verdict of a check.
pub enum Status {
    /// The weakness is present.
    Open,
    /// The weakness is absent.
    Closed,
    /// The check could not run, e.g. the target does not exist.
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Open => "OPEN",
            Status::Closed => "CLOSED",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
/// Risk level associated with a check.
pub enum Risk {
    Low,
    Medium,
    High,
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Risk::Low => "LOW",
            Risk::Medium => "MEDIUM",
            Risk::High => "HIGH",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Risk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Risk::Low),
            "medium" => Ok(Risk::Medium),
            "high" => Ok(Risk::High),
            other => Err(format!("unknown risk '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Evidence for one file.
pub struct Unit {
    /// Path of the file as it was visited.
    #[serde(rename = "where")]
    pub location: String,
    pub attribute: String,
    /// Matched line numbers; empty for a safe file.
    pub specific: Vec<usize>,
    /// Hex digest of the file's raw bytes.
    pub fingerprint: String,
}

impl Unit {
    /// Unit for a file with matches on `lines`.
    pub fn vulnerable(location: impl Into<String>, lines: Vec<usize>, fingerprint: String) -> Self {
        Self {
            location: location.into(),
            attribute: LINES.to_string(),
            specific: lines,
            fingerprint,
        }
    }

    /// Unit for a file that was scanned without matches.
    pub fn safe(location: impl Into<String>, fingerprint: String) -> Self {
        Self::vulnerable(location, Vec::new(), fingerprint)
    }

    pub fn is_vulnerable(&self) -> bool {
        !self.specific.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Messages reported for the two definite verdicts.
pub struct Messages {
    pub open: String,
    pub closed: String,
}

impl Messages {
    pub fn new(open: impl Into<String>, closed: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            closed: closed.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Outcome of running one check against one path.
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub vulnerabilities: Vec<Unit>,
    pub safes: Vec<Unit>,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            vulnerabilities: Vec::new(),
            safes: Vec::new(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A [`CheckResult`] together with the check that produced it.
pub struct CheckReport {
    pub id: String,
    pub description: String,
    pub risk: Risk,
    #[serde(flatten)]
    pub result: CheckResult,
}

#[cfg(test)]
mod tests;
