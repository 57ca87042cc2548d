use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static NOSEC_RE: OnceLock<Regex> = OnceLock::new();

/// Marker that silences every match on its line.
pub const SUPPRESSION_MARKER: &str = r"(#|//)\s*nosec";

/// 1-based numbers of the lines carrying the suppression marker.
pub fn suppressed_lines(text: &str) -> HashSet<usize> {
    let re = NOSEC_RE.get_or_init(|| Regex::new(SUPPRESSION_MARKER).expect("valid nosec regex"));
    text.split('\n')
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .map(|(i, _)| i + 1)
        .collect()
}
