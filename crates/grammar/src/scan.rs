//! Interpreter for pattern trees.

use tracing::trace;

use crate::pattern::{is_ident_char, Pattern};
use crate::region::{self, Span};
use crate::{Grammar, Match, Token};

pub(crate) struct Parser<'t> {
    text: &'t str,
    spans: Vec<Span>,
}

/// Characters skipped between tokens.
const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

fn char_len_at(text: &str, loc: usize) -> usize {
    text[loc..].chars().next().map_or(1, char::len_utf8)
}

impl<'t> Parser<'t> {
    pub(crate) fn new(grammar: &Grammar, text: &'t str) -> Self {
        let spans = region::lex(text, &grammar.ignore, &grammar.skip_over);
        Self { text, spans }
    }

    fn ignored_at(&self, loc: usize) -> Option<&Span> {
        let idx = self.spans.partition_point(|s| s.end <= loc);
        self.spans.get(idx).filter(|s| s.start <= loc)
    }

    /// Moves past whitespace and ignored regions.
    pub(crate) fn skip(&self, mut loc: usize) -> usize {
        loop {
            let rest = &self.text[loc..];
            loc += rest.len() - rest.trim_start_matches(WHITESPACE).len();
            match self.ignored_at(loc) {
                Some(span) => loc = span.end,
                None => return loc,
            }
        }
    }

    /// Parses `pattern` at `loc`, appending tokens to `out`. On failure `out`
    /// is left as it was.
    pub(crate) fn parse(
        &self,
        pattern: &Pattern,
        loc: usize,
        out: &mut Vec<Token<'t>>,
    ) -> Option<usize> {
        let mark = out.len();
        let end = self.parse_at(pattern, loc, out);
        if end.is_none() {
            out.truncate(mark);
        }
        end
    }

    fn token(&self, start: usize, end: usize) -> Token<'t> {
        Token {
            text: &self.text[start..end],
            offset: start,
        }
    }

    fn parse_at(&self, pattern: &Pattern, loc: usize, out: &mut Vec<Token<'t>>) -> Option<usize> {
        match pattern {
            Pattern::Literal { text, caseless } => {
                let start = self.skip(loc);
                let end = self.literal_at(start, text, *caseless)?;
                out.push(self.token(start, end));
                Some(end)
            }
            Pattern::Keyword { text, caseless } => {
                let start = self.skip(loc);
                let end = self.literal_at(start, text, *caseless)?;
                let before = self.text[..start].chars().next_back();
                let after = self.text[end..].chars().next();
                if before.is_some_and(is_ident_char) || after.is_some_and(is_ident_char) {
                    return None;
                }
                out.push(self.token(start, end));
                Some(end)
            }
            Pattern::Word { init, body } => {
                let start = self.skip(loc);
                let mut chars = self.text[start..].char_indices();
                let (_, first) = chars.next()?;
                if !init.contains(first) {
                    return None;
                }
                let end = chars
                    .find(|(_, c)| !body.contains(*c))
                    .map_or(self.text.len(), |(rel, _)| start + rel);
                out.push(self.token(start, end));
                Some(end)
            }
            Pattern::Regex(re) => {
                let start = self.skip(loc);
                let m = re.find(&self.text[start..])?;
                let end = start + m.end();
                out.push(self.token(start, end));
                Some(end)
            }
            Pattern::Quoted { quote, escape } => {
                let start = self.skip(loc);
                let end = self.quoted_at(start, *quote, *escape)?;
                let q = quote.len_utf8();
                out.push(self.token(start + q, end - q));
                Some(end)
            }
            Pattern::Nested {
                open,
                close,
                content,
            } => {
                let start = self.skip(loc);
                if !self.text[start..].starts_with(*open) {
                    return None;
                }
                self.nested_body(*open, *close, content.as_deref(), start + open.len_utf8(), out)
            }
            Pattern::Sequence(items) => {
                let mut loc = loc;
                for item in items {
                    loc = self.parse(item, loc, out)?;
                }
                Some(loc)
            }
            Pattern::AnyOf(items) => items.iter().find_map(|item| self.parse(item, loc, out)),
            Pattern::Optional(inner) => Some(self.parse(inner, loc, out).unwrap_or(loc)),
            Pattern::Not(inner) => {
                let mut scratch = Vec::new();
                match self.parse(inner, loc, &mut scratch) {
                    Some(_) => None,
                    None => Some(loc),
                }
            }
            Pattern::Delimited { item, delim } => {
                let mut loc = self.parse(item, loc, out)?;
                loop {
                    let mut scratch = Vec::new();
                    let Some(after) = self.parse(delim, loc, &mut scratch) else {
                        break;
                    };
                    match self.parse(item, after, out) {
                        Some(end) => loc = end,
                        None => break,
                    }
                }
                Some(loc)
            }
            Pattern::SkipTo(target) => {
                let end = self.skip_to(target, loc)?;
                let skipped = &self.text[loc..end];
                let trimmed = skipped.trim_matches(WHITESPACE);
                if !trimmed.is_empty() {
                    let lead = skipped.len() - skipped.trim_start_matches(WHITESPACE).len();
                    out.push(Token {
                        text: trimmed,
                        offset: loc + lead,
                    });
                }
                Some(end)
            }
            Pattern::Suppress(inner) => {
                let mut scratch = Vec::new();
                self.parse(inner, loc, &mut scratch)
            }
            Pattern::Condition {
                inner, predicate, ..
            } => {
                let mark = out.len();
                let end = self.parse(inner, loc, out)?;
                (**predicate)(&out[mark..]).then_some(end)
            }
        }
    }

    fn literal_at(&self, start: usize, text: &str, caseless: bool) -> Option<usize> {
        let end = start + text.len();
        let slice = self.text.get(start..end)?;
        let same = if caseless {
            slice.eq_ignore_ascii_case(text)
        } else {
            slice == text
        };
        same.then_some(end)
    }

    /// End offset of a single-line literal opening at `start`.
    fn quoted_at(&self, start: usize, quote: char, escape: Option<char>) -> Option<usize> {
        if !self.text[start..].starts_with(quote) {
            return None;
        }
        let body = start + quote.len_utf8();
        let mut chars = self.text[body..].char_indices();
        while let Some((rel, c)) = chars.next() {
            if Some(c) == escape {
                chars.next();
            } else if c == quote {
                return Some(body + rel + c.len_utf8());
            } else if c == '\n' {
                return None;
            }
        }
        None
    }

    /// Parses up to and including the `close` that balances an already
    /// consumed `open`.
    fn nested_body(
        &self,
        open: char,
        close: char,
        content: Option<&Pattern>,
        mut loc: usize,
        out: &mut Vec<Token<'t>>,
    ) -> Option<usize> {
        loop {
            loc = self.skip(loc);
            let c = self.text[loc..].chars().next()?;
            if c == close {
                return Some(loc + c.len_utf8());
            }
            if c == open {
                loc = self.nested_body(open, close, content, loc + c.len_utf8(), out)?;
                continue;
            }
            match content {
                Some(pattern) => {
                    let next = self.parse(pattern, loc, out)?;
                    if next <= loc {
                        return None;
                    }
                    loc = next;
                }
                None => {
                    if c == '"' || c == '\'' {
                        if let Some(end) = self.quoted_at(loc, c, Some('\\')) {
                            out.push(self.token(loc, end));
                            loc = end;
                            continue;
                        }
                    }
                    let end = self.run_end(loc, open, close);
                    out.push(self.token(loc, end));
                    loc = end;
                }
            }
        }
    }

    /// End of a run of plain characters inside a nested group.
    fn run_end(&self, start: usize, open: char, close: char) -> usize {
        let mut end = start;
        for (rel, c) in self.text[start..].char_indices() {
            let at = start + rel;
            let inner = at > start
                && (self.ignored_at(at).is_some()
                    || ((c == '"' || c == '\'') && self.quoted_at(at, c, Some('\\')).is_some()));
            let stop = WHITESPACE.contains(&c) || c == open || c == close || inner;
            if stop {
                break;
            }
            end = at + c.len_utf8();
        }
        end
    }

    /// Position from which `target` matches, scanning forward from `loc`.
    fn skip_to(&self, target: &Pattern, loc: usize) -> Option<usize> {
        let mut pos = loc;
        let mut scratch = Vec::new();
        loop {
            if let Some(span) = self.ignored_at(pos) {
                pos = span.end;
                continue;
            }
            if self.parse(target, pos, &mut scratch).is_some() {
                return Some(pos);
            }
            if pos >= self.text.len() {
                return None;
            }
            pos += char_len_at(self.text, pos);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn step(&self, loc: usize) -> usize {
        loc + char_len_at(self.text, loc)
    }
}

/// First match of `root` at or after `loc`, also returning where the next
/// search should resume.
fn find_from<'t>(
    parser: &Parser<'t>,
    root: &Pattern,
    mut loc: usize,
) -> Option<(Match<'t>, usize)> {
    while loc < parser.len() {
        let pre = parser.skip(loc);
        if pre >= parser.len() {
            break;
        }
        if let Some(m) = match_at(parser, root, pre) {
            trace!(start = m.start, end = m.end, "grammar matched");
            let end = m.end;
            return Some((m, end));
        }
        loc = parser.step(pre);
    }
    None
}

/// Non-empty match of `root` starting exactly at `pre`.
fn match_at<'t>(parser: &Parser<'t>, root: &Pattern, pre: usize) -> Option<Match<'t>> {
    let mut tokens = Vec::new();
    let end = parser.parse(root, pre, &mut tokens)?;
    (end > pre).then_some(Match {
        start: pre,
        end,
        tokens,
    })
}

/// Lazy iterator over the non-overlapping matches of a grammar.
pub struct Scan<'g, 't> {
    grammar: &'g Grammar,
    parser: Parser<'t>,
    loc: usize,
}

impl<'g, 't> Scan<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self {
            grammar,
            parser: Parser::new(grammar, text),
            loc: 0,
        }
    }
}

impl<'t> Iterator for Scan<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        match find_from(&self.parser, &self.grammar.root, self.loc) {
            Some((m, resume)) => {
                self.loc = resume;
                Some(m)
            }
            None => {
                self.loc = self.parser.len();
                None
            }
        }
    }
}

/// A grammar bound to one text. The text is lexed once, so lookups at many
/// offsets do not pay for it again.
pub struct Cursor<'g, 't> {
    grammar: &'g Grammar,
    parser: Parser<'t>,
}

impl<'g, 't> Cursor<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self {
            grammar,
            parser: Parser::new(grammar, text),
        }
    }

    /// Match starting at `loc`, after whitespace and ignored regions.
    pub fn parse_at(&self, loc: usize) -> Option<Match<'t>> {
        let pre = self.parser.skip(loc);
        if pre >= self.parser.len() {
            return None;
        }
        match_at(&self.parser, &self.grammar.root, pre)
    }

    /// First match at or after `loc`.
    pub fn search_from(&self, loc: usize) -> Option<Match<'t>> {
        find_from(&self.parser, &self.grammar.root, loc).map(|(m, _)| m)
    }
}
