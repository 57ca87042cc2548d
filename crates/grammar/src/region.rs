//! Comment and literal regions and the single-pass lexer that locates them.

/// A stretch of source the scanner treats specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// From the marker to the end of the line. A backslash right before the
    /// newline continues the comment on the next line.
    LineComment(String),
    /// From `open` to the first following `close`, or to end of text.
    BlockComment { open: String, close: String },
    /// A delimited literal. Unless `multiline`, a literal that reaches the end
    /// of the line without closing is not a region at all.
    Quoted {
        delim: String,
        escape: Option<char>,
        multiline: bool,
    },
}

impl Region {
    pub fn line_comment(marker: &str) -> Self {
        Region::LineComment(marker.to_string())
    }

    pub fn block_comment(open: &str, close: &str) -> Self {
        Region::BlockComment {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    /// Single-line literal delimited by `quote` with backslash escapes.
    pub fn quoted(quote: char) -> Self {
        Region::Quoted {
            delim: quote.to_string(),
            escape: Some('\\'),
            multiline: false,
        }
    }

    /// Literal that may span lines, such as Python's `"""`.
    pub fn multiline_quoted(delim: &str) -> Self {
        Region::Quoted {
            delim: delim.to_string(),
            escape: Some('\\'),
            multiline: true,
        }
    }

    fn opener(&self) -> &str {
        match self {
            Region::LineComment(marker) => marker,
            Region::BlockComment { open, .. } => open,
            Region::Quoted { delim, .. } => delim,
        }
    }

    /// End offset of the region opening at `start`, if it is well formed.
    fn end_at(&self, text: &str, start: usize) -> Option<usize> {
        let body = start + self.opener().len();
        match self {
            Region::LineComment(_) => {
                let bytes = text.as_bytes();
                let mut pos = body;
                loop {
                    match text[pos..].find('\n') {
                        None => return Some(text.len()),
                        Some(rel) => {
                            let nl = pos + rel;
                            if nl > body && bytes[nl - 1] == b'\\' {
                                pos = nl + 1;
                            } else {
                                return Some(nl);
                            }
                        }
                    }
                }
            }
            Region::BlockComment { close, .. } => Some(
                text[body..]
                    .find(close.as_str())
                    .map_or(text.len(), |rel| body + rel + close.len()),
            ),
            Region::Quoted {
                delim,
                escape,
                multiline,
            } => {
                let mut chars = text[body..].char_indices();
                while let Some((rel, c)) = chars.next() {
                    if Some(c) == *escape {
                        chars.next();
                    } else if text[body + rel..].starts_with(delim.as_str()) {
                        return Some(body + rel + delim.len());
                    } else if c == '\n' && !multiline {
                        return None;
                    }
                }
                multiline.then_some(text.len())
            }
        }
    }
}

/// Byte range of an ignored region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Lexes `text` left to right and returns the ignored spans in order.
///
/// At each offset the ignored regions are tried first, then the skip-over
/// ones; the first opener that yields a well formed region wins and lexing
/// resumes after it. Skip-over regions are consumed but not reported, so a
/// `//` inside `"http://host"` never opens a comment.
pub fn lex(text: &str, ignore: &[Region], skip_over: &[Region]) -> Vec<Span> {
    let mut spans = Vec::new();
    let candidates: Vec<(&Region, bool)> = ignore
        .iter()
        .map(|r| (r, true))
        .chain(skip_over.iter().map(|r| (r, false)))
        .filter(|(r, _)| !r.opener().is_empty())
        .collect();
    if candidates.is_empty() {
        return spans;
    }

    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let found = candidates.iter().find_map(|(region, ignored)| {
            if !rest.starts_with(region.opener()) {
                return None;
            }
            region.end_at(text, pos).map(|end| (end, *ignored))
        });
        match found {
            Some((end, ignored)) => {
                if ignored {
                    spans.push(Span { start: pos, end });
                }
                pos = end;
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    spans
}

/// `//` line comments and `/* */` block comments.
pub fn c_style_comments() -> Vec<Region> {
    vec![Region::line_comment("//"), Region::block_comment("/*", "*/")]
}

/// `#` line comments.
pub fn python_comments() -> Vec<Region> {
    vec![Region::line_comment("#")]
}

/// `//`, `#` and `/* */`.
pub fn php_comments() -> Vec<Region> {
    vec![
        Region::line_comment("//"),
        Region::line_comment("#"),
        Region::block_comment("/*", "*/"),
    ]
}
