//! Declarative grammars for recognising code shapes in source text.
//!
//! A [`Grammar`] couples a [`Pattern`] tree with the regions of the text the
//! scanner must not look into (comments, string literals). Grammars are
//! immutable once built and can be shared freely between threads.

mod pattern;
mod region;
mod scan;

pub use pattern::{
    any_of, caseless_keyword, caseless_literal, condition, delimited, identifier, keyword,
    literal, nested, nested_with, not_, one_of, optional, parens, quoted, regex, sequence,
    skip_to, suppress, word, CharSet, Pattern, Predicate,
};
pub use region::{c_style_comments, lex, php_comments, python_comments, Region, Span};
pub use scan::{Cursor, Scan};

use scan::Parser;

/// A piece of matched text and its byte offset in the scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    pub offset: usize,
}

/// One match of a grammar. `start` is the offset of the first character the
/// grammar consumed, after skipping whitespace and ignored regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    pub start: usize,
    pub end: usize,
    pub tokens: Vec<Token<'t>>,
}

impl Match<'_> {
    /// Token texts joined by single spaces.
    pub fn joined(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) root: Pattern,
    pub(crate) ignore: Vec<Region>,
    pub(crate) skip_over: Vec<Region>,
}

impl Grammar {
    /// Validates `root` and wraps it in a grammar with no ignored regions.
    pub fn new(root: Pattern) -> anyhow::Result<Self> {
        root.validate()?;
        Ok(Self {
            root,
            ignore: Vec::new(),
            skip_over: Vec::new(),
        })
    }

    /// Makes the scanner skip `region` entirely.
    pub fn ignore(mut self, region: Region) -> Self {
        self.ignore.push(region);
        self
    }

    pub fn ignore_all(mut self, regions: impl IntoIterator<Item = Region>) -> Self {
        self.ignore.extend(regions);
        self
    }

    /// Lexes `region` so that comment markers inside it are not honoured,
    /// while leaving its text matchable.
    pub fn skip_over(mut self, region: Region) -> Self {
        self.skip_over.push(region);
        self
    }

    pub fn skip_over_all(mut self, regions: impl IntoIterator<Item = Region>) -> Self {
        self.skip_over.extend(regions);
        self
    }

    pub fn root(&self) -> &Pattern {
        &self.root
    }

    /// Lazily finds every non-overlapping match in ascending offset order.
    pub fn scan<'g, 't>(&'g self, text: &'t str) -> Scan<'g, 't> {
        Scan::new(self, text)
    }

    /// Lexes `text` once for repeated [`Cursor::parse_at`] and
    /// [`Cursor::search_from`] lookups.
    pub fn cursor<'g, 't>(&'g self, text: &'t str) -> Cursor<'g, 't> {
        Cursor::new(self, text)
    }

    /// First match in `text`, if any.
    pub fn search<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.scan(text).next()
    }

    /// Whether the whole of `text`, give or take surrounding whitespace and
    /// ignored regions, is one match of the grammar.
    pub fn is_match(&self, text: &str) -> bool {
        let parser = Parser::new(self, text);
        let mut tokens = Vec::new();
        match parser.parse(&self.root, 0, &mut tokens) {
            Some(end) => parser.skip(end) == parser.len(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests;
