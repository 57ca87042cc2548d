//! Pattern tree and the builders used to compose it.

use anyhow::{bail, Context};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::Token;

/// Characters that continue an identifier; keywords must not touch them.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Set of characters accepted by a [`Pattern::Word`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    alpha: bool,
    digit: bool,
    extra: String,
}

impl CharSet {
    /// ASCII letters.
    pub fn alphas() -> Self {
        Self {
            alpha: true,
            ..Self::default()
        }
    }

    /// ASCII letters and digits.
    pub fn alphanums() -> Self {
        Self {
            alpha: true,
            digit: true,
            extra: String::new(),
        }
    }

    /// ASCII digits.
    pub fn nums() -> Self {
        Self {
            digit: true,
            ..Self::default()
        }
    }

    /// Exactly the given characters.
    pub fn chars(chars: &str) -> Self {
        Self {
            extra: chars.to_string(),
            ..Self::default()
        }
    }

    /// Adds the given characters to the set.
    pub fn with(mut self, chars: &str) -> Self {
        self.extra.push_str(chars);
        self
    }

    pub fn contains(&self, c: char) -> bool {
        (self.alpha && c.is_ascii_alphabetic())
            || (self.digit && c.is_ascii_digit())
            || self.extra.contains(c)
    }

    fn is_empty(&self) -> bool {
        !self.alpha && !self.digit && self.extra.is_empty()
    }
}

/// Refinement applied to the tokens of a successful match.
pub type Predicate = Arc<dyn for<'t> Fn(&[Token<'t>]) -> bool + Send + Sync>;

/// Immutable description of a token pattern.
///
/// Trees are built with the free functions of this module ([`sequence`],
/// [`any_of`], [`optional`], ...) and interpreted by [`crate::Grammar`].
#[derive(Clone)]
pub enum Pattern {
    /// Exact text, optionally ignoring ASCII case.
    Literal { text: String, caseless: bool },
    /// Text that is not part of a longer identifier.
    Keyword { text: String, caseless: bool },
    /// One char from `init` followed by any number of chars from `body`.
    Word { init: CharSet, body: CharSet },
    /// Regular expression anchored at the current offset.
    Regex(Regex),
    /// Delimited literal on a single line; the token is its inner text.
    Quoted { quote: char, escape: Option<char> },
    /// Balanced `open`/`close` group. Without `content` any text is allowed.
    Nested {
        open: char,
        close: char,
        content: Option<Box<Pattern>>,
    },
    Sequence(Vec<Pattern>),
    /// Ordered choice: the first alternative that matches wins.
    AnyOf(Vec<Pattern>),
    Optional(Box<Pattern>),
    /// Zero-width negative lookahead.
    Not(Box<Pattern>),
    /// `item (delim item)*`; delimiter tokens are dropped.
    Delimited {
        item: Box<Pattern>,
        delim: Box<Pattern>,
    },
    /// Everything up to, but excluding, the next match of the target.
    SkipTo(Box<Pattern>),
    /// Matches but contributes no tokens.
    Suppress(Box<Pattern>),
    Condition {
        inner: Box<Pattern>,
        label: String,
        predicate: Predicate,
    },
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal { text, caseless } => f
                .debug_struct("Literal")
                .field("text", text)
                .field("caseless", caseless)
                .finish(),
            Pattern::Keyword { text, caseless } => f
                .debug_struct("Keyword")
                .field("text", text)
                .field("caseless", caseless)
                .finish(),
            Pattern::Word { init, body } => f
                .debug_struct("Word")
                .field("init", init)
                .field("body", body)
                .finish(),
            Pattern::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Pattern::Quoted { quote, escape } => f
                .debug_struct("Quoted")
                .field("quote", quote)
                .field("escape", escape)
                .finish(),
            Pattern::Nested {
                open,
                close,
                content,
            } => f
                .debug_struct("Nested")
                .field("open", open)
                .field("close", close)
                .field("content", content)
                .finish(),
            Pattern::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Pattern::AnyOf(items) => f.debug_tuple("AnyOf").field(items).finish(),
            Pattern::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Pattern::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Pattern::Delimited { item, delim } => f
                .debug_struct("Delimited")
                .field("item", item)
                .field("delim", delim)
                .finish(),
            Pattern::SkipTo(inner) => f.debug_tuple("SkipTo").field(inner).finish(),
            Pattern::Suppress(inner) => f.debug_tuple("Suppress").field(inner).finish(),
            Pattern::Condition { inner, label, .. } => f
                .debug_struct("Condition")
                .field("inner", inner)
                .field("label", label)
                .finish(),
        }
    }
}

impl Pattern {
    /// Rejects trees that can never behave as intended.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        match self {
            Pattern::Literal { text, .. } | Pattern::Keyword { text, .. } => {
                if text.is_empty() {
                    bail!("empty literal in grammar");
                }
            }
            Pattern::Word { init, .. } => {
                if init.is_empty() {
                    bail!("word pattern without initial characters");
                }
            }
            Pattern::Regex(_) => {}
            Pattern::Quoted { quote, escape } => {
                if Some(*quote) == *escape {
                    bail!("quote character {quote:?} cannot also be the escape");
                }
            }
            Pattern::Nested {
                open,
                close,
                content,
            } => {
                if open == close {
                    bail!("nested group needs distinct brackets, got {open:?} twice");
                }
                if let Some(content) = content {
                    content.validate().context("invalid nested content")?;
                }
            }
            Pattern::Sequence(items) | Pattern::AnyOf(items) => {
                if items.is_empty() {
                    bail!("empty {} in grammar", self.kind());
                }
                for item in items {
                    item.validate()?;
                }
            }
            Pattern::Optional(inner)
            | Pattern::Not(inner)
            | Pattern::SkipTo(inner)
            | Pattern::Suppress(inner) => inner.validate()?,
            Pattern::Delimited { item, delim } => {
                item.validate()?;
                delim.validate()?;
            }
            Pattern::Condition { inner, label, .. } => inner
                .validate()
                .with_context(|| format!("invalid pattern under condition '{label}'"))?,
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        match self {
            Pattern::Literal { .. } => "literal",
            Pattern::Keyword { .. } => "keyword",
            Pattern::Word { .. } => "word",
            Pattern::Regex(_) => "regex",
            Pattern::Quoted { .. } => "quoted",
            Pattern::Nested { .. } => "nested",
            Pattern::Sequence(_) => "sequence",
            Pattern::AnyOf(_) => "alternation",
            Pattern::Optional(_) => "optional",
            Pattern::Not(_) => "negation",
            Pattern::Delimited { .. } => "delimited list",
            Pattern::SkipTo(_) => "skip",
            Pattern::Suppress(_) => "suppress",
            Pattern::Condition { .. } => "condition",
        }
    }
}

pub fn literal(text: &str) -> Pattern {
    Pattern::Literal {
        text: text.to_string(),
        caseless: false,
    }
}

pub fn caseless_literal(text: &str) -> Pattern {
    Pattern::Literal {
        text: text.to_string(),
        caseless: true,
    }
}

pub fn keyword(text: &str) -> Pattern {
    Pattern::Keyword {
        text: text.to_string(),
        caseless: false,
    }
}

pub fn caseless_keyword(text: &str) -> Pattern {
    Pattern::Keyword {
        text: text.to_string(),
        caseless: true,
    }
}

pub fn word(init: CharSet, body: CharSet) -> Pattern {
    Pattern::Word { init, body }
}

/// Identifier such as `_var$1`: a letter, `_` or `$`, then alphanumerics or `_`.
pub fn identifier() -> Pattern {
    word(CharSet::alphas().with("_$"), CharSet::alphanums().with("_"))
}

/// Alternation of keywords, longest first so that prefixes never shadow
/// longer words.
///
/// # Example
/// ```
/// use grammar::{one_of, Grammar};
/// let g = Grammar::new(one_of(&["info", "information"], false)).unwrap();
/// let m = g.search("information leak").unwrap();
/// assert_eq!(m.tokens[0].text, "information");
/// ```
pub fn one_of(words: &[&str], caseless: bool) -> Pattern {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    sorted.dedup();
    Pattern::AnyOf(
        sorted
            .into_iter()
            .map(|w| if caseless { caseless_keyword(w) } else { keyword(w) })
            .collect(),
    )
}

/// Compiles `pattern` so that it only matches at the scanning offset.
pub fn regex(pattern: &str) -> anyhow::Result<Pattern> {
    let re = Regex::new(&format!("^(?:{pattern})"))
        .with_context(|| format!("invalid regex in grammar: {pattern}"))?;
    Ok(Pattern::Regex(re))
}

pub fn quoted(quote: char) -> Pattern {
    Pattern::Quoted {
        quote,
        escape: Some('\\'),
    }
}

pub fn nested(open: char, close: char) -> Pattern {
    Pattern::Nested {
        open,
        close,
        content: None,
    }
}

pub fn nested_with(open: char, close: char, content: Pattern) -> Pattern {
    Pattern::Nested {
        open,
        close,
        content: Some(Box::new(content)),
    }
}

/// Parenthesised group, the most common nesting.
pub fn parens() -> Pattern {
    nested('(', ')')
}

pub fn sequence(items: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Sequence(items.into_iter().collect())
}

pub fn any_of(items: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::AnyOf(items.into_iter().collect())
}

pub fn optional(inner: Pattern) -> Pattern {
    Pattern::Optional(Box::new(inner))
}

pub fn not_(inner: Pattern) -> Pattern {
    Pattern::Not(Box::new(inner))
}

pub fn delimited(item: Pattern, delim: Pattern) -> Pattern {
    Pattern::Delimited {
        item: Box::new(item),
        delim: Box::new(delim),
    }
}

pub fn skip_to(target: Pattern) -> Pattern {
    Pattern::SkipTo(Box::new(target))
}

pub fn suppress(inner: Pattern) -> Pattern {
    Pattern::Suppress(Box::new(inner))
}

/// Accepts a match of `inner` only when `predicate` holds for its tokens.
pub fn condition<F>(inner: Pattern, label: &str, predicate: F) -> Pattern
where
    F: for<'t> Fn(&[Token<'t>]) -> bool + Send + Sync + 'static,
{
    Pattern::Condition {
        inner: Box::new(inner),
        label: label.to_string(),
        predicate: Arc::new(predicate),
    }
}
