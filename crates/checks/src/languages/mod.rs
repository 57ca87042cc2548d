/// Checks grouped by the language they inspect.
///
/// Every check is a constructor returning an [`engine::Check`]. The ones
/// without parameters are also listed by [`crate::catalog`].
///
// ====================================
// Generic text                      ==
// ====================================
pub mod text;
// ====================================

// ====================================
// Programing Languages              ==
// ====================================
pub mod csharp;
pub mod java;
pub mod javascript;
pub mod php;
pub mod python;
// ====================================

use engine::{BlockCheck, BlockRule, Probe};
use grammar::{
    any_of, condition, delimited, identifier, keyword, literal, nested, optional, parens,
    sequence, skip_to, word, CharSet, Grammar, Pattern,
};
use loader::LanguageSpec;
use regex::Regex;

/// Grammar that sees neither comments nor string literals of `lang`.
pub(crate) fn code(lang: &LanguageSpec, root: Pattern) -> anyhow::Result<Grammar> {
    Ok(Grammar::new(root)?
        .ignore_all(lang.comments())
        .ignore_all(lang.literals()))
}

/// Grammar that skips comments but can match inside string literals.
pub(crate) fn with_strings(lang: &LanguageSpec, root: Pattern) -> anyhow::Result<Grammar> {
    Ok(Grammar::new(root)?
        .ignore_all(lang.comments())
        .skip_over_all(lang.literals()))
}

/// `a.b.C` style type names.
pub(crate) fn qualified_name() -> Pattern {
    word(
        CharSet::alphas().with("_$"),
        CharSet::alphanums().with("_$."),
    )
}

/// `catch (A | B e)` where one of the caught types is in `names`, either
/// spelled as given or as the last segment of a qualified name.
pub(crate) fn catch_for(names: &[&str]) -> Pattern {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let caught = condition(
        delimited(qualified_name(), literal("|")),
        "caught type",
        move |toks| {
            toks.iter().any(|t| {
                names.iter().any(|n| {
                    t.text == n.as_str()
                        || t.text
                            .strip_suffix(n.as_str())
                            .is_some_and(|p| p.ends_with('.'))
                })
            })
        },
    );
    sequence([
        keyword("catch"),
        literal("("),
        optional(keyword("final")),
        caught,
        optional(identifier()),
        literal(")"),
    ])
}

/// Catch clauses whose braces hold nothing but comments.
pub(crate) fn empty_catches(lang: &LanguageSpec, head: Pattern) -> anyhow::Result<Probe> {
    Ok(Probe::Blocks {
        head: code(lang, head)?,
        block: BlockCheck::new(code(lang, nested('{', '}'))?, BlockRule::Empty),
    })
}

/// `switch (...)` whose body has no `default` label.
pub(crate) fn switch_without_default(lang: &LanguageSpec) -> anyhow::Result<Probe> {
    let label = Regex::new(r"default\s*(:|->)")?;
    Ok(Probe::Blocks {
        head: code(lang, sequence([keyword("switch"), parens()]))?,
        block: BlockCheck::new(code(lang, nested('{', '}'))?, BlockRule::Lacks(label)),
    })
}

/// `if (...)` not directly followed, after its body, by `else`.
pub(crate) fn if_without_else(lang: &LanguageSpec) -> anyhow::Result<Probe> {
    let body = any_of([
        nested('{', '}'),
        sequence([skip_to(literal(";")), literal(";")]),
    ]);
    let with_else = sequence([keyword("if"), parens(), body, keyword("else")]);
    Ok(Probe::Blocks {
        head: code(lang, sequence([keyword("if"), parens()]))?,
        block: BlockCheck::new(code(lang, with_else)?, BlockRule::Empty).anchored(),
    })
}
