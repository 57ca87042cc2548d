//! PHP checks (`//`, `#` and `/* */` comments).

use engine::{Check, Probe};
use grammar::{any_of, condition, keyword, literal, one_of, quoted, sequence, Token};
use ir::{Messages, Risk};
use loader::PHP;

use super::{code, with_strings};

fn check(id: &str, description: &str, risk: Risk, messages: Messages, probe: Probe) -> Check {
    Check::new(&format!("php.{id}"), description, risk, &PHP, messages, probe)
}

fn uses(method: &str) -> Messages {
    Messages::new(
        format!("Code uses {method} method"),
        format!("Code does not use {method} method"),
    )
}

/// A delimited PCRE pattern such as `/a(b)/ie` carrying the `e` modifier.
fn has_eval_modifier(toks: &[Token<'_>]) -> bool {
    let Some(pattern) = toks.first().map(|t| t.text) else {
        return false;
    };
    let Some(delim) = pattern.chars().next() else {
        return false;
    };
    if delim.is_alphanumeric() || delim == '\\' || delim.is_whitespace() {
        return false;
    }
    match pattern.rfind(delim) {
        Some(end) if end > 0 => pattern[end + delim.len_utf8()..].contains('e'),
        _ => false,
    }
}

/// `preg_replace` with the `/e` modifier, which evaluates the replacement.
pub fn has_preg_ce() -> anyhow::Result<Check> {
    let call = sequence([
        keyword("preg_replace"),
        literal("("),
        condition(
            any_of([quoted('"'), quoted('\'')]),
            "eval modifier",
            has_eval_modifier,
        ),
    ]);
    Ok(check(
        "has_preg_ce",
        "preg_replace with the e modifier",
        Risk::High,
        uses("preg_replace /e"),
        Probe::Matches(with_strings(&PHP, call)?),
    ))
}

pub fn uses_eval() -> anyhow::Result<Check> {
    let call = sequence([keyword("eval"), literal("(")]);
    Ok(check(
        "uses_eval",
        "eval calls",
        Risk::High,
        uses("eval"),
        Probe::Matches(code(&PHP, call)?),
    ))
}

pub fn uses_shell_execution() -> anyhow::Result<Check> {
    let call = sequence([
        one_of(
            &["exec", "shell_exec", "system", "passthru", "popen", "proc_open"],
            false,
        ),
        literal("("),
    ]);
    Ok(check(
        "uses_shell_execution",
        "Shell command execution",
        Risk::High,
        Messages::new(
            "Code executes shell commands",
            "Code does not execute shell commands",
        ),
        Probe::Matches(code(&PHP, call)?),
    ))
}
