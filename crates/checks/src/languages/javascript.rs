//! JavaScript and TypeScript checks.

use engine::{Check, Probe};
use grammar::{keyword, literal, one_of, optional, parens, sequence};
use ir::{Messages, Risk};
use loader::JAVASCRIPT;

use super::{code, empty_catches, switch_without_default};

fn check(id: &str, description: &str, risk: Risk, messages: Messages, probe: Probe) -> Check {
    Check::new(
        &format!("javascript.{id}"),
        description,
        risk,
        &JAVASCRIPT,
        messages,
        probe,
    )
}

fn uses(method: &str) -> Messages {
    Messages::new(
        format!("Code uses {method} method"),
        format!("Code does not use {method} method"),
    )
}

pub fn uses_console_log() -> anyhow::Result<Check> {
    let call = sequence([keyword("console"), literal("."), keyword("log")]);
    Ok(check(
        "uses_console_log",
        "console.log calls",
        Risk::Low,
        uses("console.log"),
        Probe::Matches(code(&JAVASCRIPT, call)?),
    ))
}

pub fn uses_eval() -> anyhow::Result<Check> {
    let call = sequence([keyword("eval"), literal("(")]);
    Ok(check(
        "uses_eval",
        "eval calls",
        Risk::Medium,
        uses("eval"),
        Probe::Matches(code(&JAVASCRIPT, call)?),
    ))
}

pub fn uses_localstorage() -> anyhow::Result<Check> {
    let access = sequence([
        optional(sequence([keyword("window"), literal(".")])),
        keyword("localStorage"),
        literal("."),
        one_of(&["getItem", "setItem", "key"], false),
    ]);
    Ok(check(
        "uses_localstorage",
        "Data kept in localStorage",
        Risk::Low,
        Messages::new(
            "Code uses localStorage",
            "Code does not use localStorage",
        ),
        Probe::Matches(code(&JAVASCRIPT, access)?),
    ))
}

pub fn has_insecure_randoms() -> anyhow::Result<Check> {
    let call = sequence([keyword("Math"), literal("."), keyword("random"), parens()]);
    Ok(check(
        "has_insecure_randoms",
        "Insecure random generators",
        Risk::Low,
        uses("Math.random()"),
        Probe::Matches(code(&JAVASCRIPT, call)?),
    ))
}

pub fn swallows_exceptions() -> anyhow::Result<Check> {
    Ok(check(
        "swallows_exceptions",
        "Empty catch blocks",
        Risk::Low,
        Messages::new("Code has empty catches", "Code does not have empty catches"),
        empty_catches(&JAVASCRIPT, sequence([keyword("catch"), optional(parens())]))?,
    ))
}

pub fn has_switch_without_default() -> anyhow::Result<Check> {
    Ok(check(
        "has_switch_without_default",
        "switch statements without default",
        Risk::Low,
        Messages::new(
            "Code does not have \"switch\" with \"default\" clause",
            "Code has \"switch\" with \"default\" clause",
        ),
        switch_without_default(&JAVASCRIPT)?,
    ))
}
