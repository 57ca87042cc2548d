//! Java checks (`.java` sources, `//` and `/* */` comments).

use engine::{Check, Probe};
use grammar::{
    any_of, caseless_keyword, identifier, keyword, literal, one_of, optional, parens, quoted,
    sequence, Pattern,
};
use ir::{Messages, Risk};
use loader::JAVA;

use super::{catch_for, code, empty_catches, if_without_else, switch_without_default, with_strings};

const GENERIC_EXCEPTIONS: &[&str] = &["Exception", "Throwable", "RuntimeException"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "fatal"];

fn check(id: &str, description: &str, risk: Risk, messages: Messages, probe: Probe) -> Check {
    Check::new(&format!("java.{id}"), description, risk, &JAVA, messages, probe)
}

fn uses(method: &str) -> Messages {
    Messages::new(
        format!("Code uses {method} method"),
        format!("Code does not use {method} method"),
    )
}

pub fn has_generic_exceptions() -> anyhow::Result<Check> {
    Ok(check(
        "has_generic_exceptions",
        "Catch clauses for generic exceptions",
        Risk::Low,
        Messages::new(
            "Code uses generic exceptions",
            "Code does not use generic exceptions",
        ),
        Probe::Matches(code(&JAVA, catch_for(GENERIC_EXCEPTIONS))?),
    ))
}

/// Catch clauses for any of `exceptions`, multi-catch included.
pub fn uses_catch_for_exceptions(exceptions: &[&str]) -> anyhow::Result<Check> {
    Ok(check(
        "uses_catch_for_exceptions",
        "Catch clauses for the given exceptions",
        Risk::Low,
        Messages::new(
            "Code declares a \"catch\" for the given exceptions",
            "Code does not declare \"catch\" for the given exceptions",
        ),
        Probe::Matches(code(&JAVA, catch_for(exceptions))?),
    ))
}

pub fn uses_print_stack_trace() -> anyhow::Result<Check> {
    let pst = sequence([
        identifier(),
        literal("."),
        caseless_keyword("printstacktrace"),
        literal("("),
        literal(")"),
    ]);
    Ok(check(
        "uses_print_stack_trace",
        "printStackTrace calls",
        Risk::Low,
        uses("exc.printStackTrace()"),
        Probe::Matches(code(&JAVA, pst)?),
    ))
}

pub fn swallows_exceptions() -> anyhow::Result<Check> {
    Ok(check(
        "swallows_exceptions",
        "Empty catch blocks",
        Risk::Low,
        Messages::new("Code has empty catches", "Code does not have empty catches"),
        empty_catches(&JAVA, sequence([keyword("catch"), parens()]))?,
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
        switch_without_default(&JAVA)?,
    ))
}

/// `new Random()` and `Math.random()`.
pub fn has_insecure_randoms() -> anyhow::Result<Check> {
    let randoms = any_of([
        sequence([
            keyword("new"),
            optional(literal("java.util.")),
            keyword("Random"),
            parens(),
        ]),
        sequence([keyword("Math"), literal("."), keyword("random"), parens()]),
    ]);
    Ok(check(
        "has_insecure_randoms",
        "Insecure random generators",
        Risk::Low,
        uses("java.util.Random() or java.lang.Math.random()"),
        Probe::Matches(code(&JAVA, randoms)?),
    ))
}

pub fn has_if_without_else() -> anyhow::Result<Check> {
    Ok(check(
        "has_if_without_else",
        "if statements without else",
        Risk::Low,
        Messages::new(
            "Code does not have \"if\" with \"else\" clauses",
            "Code has \"if\" with \"else\" clauses",
        ),
        if_without_else(&JAVA)?,
    ))
}

fn cipher_instance(algorithm: &str) -> Pattern {
    let mode = sequence([literal("/"), one_of(&["CBC", "ECB"], true)]);
    let padding = sequence([literal("/"), one_of(&["NoPadding", "PKCS5Padding"], true)]);
    sequence([
        caseless_keyword("cipher"),
        literal("."),
        caseless_keyword("getinstance"),
        literal("("),
        literal("\""),
        caseless_keyword(algorithm),
        optional(sequence([mode, optional(padding)])),
        literal("\""),
        literal(")"),
    ])
}

fn cipher(id: &str, algorithm: &str) -> anyhow::Result<Check> {
    let method = format!("Cipher.getInstance(\"{}\")", algorithm.to_uppercase());
    Ok(check(
        id,
        &format!("{} cipher", algorithm.to_uppercase()),
        Risk::Medium,
        uses(&method),
        Probe::Matches(with_strings(&JAVA, cipher_instance(algorithm))?),
    ))
}

fn hash(id: &str, algorithm: &str) -> anyhow::Result<Check> {
    let method = format!("MessageDigest.getInstance(\"{}\")", algorithm.to_uppercase());
    let instance = sequence([
        caseless_keyword("messagedigest"),
        literal("."),
        caseless_keyword("getinstance"),
        literal("("),
        literal("\""),
        caseless_keyword(algorithm),
        literal("\""),
        literal(")"),
    ]);
    Ok(check(
        id,
        &format!("{} hashing", algorithm.to_uppercase()),
        Risk::Medium,
        uses(&method),
        Probe::Matches(with_strings(&JAVA, instance)?),
    ))
}

/// `Cipher.getInstance("<algorithm>[/mode[/padding]]")`.
pub fn uses_insecure_cipher(algorithm: &str) -> anyhow::Result<Check> {
    cipher("uses_insecure_cipher", algorithm)
}

/// `MessageDigest.getInstance("<algorithm>")`.
pub fn uses_insecure_hash(algorithm: &str) -> anyhow::Result<Check> {
    hash("uses_insecure_hash", algorithm)
}

pub fn uses_md5_hash() -> anyhow::Result<Check> {
    hash("uses_md5_hash", "md5")
}

pub fn uses_sha1_hash() -> anyhow::Result<Check> {
    hash("uses_sha1_hash", "sha-1")
}

pub fn uses_des_algorithm() -> anyhow::Result<Check> {
    cipher("uses_des_algorithm", "DES")
}

/// Log calls whose message concatenates a variable to a string literal.
pub fn has_log_injection() -> anyhow::Result<Check> {
    let call = sequence([
        caseless_keyword("log"),
        literal("."),
        one_of(LOG_LEVELS, false),
        literal("("),
        quoted('"'),
        literal("+"),
        identifier(),
    ]);
    Ok(check(
        "has_log_injection",
        "Unneutralized log output",
        Risk::Low,
        Messages::new(
            "Code allows logs injection",
            "Code does not allow logs injection",
        ),
        Probe::Matches(with_strings(&JAVA, call)?),
    ))
}

pub fn uses_system_exit() -> anyhow::Result<Check> {
    let exit = sequence([keyword("System"), literal("."), keyword("exit")]);
    Ok(check(
        "uses_system_exit",
        "System.exit calls",
        Risk::Low,
        uses("System.exit"),
        Probe::Matches(code(&JAVA, exit)?),
    ))
}
