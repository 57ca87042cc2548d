//! C# checks (`.cs` sources).

use engine::{Check, Probe};
use grammar::{
    any_of, caseless_keyword, identifier, keyword, literal, optional, parens, sequence,
};
use ir::{Messages, Risk};
use loader::CSHARP;

use super::{catch_for, code, empty_catches, if_without_else, switch_without_default};

const GENERIC_EXCEPTIONS: &[&str] = &["Exception", "ApplicationException", "SystemException"];

fn check(id: &str, description: &str, risk: Risk, messages: Messages, probe: Probe) -> Check {
    Check::new(&format!("csharp.{id}"), description, risk, &CSHARP, messages, probe)
}

fn uses(method: &str) -> Messages {
    Messages::new(
        format!("Code uses {method} method"),
        format!("Code does not use {method} method"),
    )
}

/// Catch clauses for `Exception`, `ApplicationException` or
/// `SystemException`, with or without the `System.` prefix.
pub fn has_generic_exceptions() -> anyhow::Result<Check> {
    Ok(check(
        "has_generic_exceptions",
        "Catch clauses for generic exceptions",
        Risk::Low,
        Messages::new(
            "Code declares a \"catch\" for generic exceptions",
            "Code does not declare \"catch\" for generic exceptions",
        ),
        Probe::Matches(code(&CSHARP, catch_for(GENERIC_EXCEPTIONS))?),
    ))
}

pub fn swallows_exceptions() -> anyhow::Result<Check> {
    Ok(check(
        "swallows_exceptions",
        "Empty catch blocks",
        Risk::Low,
        Messages::new("Code has empty catches", "Code does not have empty catches"),
        empty_catches(&CSHARP, sequence([keyword("catch"), optional(parens())]))?,
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
        switch_without_default(&CSHARP)?,
    ))
}

/// `Random r = new Random()` or `var r = new Random()`.
pub fn has_insecure_randoms() -> anyhow::Result<Check> {
    let instantiation = sequence([
        any_of([keyword("var"), keyword("Random")]),
        identifier(),
        literal("="),
        keyword("new"),
        keyword("Random"),
        parens(),
    ]);
    Ok(check(
        "has_insecure_randoms",
        "Instances of System.Random",
        Risk::Low,
        Messages::new(
            "Code generates insecure random numbers",
            "Code does not generate insecure random numbers",
        ),
        Probe::Matches(code(&CSHARP, instantiation)?),
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
        if_without_else(&CSHARP)?,
    ))
}

pub fn uses_md5_hash() -> anyhow::Result<Check> {
    let calls = any_of([
        sequence([
            caseless_keyword("md5"),
            literal("."),
            caseless_keyword("create"),
            parens(),
        ]),
        sequence([
            caseless_keyword("new"),
            caseless_keyword("MD5CryptoServiceProvider"),
            parens(),
        ]),
    ]);
    Ok(check(
        "uses_md5_hash",
        "MD5 hashing",
        Risk::Medium,
        uses("MD5.Create(), new MD5CryptoServiceProvider()"),
        Probe::Matches(code(&CSHARP, calls)?),
    ))
}

pub fn uses_sha1_hash() -> anyhow::Result<Check> {
    let calls = sequence([
        caseless_keyword("new"),
        any_of([
            caseless_keyword("SHA1CryptoServiceProvider"),
            caseless_keyword("SHA1Managed"),
        ]),
        parens(),
    ]);
    Ok(check(
        "uses_sha1_hash",
        "SHA1 hashing",
        Risk::Medium,
        uses("new SHA1CryptoServiceProvider(), new SHA1Managed()"),
        Probe::Matches(code(&CSHARP, calls)?),
    ))
}

/// Assignments of `CipherMode.ECB`, reported at the `=`.
pub fn uses_ecb_encryption_mode() -> anyhow::Result<Check> {
    let assignment = sequence([
        literal("="),
        caseless_keyword("ciphermode"),
        literal("."),
        caseless_keyword("ecb"),
    ]);
    Ok(check(
        "uses_ecb_encryption_mode",
        "ECB cipher mode",
        Risk::Medium,
        uses("Mode = CipherMode.ECB"),
        Probe::Matches(code(&CSHARP, assignment)?),
    ))
}

pub fn uses_debug_writeline() -> anyhow::Result<Check> {
    let call = sequence([
        caseless_keyword("debug"),
        literal("."),
        caseless_keyword("writeline"),
    ]);
    Ok(check(
        "uses_debug_writeline",
        "Debug.WriteLine calls",
        Risk::Low,
        uses("Debug.WriteLine"),
        Probe::Matches(code(&CSHARP, call)?),
    ))
}

pub fn uses_console_writeline() -> anyhow::Result<Check> {
    let call = sequence([
        caseless_keyword("console"),
        literal("."),
        caseless_keyword("writeline"),
    ]);
    Ok(check(
        "uses_console_writeline",
        "Console.WriteLine calls",
        Risk::Low,
        uses("Console.WriteLine"),
        Probe::Matches(code(&CSHARP, call)?),
    ))
}
