//! Python checks (`.py` sources, `#` comments, triple-quoted strings).

use engine::{Check, Probe};
use grammar::{any_of, keyword, literal, one_of, optional, sequence, skip_to};
use ir::{Messages, Risk};
use loader::PYTHON;

use super::code;

fn check(id: &str, description: &str, risk: Risk, messages: Messages, probe: Probe) -> Check {
    Check::new(&format!("python.{id}"), description, risk, &PYTHON, messages, probe)
}

/// Bare `except:` and handlers for `Exception` or `BaseException`.
pub fn has_generic_exceptions() -> anyhow::Result<Check> {
    let handler = sequence([
        keyword("except"),
        any_of([
            literal(":"),
            sequence([
                optional(literal("(")),
                one_of(&["Exception", "BaseException"], false),
            ]),
        ]),
    ]);
    Ok(check(
        "has_generic_exceptions",
        "Handlers for generic exceptions",
        Risk::Low,
        Messages::new(
            "Code uses generic exceptions",
            "Code does not use generic exceptions",
        ),
        Probe::Matches(code(&PYTHON, handler)?),
    ))
}

/// Handlers whose whole body is `pass`.
pub fn swallows_exceptions() -> anyhow::Result<Check> {
    let handler = sequence([
        keyword("except"),
        skip_to(literal(":")),
        literal(":"),
        keyword("pass"),
    ]);
    Ok(check(
        "swallows_exceptions",
        "Exception handlers that only pass",
        Risk::Low,
        Messages::new("Code has empty catches", "Code does not have empty catches"),
        Probe::Matches(code(&PYTHON, handler)?),
    ))
}

/// `eval`, `exec`, `os.system` and `pickle` deserialisation.
pub fn uses_insecure_functions() -> anyhow::Result<Check> {
    let calls = any_of([
        sequence([one_of(&["eval", "exec"], false), literal("(")]),
        sequence([keyword("os"), literal("."), keyword("system"), literal("(")]),
        sequence([
            keyword("pickle"),
            literal("."),
            one_of(&["load", "loads"], false),
            literal("("),
        ]),
    ]);
    Ok(check(
        "uses_insecure_functions",
        "Calls to functions that run or deserialise arbitrary code",
        Risk::Medium,
        Messages::new(
            "Code uses insecure functions",
            "Code does not use insecure functions",
        ),
        Probe::Matches(code(&PYTHON, calls)?),
    ))
}

/// Functions of the `random` module, which is not a CSPRNG.
pub fn uses_insecure_random() -> anyhow::Result<Check> {
    let call = sequence([
        keyword("random"),
        literal("."),
        one_of(
            &["random", "randint", "randrange", "choice", "uniform", "getrandbits"],
            false,
        ),
        literal("("),
    ]);
    Ok(check(
        "uses_insecure_random",
        "Insecure random generators",
        Risk::Low,
        Messages::new(
            "Code generates insecure random numbers",
            "Code does not generate insecure random numbers",
        ),
        Probe::Matches(code(&PYTHON, call)?),
    ))
}
