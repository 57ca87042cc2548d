//! Language-agnostic text checks.
//!
//! Searches are literal unless `use_regex` is set, in which case the
//! expression is matched case-insensitively. With a language other than
//! [`loader::ANY`] only that language's files are read and its comments are
//! skipped; string literals stay searchable.

use base64::{engine::general_purpose, Engine as _};
use engine::{Check, Probe};
use grammar::{any_of, condition, literal, quoted, regex, Grammar, Pattern};
use ir::{Messages, Risk};
use loader::{LanguageSpec, ANY};
use std::collections::BTreeSet;

use super::with_strings;

fn check(
    id: &str,
    description: &str,
    risk: Risk,
    lang: &LanguageSpec,
    messages: Messages,
    probe: Probe,
) -> Check {
    Check::new(&format!("text.{id}"), description, risk, lang, messages, probe)
}

fn search(text: &str, use_regex: bool) -> anyhow::Result<Pattern> {
    if use_regex {
        regex(&format!("(?i:{text})"))
    } else {
        Ok(literal(text))
    }
}

fn search_any(texts: &[&str], use_regex: bool) -> anyhow::Result<Pattern> {
    let unique: BTreeSet<&str> = texts.iter().copied().collect();
    let alternatives = unique
        .into_iter()
        .map(|t| search(t, use_regex))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(any_of(alternatives))
}

fn grammar(lang: &LanguageSpec, root: Pattern) -> anyhow::Result<Grammar> {
    with_strings(lang, root)
}

/// Vulnerable where `expected` appears.
pub fn has_text(expected: &str, use_regex: bool, lang: &LanguageSpec) -> anyhow::Result<Check> {
    Ok(check(
        "has_text",
        "Bad text present",
        Risk::Low,
        lang,
        Messages::new("Bad text present in code", "Bad text not present in code"),
        Probe::Matches(grammar(lang, search(expected, use_regex)?)?),
    ))
}

/// Vulnerable in every file where `expected` is missing.
pub fn has_not_text(
    expected: &str,
    use_regex: bool,
    lang: &LanguageSpec,
) -> anyhow::Result<Check> {
    Ok(check(
        "has_not_text",
        "Required text missing",
        Risk::Low,
        lang,
        Messages::new(
            "Expected text not present in code",
            "Expected text present in code",
        ),
        Probe::Lacks(grammar(lang, search(expected, use_regex)?)?),
    ))
}

/// Vulnerable only when every text of `expected` appears somewhere.
pub fn has_all_text(
    expected: &[&str],
    use_regex: bool,
    lang: &LanguageSpec,
) -> anyhow::Result<Check> {
    let unique: BTreeSet<&str> = expected.iter().copied().collect();
    if unique.is_empty() {
        anyhow::bail!("has_all_text needs at least one text");
    }
    let grammars = unique
        .into_iter()
        .map(|t| grammar(lang, search(t, use_regex)?))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(check(
        "has_all_text",
        "All bad texts present",
        Risk::Low,
        lang,
        Messages::new(
            "A bad text from list was found in code",
            "Not all expected text was found in code",
        ),
        Probe::MatchesAll(grammars),
    ))
}

pub fn has_any_text(
    expected: &[&str],
    use_regex: bool,
    lang: &LanguageSpec,
) -> anyhow::Result<Check> {
    Ok(check(
        "has_any_text",
        "Any bad text present",
        Risk::Low,
        lang,
        Messages::new(
            "Any of the expected bad text is present in code",
            "None of the expected strings were found in code",
        ),
        Probe::Matches(grammar(lang, search_any(expected, use_regex)?)?),
    ))
}

/// Vulnerable in every file that holds none of `expected`.
pub fn has_not_any_text(
    expected: &[&str],
    use_regex: bool,
    lang: &LanguageSpec,
) -> anyhow::Result<Check> {
    Ok(check(
        "has_not_any_text",
        "All required texts missing",
        Risk::Low,
        lang,
        Messages::new(
            "None of the expected texts were found in code",
            "Any of the expected texts are present in code",
        ),
        Probe::Lacks(grammar(lang, search_any(expected, use_regex)?)?),
    ))
}

/// `plaintext` hardcoded in base64 form.
pub fn has_weak_cipher(plaintext: &str, lang: &LanguageSpec) -> anyhow::Result<Check> {
    let encoded = general_purpose::STANDARD.encode(plaintext.as_bytes());
    Ok(check(
        "has_weak_cipher",
        "Confidential data encoded in base64",
        Risk::Medium,
        lang,
        Messages::new(
            "Code has confidential data encoded in base64",
            "Code does not have confidential data encoded in base64",
        ),
        Probe::Matches(grammar(lang, literal(&encoded))?),
    ))
}

pub fn has_secret(secret: &str, use_regex: bool, lang: &LanguageSpec) -> anyhow::Result<Check> {
    Ok(check(
        "has_secret",
        "Hardcoded secret",
        Risk::High,
        lang,
        Messages::new("Secret found in code", "Secret not found in code"),
        Probe::Matches(grammar(lang, search(secret, use_regex)?)?),
    ))
}

pub fn has_any_secret(
    secrets: &[&str],
    use_regex: bool,
    lang: &LanguageSpec,
) -> anyhow::Result<Check> {
    Ok(check(
        "has_any_secret",
        "Any of several hardcoded secrets",
        Risk::High,
        lang,
        Messages::new(
            "Some of the expected secrets are present in code",
            "None of the expected secrets were found in code",
        ),
        Probe::Matches(grammar(lang, search_any(secrets, use_regex)?)?),
    ))
}

/// The target path itself is the finding.
pub fn file_exists() -> Check {
    check(
        "file_exists",
        "File present",
        Risk::Low,
        &ANY,
        Messages::new("File exists", "File does not exist"),
        Probe::Exists,
    )
}

pub fn file_does_not_exist() -> Check {
    check(
        "file_does_not_exist",
        "File absent",
        Risk::Low,
        &ANY,
        Messages::new("File does not exist", "File exists"),
        Probe::Missing,
    )
}

fn is_plain_websocket(toks: &[grammar::Token<'_>]) -> bool {
    toks.first().is_some_and(|t| {
        t.text
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("ws://"))
    })
}

/// Quoted `ws://` URIs.
pub fn uses_unencrypted_sockets(lang: &LanguageSpec) -> anyhow::Result<Check> {
    let uri = condition(
        any_of([quoted('"'), quoted('\'')]),
        "unencrypted websocket",
        is_plain_websocket,
    );
    Ok(check(
        "uses_unencrypted_sockets",
        "Web sockets over plain channels",
        Risk::Medium,
        lang,
        Messages::new(
            "Code uses web sockets over an unencrypted channel",
            "Code does not use web sockets over an unencrypted channel",
        ),
        Probe::Matches(grammar(lang, uri)?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::SourceCache;
    use ir::Status;
    use loader::JAVA;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn literal_and_regex_searches() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.cfg"), "password = Hunter2\n")?;
        let mut cache = SourceCache::new();

        let lit = has_text("hunter2", false, &ANY)?;
        assert_eq!(lit.run(dir.path(), &[], &mut cache)?.status, Status::Closed);
        let re = has_text("hunter[0-9]", true, &ANY)?;
        let res = re.run(dir.path(), &[], &mut cache)?;
        assert_eq!(res.status, Status::Open);
        assert_eq!(res.message, "Bad text present in code");
        Ok(())
    }

    #[test]
    fn language_comments_are_skipped() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("A.java"), "// TODO remove key\nint x;\n")?;
        fs::write(dir.path().join("notes.txt"), "TODO remove key\n")?;
        let c = has_text("remove key", false, &JAVA)?;
        let res = c.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Closed);
        assert_eq!(res.safes.len(), 1);
        Ok(())
    }

    #[test]
    fn strings_stay_searchable() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("A.java"), "String k = \"AKIA0000\";\n")?;
        let c = has_secret("AKIA0000", false, &JAVA)?;
        let res = c.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Open);
        assert_eq!(res.vulnerabilities[0].specific, vec![1]);
        Ok(())
    }

    #[test]
    fn weak_cipher_looks_for_the_encoding() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.js"), "const p = 'c2VjcmV0';\n")?;
        let c = has_weak_cipher("secret", &ANY)?;
        let res = c.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Open);
        Ok(())
    }

    #[test]
    fn not_any_text_is_per_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "Copyright 2024\n")?;
        fs::write(dir.path().join("b.txt"), "nothing here\n")?;
        let c = has_not_any_text(&["Copyright", "SPDX"], false, &ANY)?;
        let res = c.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Open);
        assert_eq!(res.vulnerabilities.len(), 1);
        assert!(res.vulnerabilities[0].location.ends_with("b.txt"));
        Ok(())
    }

    #[test]
    fn any_secret_and_all_text() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("s.env"), "A=1\nTOKEN=abc\n")?;
        let any = has_any_secret(&["TOKEN=abc", "KEY=xyz"], false, &ANY)?;
        let res = any.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.vulnerabilities[0].specific, vec![2]);

        let all = has_all_text(&["A=1", "KEY=xyz"], false, &ANY)?;
        let res = all.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Closed);
        assert_eq!(res.message, "Not all expected text was found in code");
        assert!(has_all_text(&[], false, &ANY).is_err());
        assert!(has_any_text(&[], false, &ANY).is_err());
        Ok(())
    }

    #[test]
    fn websocket_schemes() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("ws.js"),
            "const a = \"wss://safe\";\n// 'ws://commented'\nconst b = 'WS://plain';\n",
        )?;
        let c = uses_unencrypted_sockets(&loader::JAVASCRIPT)?;
        let res = c.run(dir.path(), &[], &mut SourceCache::new())?;
        assert_eq!(res.status, Status::Open);
        assert_eq!(res.vulnerabilities[0].specific, vec![3]);
        Ok(())
    }

    #[test]
    fn missing_file_check() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let res = file_does_not_exist().run(
            &dir.path().join("SECURITY.md"),
            &[],
            &mut SourceCache::new(),
        )?;
        assert_eq!(res.status, Status::Open);
        assert_eq!(res.message, "File does not exist");
        Ok(())
    }
}
