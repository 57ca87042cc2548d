use engine::Check;
use loader::{LanguageSpec, ANY};
use tracing::debug;

use crate::languages::{csharp, java, javascript, php, python, text};

type Constructor = fn() -> anyhow::Result<Check>;

const CONSTRUCTORS: &[Constructor] = &[
    java::has_generic_exceptions,
    java::uses_print_stack_trace,
    java::swallows_exceptions,
    java::has_switch_without_default,
    java::has_insecure_randoms,
    java::has_if_without_else,
    java::uses_md5_hash,
    java::uses_sha1_hash,
    java::uses_des_algorithm,
    java::has_log_injection,
    java::uses_system_exit,
    csharp::has_generic_exceptions,
    csharp::swallows_exceptions,
    csharp::has_switch_without_default,
    csharp::has_insecure_randoms,
    csharp::has_if_without_else,
    csharp::uses_md5_hash,
    csharp::uses_sha1_hash,
    csharp::uses_ecb_encryption_mode,
    csharp::uses_debug_writeline,
    csharp::uses_console_writeline,
    javascript::uses_console_log,
    javascript::uses_eval,
    javascript::uses_localstorage,
    javascript::has_insecure_randoms,
    javascript::swallows_exceptions,
    javascript::has_switch_without_default,
    python::has_generic_exceptions,
    python::swallows_exceptions,
    python::uses_insecure_functions,
    python::uses_insecure_random,
    php::has_preg_ce,
    php::uses_eval,
    php::uses_shell_execution,
    unencrypted_sockets,
];

fn unencrypted_sockets() -> anyhow::Result<Check> {
    text::uses_unencrypted_sockets(&ANY)
}

/// Every check that needs no arguments, in a stable order.
pub fn catalog() -> anyhow::Result<Vec<Check>> {
    let checks = CONSTRUCTORS
        .iter()
        .map(|build| build())
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!(count = checks.len(), "Catalog built");
    Ok(checks)
}

/// Catalog checks written for `lang`.
pub fn for_language(lang: &LanguageSpec) -> anyhow::Result<Vec<Check>> {
    Ok(catalog()?
        .into_iter()
        .filter(|c| c.language == lang.name)
        .collect())
}

/// Looks a catalog check up by id.
pub fn find(id: &str) -> anyhow::Result<Option<Check>> {
    Ok(catalog()?.into_iter().find(|c| c.id == id))
}
