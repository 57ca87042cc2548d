//! Custom text checks declared in YAML or JSON files.

use anyhow::{anyhow, bail, Context};
use grammar::{any_of, caseless_literal, literal, regex, Grammar, Pattern};
use ir::{Messages, Risk};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::language::LanguageSpec;
use crate::walk::visit;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
/// Top level of a rule file.
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Rule as written in a rule file.
pub struct RuleDef {
    pub id: String,
    /// Reported when the rule matches.
    pub message: String,
    /// Reported when scanned files do not match.
    pub safe_message: Option<String>,
    pub description: Option<String>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Patterns are regular expressions rather than plain text.
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub caseless: bool,
    pub risk: Option<String>,
    /// Language whose comments are skipped and whose extensions apply.
    pub language: Option<String>,
    /// Overrides the language's extensions.
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone)]
/// Rule compiled to a grammar, ready to scan.
pub struct TextRule {
    pub id: String,
    pub description: String,
    pub messages: Messages,
    pub risk: Risk,
    pub grammar: Grammar,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub source_file: PathBuf,
}

/// Reads a rule file, or every `.yaml`, `.yml` and `.json` file under a
/// directory, and compiles the rules found.
///
/// # Example
/// ```no_run
/// use loader::load_rules;
/// let rules = load_rules(std::path::Path::new("rules")).unwrap();
/// assert!(!rules.is_empty());
/// ```
pub fn load_rules(path: &Path) -> anyhow::Result<Vec<TextRule>> {
    let mut rules = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let excl = |p: &Path| {
        p.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name == ".git")
            .unwrap_or(false)
    };
    visit(path, &excl, &mut |file| {
        let name = file.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let parsed: RuleFile = if name.ends_with(".yaml") || name.ends_with(".yml") {
            debug!(file = %file.display(), "Parsing YAML rule file");
            let data = fs::read_to_string(file)
                .with_context(|| format!("Failed to read rule file: {}", file.display()))?;
            serde_yaml::from_str(&data)
                .with_context(|| format!("Failed to parse rule file: {}", file.display()))?
        } else if name.ends_with(".json") {
            debug!(file = %file.display(), "Parsing JSON rule file");
            let data = fs::read_to_string(file)
                .with_context(|| format!("Failed to read rule file: {}", file.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse rule file: {}", file.display()))?
        } else {
            debug!(file = %file.display(), "Not a rule file");
            return Ok(());
        };
        for def in parsed.rules {
            if !seen_ids.insert(def.id.clone()) {
                bail!("duplicate rule id: {}", def.id);
            }
            let id = def.id.clone();
            let rule = compile_rule(def, file)
                .with_context(|| format!("Invalid rule '{id}' in {}", file.display()))?;
            rules.push(rule);
        }
        Ok(())
    })?;
    debug!(count = rules.len(), "Rule files compiled");
    Ok(rules)
}

fn compile_rule(def: RuleDef, file: &Path) -> anyhow::Result<TextRule> {
    let risk = match def.risk.as_deref() {
        Some(r) => r.parse::<Risk>().map_err(|e: String| anyhow!(e))?,
        None => Risk::Medium,
    };
    let language = match def.language.as_deref() {
        Some(name) => Some(
            LanguageSpec::by_name(name).ok_or_else(|| anyhow!("unknown language '{name}'"))?,
        ),
        None => None,
    };

    let sources: Vec<String> = def.pattern.into_iter().chain(def.patterns).collect();
    if sources.is_empty() {
        bail!("rule has neither pattern nor patterns");
    }
    let mut alternatives = sources
        .iter()
        .map(|s| {
            if def.regex {
                let src = if def.caseless {
                    format!("(?i:{s})")
                } else {
                    s.clone()
                };
                regex(&src)
            } else if def.caseless {
                Ok(caseless_literal(s))
            } else {
                Ok(literal(s))
            }
        })
        .collect::<anyhow::Result<Vec<Pattern>>>()?;
    let root = if alternatives.len() == 1 {
        alternatives.remove(0)
    } else {
        any_of(alternatives)
    };

    let mut grammar = Grammar::new(root)?;
    if let Some(lang) = language {
        grammar = grammar
            .ignore_all(lang.comments())
            .skip_over_all(lang.literals());
    }
    let extensions = match (def.extensions, language) {
        (Some(exts), _) => exts,
        (None, Some(lang)) => lang.extension_list(),
        (None, None) => Vec::new(),
    };
    let safe = def
        .safe_message
        .unwrap_or_else(|| format!("No match for rule {}", def.id));

    Ok(TextRule {
        description: def.description.unwrap_or_else(|| def.message.clone()),
        messages: Messages::new(def.message, safe),
        id: def.id,
        risk,
        grammar,
        extensions,
        exclude: def.exclude,
        source_file: file.to_path_buf(),
    })
}
