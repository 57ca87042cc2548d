//! Inputs of a scan: the files under a target, their decoded contents, the
//! conventions of each source language and user supplied rule files.

mod language;
mod rules;
mod source;
mod walk;

pub use language::{LanguageSpec, ANY, CSHARP, JAVA, JAVASCRIPT, PHP, PYTHON};
pub use rules::{load_rules, RuleDef, RuleFile, TextRule};
pub use source::SourceFile;
pub use walk::{paths, visit, PathNotFound, Paths};
