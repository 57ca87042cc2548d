use clap::{Args as ClapArgs, Parser, Subcommand};
use ir::Risk;
use std::path::PathBuf;

use crate::output::Format;

fn parse_risk(s: &str) -> Result<Risk, String> {
    s.parse()
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Asserts - grammar based scanner for weaknesses in source code",
    long_about = "Asserts runs declarative checks over source trees and reports, per check, whether the weakness is OPEN, CLOSED or UNKNOWN together with the files and lines that justify it.

Features:
• Built-in checks for Java, C#, JavaScript/TypeScript, Python and PHP
• Comment and string aware matching
• Custom text rules in YAML or JSON
• Multiple output formats (Text, JSON, SARIF)
• Inline suppression with `// nosec` or `# nosec`

Examples:
  asserts scan .                                    # Run every check
  asserts scan src/ --language java --format json   # Java checks only
  asserts scan . --check python.uses_insecure_functions
  asserts checks --language csharp                  # List C# checks",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run checks against a file or directory
    Scan(ScanArgs),
    /// List the built-in checks
    Checks(ChecksArgs),
    /// Work with custom rule files
    #[command(subcommand, alias = "rule")]
    Rules(RulesCmd),
}

#[derive(ClapArgs)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,
    /// Run only these checks (repeatable)
    #[arg(long = "check")]
    pub checks: Vec<String>,
    /// Run only the built-in checks for these languages (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,
    /// Rule file or directory of rule files
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Skip paths containing any of these substrings
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// Output format for scan results
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Exit with error code if a check of this risk or higher is open
    #[arg(long = "fail-on", value_parser = parse_risk)]
    pub fail_on: Option<Risk>,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(ClapArgs)]
pub struct ChecksArgs {
    /// Only list checks for this language
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Subcommand)]
pub enum RulesCmd {
    /// Verify that rule files load and compile
    Verify {
        /// Path to the rule file or directory
        path: PathBuf,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
