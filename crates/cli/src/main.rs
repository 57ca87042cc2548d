//! Entry point for the command-line interface.
//! Delegates to dedicated modules for argument handling,
//! scanning logic, rule verification and output formatting.

use asserts::args::{parse_cli, Commands, RulesCmd};
use asserts::rules::{list_checks, verify_rules};
use asserts::scan::run_scan;

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Checks(args) => list_checks(args.language.as_deref()),
        Commands::Rules(RulesCmd::Verify { path }) => verify_rules(&path),
    }
}
