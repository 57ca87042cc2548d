use engine::{scan_blocks, BlockCheck, BlockRule};
use grammar::{any_of, keyword, literal, nested, parens, sequence, skip_to, Grammar};
use loader::{SourceFile, JAVA};
use regex::Regex;
use std::path::Path;
use std::time::{Duration, Instant};

fn java(root: grammar::Pattern) -> Grammar {
    Grammar::new(root)
        .unwrap()
        .ignore_all(JAVA.comments())
        .ignore_all(JAVA.literals())
}

fn source(text: &str) -> SourceFile {
    SourceFile::from_bytes(Path::new("Block.java"), text.as_bytes())
}

#[test]
fn empty_catch_is_reported_at_its_head() {
    let text = [
        "try {",
        "  a();",
        "} catch (IOException e) {",
        "  // ignored",
        "}",
        "try {",
        "  b();",
        "} catch (Exception e) { log(e); }",
    ]
    .join("\n");
    let head = java(sequence([keyword("catch"), parens()]));
    let block = BlockCheck::new(java(nested('{', '}')), BlockRule::Empty);
    assert_eq!(scan_blocks(&source(&text), &head, &block).lines, vec![3]);
}

#[test]
fn switch_without_default() {
    let text = "switch (a) { case 1: x(); break; }\n\
                switch (b) { case 1: y(); break; default: z(); }\n";
    let head = java(sequence([keyword("switch"), parens()]));
    let block = BlockCheck::new(
        java(nested('{', '}')),
        BlockRule::Lacks(Regex::new(r"default\s*:").unwrap()),
    );
    assert_eq!(scan_blocks(&source(text), &head, &block).lines, vec![1]);
}

#[test]
fn default_inside_a_string_does_not_count() {
    let text = "switch (a) { case 1: log(\"default:\"); }\n";
    let head = java(sequence([keyword("switch"), parens()]));
    let block = BlockCheck::new(
        java(nested('{', '}')),
        BlockRule::Lacks(Regex::new(r"default\s*:").unwrap()),
    );
    assert_eq!(scan_blocks(&source(text), &head, &block).lines, vec![1]);
}

fn if_without_else() -> (Grammar, BlockCheck) {
    let head = java(sequence([keyword("if"), parens()]));
    let body = java(sequence([
        keyword("if"),
        parens(),
        any_of([nested('{', '}'), sequence([skip_to(literal(";")), literal(";")])]),
        keyword("else"),
    ]));
    (head, BlockCheck::new(body, BlockRule::Empty).anchored())
}

#[test]
fn anchored_body_must_start_at_the_head() {
    let text = "if (a) {\n  x();\n}\nif (b) { y(); } else { z(); }\n";
    let (head, block) = if_without_else();
    assert_eq!(scan_blocks(&source(text), &head, &block).lines, vec![1]);
}

#[test]
fn many_heads_in_one_large_file() {
    let text: String = (0..4000)
        .map(|n| format!("if (a{n} > 0) {{ b(); }}\n"))
        .collect();
    let (head, block) = if_without_else();
    let started = Instant::now();
    let lines = scan_blocks(&source(&text), &head, &block).lines;
    assert_eq!(lines, (1..=4000).collect::<Vec<_>>());
    assert!(started.elapsed() < Duration::from_secs(20));
}

#[test]
fn suppression_applies_to_block_heads() {
    let text = "try { a(); } catch (E e) { } // nosec\ntry { b(); } catch (E e) { }\n";
    let head = java(sequence([keyword("catch"), parens()]));
    let block = BlockCheck::new(java(nested('{', '}')), BlockRule::Empty);
    assert_eq!(scan_blocks(&source(text), &head, &block).lines, vec![2]);
}

#[test]
fn unanchored_search_looks_past_the_head() {
    let block = BlockCheck::new(java(nested('{', '}')), BlockRule::Empty);
    assert!(!block.is_vulnerable("catch (E e) { handle(); }"));
    assert!(block.is_vulnerable("catch (E e) { /* nothing */ }"));
    assert!(block.is_vulnerable("catch (E e);"));
}
