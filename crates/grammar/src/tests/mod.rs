use super::*;

fn starts(grammar: &Grammar, text: &str) -> Vec<usize> {
    grammar.scan(text).map(|m| m.start).collect()
}

fn texts<'t>(m: &Match<'t>) -> Vec<&'t str> {
    m.tokens.iter().map(|t| t.text).collect()
}

fn system_exit() -> Grammar {
    Grammar::new(sequence([literal("System"), literal("."), keyword("exit")]))
        .unwrap()
        .ignore_all(c_style_comments())
        .ignore(Region::quoted('"'))
}

#[test]
fn keyword_respects_identifier_boundaries() {
    let g = Grammar::new(keyword("exit")).unwrap();
    assert_eq!(starts(&g, "exit exits sysexit exit("), vec![0, 19]);
}

#[test]
fn caseless_literal_ignores_ascii_case() {
    let g = Grammar::new(caseless_literal("md5.Create")).unwrap();
    assert!(g.search("var h = MD5.create();").is_some());
    let exact = Grammar::new(literal("md5.Create")).unwrap();
    assert!(exact.search("var h = MD5.create();").is_none());
}

#[test]
fn comments_and_strings_are_never_matched() {
    let text = "// uses System.exit() sometimes\n\
                String s = \"System.exit(1)\";\n\
                /* System.exit */ System.exit(0);\n";
    let found = starts(&system_exit(), text);
    let expected = text.find("*/ System").unwrap() + 3;
    assert_eq!(found, vec![expected]);
}

#[test]
fn whitespace_between_terminals_is_skipped() {
    assert_eq!(starts(&system_exit(), "System .\n  exit(2);").len(), 1);
}

#[test]
fn skip_over_keeps_urls_out_of_comments() {
    let text = "connect(\"http://host\");";
    let plain = Grammar::new(keyword("host"))
        .unwrap()
        .ignore_all(c_style_comments());
    assert!(plain.search(text).is_none());

    let lexed = plain.skip_over(Region::quoted('"'));
    assert!(lexed.search(text).is_some());
}

#[test]
fn nested_default_content_collects_inner_tokens() {
    let g = Grammar::new(sequence([keyword("catch"), parens(), nested('{', '}')])).unwrap();
    let m = g
        .search("try { a(); } catch (Exception e) { }")
        .expect("catch clause");
    assert_eq!(texts(&m), vec!["catch", "Exception", "e"]);
}

#[test]
fn nested_default_content_spans_inner_groups() {
    let g = Grammar::new(sequence([keyword("switch"), parens(), nested('{', '}')])).unwrap();
    let text = "switch (x) { case 1: { f(\"}\"); break; } default: g(); }";
    let m = g.search(text).expect("switch");
    assert_eq!(m.end, text.len());
    assert!(m.joined().contains("default:"));
}

#[test]
fn nested_with_content_only_accepts_that_content() {
    let g = Grammar::new(sequence([
        keyword("catch"),
        nested_with(
            '(',
            ')',
            sequence([
                one_of(&["Exception", "SystemException"], false),
                optional(identifier()),
            ]),
        ),
    ]))
    .unwrap();
    assert!(g.search("catch (Exception ex) {}").is_some());
    assert!(g.search("catch (Exception) {}").is_some());
    assert!(g.search("catch (IOException ex) {}").is_none());
    assert!(g.search("catch").is_none());
}

#[test]
fn ordered_choice_does_not_backtrack() {
    let choice = Grammar::new(any_of([literal("a"), literal("ab")])).unwrap();
    let m = choice.search("ab").unwrap();
    assert_eq!(texts(&m), vec!["a"]);

    let seq = Grammar::new(sequence([
        any_of([literal("a"), literal("ab")]),
        literal("c"),
    ]))
    .unwrap();
    assert!(seq.search("abc").is_none());
}

#[test]
fn negative_lookahead_consumes_nothing() {
    let g = Grammar::new(sequence([
        keyword("new"),
        not_(keyword("SecureRandom")),
        identifier(),
    ]))
    .unwrap();
    let found: Vec<_> = g.scan("new Random(); new SecureRandom();").collect();
    assert_eq!(found.len(), 1);
    assert_eq!(texts(&found[0]), vec!["new", "Random"]);
}

#[test]
fn delimited_list_drops_delimiters() {
    let g = Grammar::new(sequence([
        keyword("catch"),
        literal("("),
        condition(
            delimited(identifier(), literal("|")),
            "names",
            |toks| toks.iter().any(|t| t.text == "IOException"),
        ),
        identifier(),
        literal(")"),
    ]))
    .unwrap();
    let m = g.search("catch (SQLException | IOException e)").unwrap();
    assert_eq!(
        texts(&m),
        vec!["catch", "(", "SQLException", "IOException", "e", ")"]
    );
    assert!(g.search("catch (SQLException | TimeoutException e)").is_none());
}

#[test]
fn skip_to_yields_the_skipped_text() {
    let g = Grammar::new(sequence([
        skip_to(literal("=")),
        literal("="),
        keyword("ECB"),
    ]))
    .unwrap();
    let m = g.search("mode = ECB").unwrap();
    assert_eq!(m.start, 0);
    assert_eq!(texts(&m), vec!["mode", "=", "ECB"]);
}

#[test]
fn suppress_drops_tokens() {
    let g = Grammar::new(sequence([suppress(keyword("return")), identifier()])).unwrap();
    let m = g.search("return value").unwrap();
    assert_eq!(texts(&m), vec!["value"]);
}

#[test]
fn condition_refines_quoted_strings() {
    let g = Grammar::new(condition(quoted('"'), "websocket", |toks| {
        toks[0].text.starts_with("ws://")
    }))
    .unwrap();
    let found: Vec<_> = g.scan("a = \"wss://x\"; b = \"ws://y\";").collect();
    assert_eq!(found.len(), 1);
    assert_eq!(texts(&found[0]), vec!["ws://y"]);
}

#[test]
fn is_match_requires_the_whole_text() {
    let g = Grammar::new(sequence([keyword("Random"), identifier()])).unwrap();
    assert!(g.is_match("  Random rnd \n"));
    assert!(!g.is_match("Random rnd = x"));
}

#[test]
fn regex_is_anchored_at_the_scan_position() {
    let g = Grammar::new(regex("[0-9]+").unwrap()).unwrap();
    let found: Vec<_> = g.scan("a1 b22 c333").map(|m| m.tokens[0].text).collect();
    assert_eq!(found, vec!["1", "22", "333"]);
}

#[test]
fn malformed_grammars_are_rejected() {
    assert!(regex("(").is_err());
    assert!(Grammar::new(literal("")).is_err());
    assert!(Grammar::new(nested('(', '(')).is_err());
    assert!(Grammar::new(sequence(Vec::new())).is_err());
    assert!(Grammar::new(word(CharSet::chars(""), CharSet::alphas())).is_err());
}

#[test]
fn tabs_are_single_characters() {
    let g = Grammar::new(keyword("exit")).unwrap();
    let text = "\tfoo\n\t\texit";
    assert_eq!(starts(&g, text), vec![text.find("exit").unwrap()]);
}

#[test]
fn matches_do_not_overlap() {
    let g = Grammar::new(literal("aa")).unwrap();
    assert_eq!(starts(&g, "aaaa"), vec![0, 2]);
    assert_eq!(starts(&g, "aaa"), vec![0]);
}

#[test]
fn line_comment_continues_after_backslash() {
    let spans = lex("// a \\\nb\nc", &[Region::line_comment("//")], &[]);
    assert_eq!(spans, vec![Span { start: 0, end: 8 }]);
}

#[test]
fn unterminated_quote_is_not_a_region() {
    let spans = lex("x = \"abc\ny\"", &[Region::quoted('"')], &[]);
    assert!(spans.is_empty());
}

#[test]
fn unterminated_block_comment_runs_to_the_end() {
    let text = "a /* b\nc";
    let spans = lex(text, &c_style_comments(), &[]);
    assert_eq!(spans, vec![Span { start: 2, end: text.len() }]);
}

#[test]
fn docstrings_are_ignored_when_multiline() {
    let g = Grammar::new(keyword("exec"))
        .unwrap()
        .ignore(Region::multiline_quoted("\"\"\""))
        .ignore_all(python_comments());
    let text = "\"\"\"doc\nexec()\"\"\"\n# exec\nexec(x)";
    assert_eq!(starts(&g, text), vec![text.rfind("exec").unwrap()]);
}

#[test]
fn grammars_are_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<Grammar>();
}

#[test]
fn only_ascii_whitespace_separates_tokens() {
    let g = Grammar::new(sequence([literal("a"), literal("b")])).unwrap();
    assert!(g.search("a \t\r\nb").is_some());
    assert!(g.search("a\u{a0}b").is_none());
    assert!(g.search("a\u{85}b").is_none());
}

#[test]
fn cursor_parses_only_at_the_given_offset() {
    let g = Grammar::new(sequence([keyword("if"), parens(), keyword("else")])).unwrap();
    let text = "x; if (a) else; if (b) y;";
    let cursor = g.cursor(text);
    let first = text.find("if").unwrap();
    let second = text.rfind("if").unwrap();
    let m = cursor.parse_at(first).unwrap();
    assert_eq!(m.start, first);
    assert_eq!(texts(&m)[0], "if");
    assert!(cursor.parse_at(second).is_none());
    assert!(cursor.parse_at(0).is_none());
    assert_eq!(cursor.search_from(0).map(|m| m.start), Some(first));
    assert!(cursor.search_from(first + 1).is_none());
}

#[test]
fn cursor_keeps_regions_of_the_whole_text() {
    let g = Grammar::new(keyword("exit"))
        .unwrap()
        .ignore(Region::quoted('"'));
    let text = "s = \"exit\"; exit";
    let cursor = g.cursor(text);
    assert!(cursor.parse_at(text.find("exit").unwrap()).is_none());
    assert_eq!(cursor.search_from(0).map(|m| m.start), text.rfind("exit"));
}
