// textsub-core/tests/engine_integration_tests.rs
use textsub_core::{
    rewrite_string, FilterSpec, FoldEngine, ReplaceSpec, ReplaceStep, ReplacementRule,
    RewriteEngine, SubstitutionPair,
};

#[test]
fn test_single_rule_scenario() {
    let declarations = vec![ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar"))];
    assert_eq!(rewrite_string(&declarations, "let x = FOO;", "a.js"), "let x = bar;");
    assert_eq!(rewrite_string(&declarations, "let x = FOO;", "b.js"), "let x = FOO;");
}

#[test]
fn test_multi_substitution_scenario() {
    let declarations = vec![ReplacementRule::new(
        vec!["x.js", "y.js"],
        ReplaceSpec::Many(vec![
            ReplaceStep::Pair(SubstitutionPair::new("A", 1i64)),
            ReplaceStep::Pair(SubstitutionPair::new("B", 2i64)),
        ]),
    )];
    assert_eq!(rewrite_string(&declarations, "AB", "x.js"), "12");
}

#[test]
fn test_escaped_literals_never_act_as_pattern_operators() {
    // Both the filter and the `from` value are full of pattern-special
    // characters; everything must behave as exact literal matching.
    let declarations = vec![ReplacementRule::new(
        "pkg/(v1)/index.js",
        SubstitutionPair::new("require('./a|b')", "require('./ab')"),
    )];
    let rewritten = rewrite_string(
        &declarations,
        "const m = require('./a|b');",
        "pkg/(v1)/index.js",
    );
    assert_eq!(rewritten, "const m = require('./ab');");

    // A key that only matches if `(` `)` were treated as a group.
    assert_eq!(
        rewrite_string(&declarations, "const m = require('./a|b');", "pkg/v1/index.js"),
        "const m = require('./a|b');"
    );
}

#[test]
fn test_order_is_rule_then_rule_never_interleaved() {
    // Rule 1 swaps A->B everywhere, then rule 2 swaps B->C everywhere. If the
    // engine interleaved per-occurrence, "A B" could not end up as "C C".
    let declarations = vec![
        ReplacementRule::new("k.js", SubstitutionPair::new("A", "B")),
        ReplacementRule::new("k.js", SubstitutionPair::new("B", "C")),
    ];
    assert_eq!(rewrite_string(&declarations, "A B", "k.js"), "C C");
}

#[test]
fn test_mixed_pairs_and_functions_fold_in_declaration_order() {
    let declarations = vec![ReplacementRule::new(
        "m.js",
        ReplaceSpec::Many(vec![
            ReplaceStep::Pair(SubstitutionPair::new("one", "two")),
            ReplaceStep::func(|text, _| format!("{};", text)),
            ReplaceStep::Pair(SubstitutionPair::new("two;", "three")),
        ]),
    )];
    assert_eq!(rewrite_string(&declarations, "one", "m.js"), "three");
}

#[test]
fn test_predicate_filter_rewrites_like_a_pattern_filter() {
    let declarations = vec![ReplacementRule::new(
        FilterSpec::predicate(|key| key.starts_with("virtual:")),
        SubstitutionPair::new("PLACEHOLDER", "value"),
    )];
    assert_eq!(rewrite_string(&declarations, "PLACEHOLDER", "virtual:env"), "value");
    assert_eq!(rewrite_string(&declarations, "PLACEHOLDER", "real/env.js"), "PLACEHOLDER");
}

#[test]
fn test_engine_output_stable_across_recompiles() {
    let declarations = vec![ReplacementRule::new(
        vec!["x.js", "y.js"],
        SubstitutionPair::new(vec!["A", "B"], "_"),
    )];
    let first = FoldEngine::new(&declarations);
    let second = FoldEngine::new(&declarations);
    assert_eq!(first.rewrite("A-B", "y.js"), second.rewrite("A-B", "y.js"));
    assert_eq!(first.rewrite("A-B", "y.js"), "_-_");
}

#[test]
fn test_map_identity_shape_over_final_text() {
    let declarations = vec![ReplacementRule::new(
        "a.js",
        SubstitutionPair::new("FOO", "bar\nbaz"),
    )];
    let rewritten = FoldEngine::new(&declarations).rewrite_with_map("FOO", "a.js");
    assert_eq!(rewritten.text, "bar\nbaz");
    let map = rewritten.map.unwrap();
    assert_eq!(map.version, 3);
    assert_eq!(map.mappings, "AAAA;AACA");
    assert_eq!(map.sources_content, vec!["bar\nbaz".to_string()]);
}
