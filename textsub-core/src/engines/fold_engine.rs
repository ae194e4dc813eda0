// textsub-core/src/engines/fold_engine.rs
//! A `RewriteEngine` implementation that folds each matching rule's
//! transforms over the running text, in declaration order.

use std::sync::Arc;
use log::debug;

use crate::compiler::{compile_rules, CompiledRules};
use crate::config::ReplacementRule;
use crate::engine::{RewriteEngine, Rewritten};
use crate::sourcemap::SourceMap;

/// The standard folding engine.
///
/// Holds an immutable, shared rule set; cloning is cheap and every clone
/// applies the same rules. The engine is stateless across invocations: each
/// call is purely a function of (compiled rules, text, key).
#[derive(Debug, Clone)]
pub struct FoldEngine {
    rules: Arc<CompiledRules>,
}

impl FoldEngine {
    /// Compiles `declarations` eagerly and builds an engine over the result.
    pub fn new(declarations: &[ReplacementRule]) -> Self {
        Self::with_rules(Arc::new(compile_rules(declarations)))
    }

    /// Builds an engine over an already-compiled, shared rule set.
    pub fn with_rules(rules: Arc<CompiledRules>) -> Self {
        Self { rules }
    }

    fn fold_all(&self, text: &str, key: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules.rules {
            if rule.predicate.matches(key) {
                debug!(
                    "Applying rule '{}' to '{}'.",
                    rule.id.as_deref().unwrap_or("<unnamed>"),
                    key
                );
                current = rule.fold(current, key);
            }
        }
        current
    }
}

impl RewriteEngine for FoldEngine {
    fn rewrite(&self, text: &str, key: &str) -> String {
        self.fold_all(text, key)
    }

    /// The map is generated from the final text alone: one identity segment
    /// per output line, with the final text as the recorded source content.
    /// It satisfies the "mapping requested" contract but cannot represent
    /// how multi-step substitutions shifted positions; consumers needing
    /// faithful positions must track them through each transform themselves.
    fn rewrite_with_map(&self, text: &str, key: &str) -> Rewritten {
        let text = self.fold_all(text, key);
        let map = SourceMap::identity_for(key, &text);
        Rewritten { text, map: Some(map) }
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReplaceSpec, ReplaceStep, SubstitutionPair};

    fn engine(declarations: Vec<ReplacementRule>) -> FoldEngine {
        FoldEngine::new(&declarations)
    }

    #[test]
    fn substitutes_on_matching_key_only() {
        let e = engine(vec![ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar"))]);
        assert_eq!(e.rewrite("let x = FOO;", "a.js"), "let x = bar;");
        assert_eq!(e.rewrite("let x = FOO;", "b.js"), "let x = FOO;");
    }

    #[test]
    fn folds_substitutions_within_a_rule_in_order() {
        let e = engine(vec![ReplacementRule::new(
            vec!["x.js", "y.js"],
            ReplaceSpec::Many(vec![
                ReplaceStep::Pair(SubstitutionPair::new("A", 1i64)),
                ReplaceStep::Pair(SubstitutionPair::new("B", 2i64)),
            ]),
        )]);
        assert_eq!(e.rewrite("AB", "x.js"), "12");
        assert_eq!(e.rewrite("AB", "y.js"), "12");
        assert_eq!(e.rewrite("AB", "z.js"), "AB");
    }

    #[test]
    fn overlapping_rules_both_apply_in_declaration_order() {
        // Rule 1 fully rewrites before rule 2 sees the text: FOO -> BAR -> BAZ.
        let e = engine(vec![
            ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "BAR")),
            ReplacementRule::new("a.js", SubstitutionPair::new("BAR", "BAZ")),
        ]);
        assert_eq!(e.rewrite("FOO BAR", "a.js"), "BAZ BAZ");
    }

    #[test]
    fn function_transforms_receive_the_key() {
        let e = engine(vec![ReplacementRule::new(
            "a.js",
            ReplaceSpec::func(|text, key| format!("// {}\n{}", key, text)),
        )]);
        assert_eq!(e.rewrite("body", "a.js"), "// a.js\nbody");
    }

    #[test]
    fn no_rules_is_identity() {
        let e = engine(vec![]);
        assert_eq!(e.rewrite("unchanged", "anything.js"), "unchanged");
        assert!(e.compiled_rules().is_empty());
    }

    #[test]
    fn map_is_produced_whenever_requested() {
        let e = engine(vec![ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar"))]);
        let rewritten = e.rewrite_with_map("FOO\nFOO", "a.js");
        assert_eq!(rewritten.text, "bar\nbar");
        let map = rewritten.map.unwrap();
        assert_eq!(map.sources, vec!["a.js".to_string()]);
        assert_eq!(map.sources_content, vec!["bar\nbar".to_string()]);

        // Requested maps are produced even when no rule matched.
        let untouched = e.rewrite_with_map("FOO", "b.js");
        assert_eq!(untouched.text, "FOO");
        assert!(untouched.map.is_some());
    }
}
