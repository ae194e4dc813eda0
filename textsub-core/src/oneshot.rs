// textsub-core/src/oneshot.rs

//! `oneshot.rs`
//! Convenience wrappers for one-shot, non-pipeline use of the core engine.
//! Compiles a declaration list and applies it to a single unit of text in
//! one call, without holding an engine across invocations.

use crate::config::ReplacementRule;
use crate::engine::{RewriteEngine, Rewritten};
use crate::engines::fold_engine::FoldEngine;

/// Compiles `declarations` and rewrites `text` under `key` in a single call.
///
/// Declarations that compile to zero rules simply do not apply, so this
/// function cannot fail; with no usable rules the input text comes back
/// unchanged. Hosts that rewrite many units should build a
/// [`FoldEngine`] once instead of calling this repeatedly.
pub fn rewrite_string(declarations: &[ReplacementRule], text: &str, key: &str) -> String {
    FoldEngine::new(declarations).rewrite(text, key)
}

/// Like [`rewrite_string`], but also returns the position-mapping artifact.
pub fn rewrite_string_with_map(
    declarations: &[ReplacementRule],
    text: &str,
    key: &str,
) -> Rewritten {
    FoldEngine::new(declarations).rewrite_with_map(text, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubstitutionPair;

    #[test]
    fn rewrites_matching_key_in_one_call() {
        let declarations =
            vec![ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar"))];
        assert_eq!(rewrite_string(&declarations, "let x = FOO;", "a.js"), "let x = bar;");
        assert_eq!(rewrite_string(&declarations, "let x = FOO;", "b.js"), "let x = FOO;");
    }

    #[test]
    fn empty_declarations_are_identity() {
        assert_eq!(rewrite_string(&[], "anything", "a.js"), "anything");
    }

    #[test]
    fn with_map_returns_both_artifacts() {
        let declarations =
            vec![ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar"))];
        let rewritten = rewrite_string_with_map(&declarations, "FOO", "a.js");
        assert_eq!(rewritten.text, "bar");
        assert_eq!(rewritten.map.unwrap().sources, vec!["a.js".to_string()]);
    }
}
