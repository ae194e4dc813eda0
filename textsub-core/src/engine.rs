// textsub-core/src/engine.rs
//! Defines the core RewriteEngine trait and related data structures.
//!
//! The `RewriteEngine` trait provides a pluggable interface for applying a
//! compiled rule set to units of source text. This module defines the
//! contract that all such engines must adhere to, ensuring a consistent
//! and interchangeable core API for `textsub`.

use crate::compiler::CompiledRules;
use crate::sourcemap::SourceMap;

/// The result of a rewrite that was asked for a position-mapping artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    /// The rewritten text.
    pub text: String,
    /// The position-mapping artifact relating output text to input text.
    pub map: Option<SourceMap>,
}

/// A trait that defines the core functionality of a rewrite engine.
///
/// This trait decouples the lifecycle integration layer from the specific
/// application strategy, allowing different engines to be used
/// interchangeably behind the same contract.
pub trait RewriteEngine: Send + Sync {
    /// Applies every matching rule to `text`, in declaration order.
    ///
    /// For each compiled rule whose predicate matches `key`, the rule's
    /// transforms are folded left-to-right over the running text. Rules that
    /// do not match are skipped entirely. When no rule matches, the input
    /// text is returned unchanged.
    ///
    /// # Arguments
    /// * `text` - The unit of source text to rewrite.
    /// * `key` - The identifying key (a file path or module id).
    fn rewrite(&self, text: &str, key: &str) -> String;

    /// Like [`RewriteEngine::rewrite`], but also produces a position-mapping
    /// artifact describing how the output text relates to the input text.
    fn rewrite_with_map(&self, text: &str, key: &str) -> Rewritten;

    /// Returns a reference to the `CompiledRules` used by the engine.
    ///
    /// This is used by external components, such as the lifecycle layer's
    /// interceptor registration, to access the rules without recompiling
    /// them.
    fn compiled_rules(&self) -> &CompiledRules;
}
