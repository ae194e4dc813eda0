// textsub-core/src/lib.rs
//! # textsub Core Library
//!
//! `textsub-core` provides the fundamental, host-independent logic for
//! declarative source-text substitution. It defines the data structures for
//! substitution rules, provides mechanisms for compiling these rules, and
//! implements a pluggable `RewriteEngine` trait for applying them to units
//! of source text keyed by a file path or module id.
//!
//! The library is designed to be pure and stateless, focusing solely on the
//! transformation of input text based on declared rules, without concerns
//! for I/O or pipeline-specific state management.
//!
//! ## Modules
//!
//! * `config`: Defines `ReplacementRule`s and `ReplacementConfig` for declaring substitutions.
//! * `compiler`: Normalizes heterogeneous declarations into `CompiledRules`.
//! * `engine`: Defines the `RewriteEngine` trait, enabling a modular design.
//! * `engines`: Contains concrete implementations of the `RewriteEngine` trait.
//! * `sourcemap`: Defines the position-mapping artifact produced on request.
//! * `oneshot`: Convenience wrappers for one-shot, non-pipeline use.
//! * `errors`: Library error types and drop diagnostics.
//!
//! ## Public API
//!
//! The public API provides a cohesive set of types and functions for
//! declaring, compiling, and applying substitution rules:
//!
//! **Configuration & Rules**
//!
//! * [`ReplacementConfig`]: Container for rule declarations, loadable from YAML.
//! * [`ReplacementRule`]: A single declaration: a key filter plus replacements.
//! * [`FilterSpec`] / [`ReplaceSpec`]: The heterogeneous declaration shapes.
//! * [`TextTransform`]: The capability interface for function transforms.
//!
//! **Compilation**
//!
//! * [`compile_rules`]: Eager, infallible normalization into [`CompiledRules`].
//! * [`CompiledRule`] / [`CompiledRules`]: The canonical internal form.
//!
//! **Application**
//!
//! * [`RewriteEngine`]: A trait for pluggable application engines.
//! * [`FoldEngine`]: The standard folding implementation.
//! * [`rewrite_string`]: One-shot compile-and-apply.
//!
//! ## Usage Example
//!
//! ```rust
//! use textsub_core::{ReplacementRule, SubstitutionPair, rewrite_string};
//!
//! let rules = vec![
//!     ReplacementRule::new("a.js", SubstitutionPair::new("FOO", "bar")),
//! ];
//!
//! assert_eq!(rewrite_string(&rules, "let x = FOO;", "a.js"), "let x = bar;");
//! assert_eq!(rewrite_string(&rules, "let x = FOO;", "b.js"), "let x = FOO;");
//! ```
//!
//! ## Error Handling
//!
//! Malformed declarations are never errors: they are dropped during
//! compilation and recorded as diagnostics on [`CompiledRules`]. The typed
//! [`TextsubError`] covers rules-file loading only.
//!
//! ## Design Principles
//!
//! * **Pluggable Architecture:** The `RewriteEngine` trait allows different
//!   application strategies to be swapped out seamlessly.
//! * **Stateless:** Rules are compiled once and never mutated; every apply
//!   call is a pure function of (rules, text, key).
//! * **Testable:** Logic is easily unit-testable in isolation.
//! * **Extensible:** New declaration shapes or engines require minimal
//!   changes to the core.

// All modules must be declared before they can be used.
pub mod compiler;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod oneshot;
pub mod sourcemap;

/// Re-exports the public configuration types for declaring substitution rules.
pub use config::{
    FilterSpec,
    FromSpec,
    KeyPredicate,
    RawPattern,
    ReplaceSpec,
    ReplaceStep,
    ReplacementConfig,
    ReplacementRule,
    SubstitutionPair,
    TextTransform,
    ToValue,
};

/// Re-exports the custom error type and drop diagnostics.
pub use errors::{DropReason, TextsubError};

/// Re-exports types related to the core rewrite engine trait.
pub use engine::{RewriteEngine, Rewritten};

/// Re-exports the concrete `FoldEngine` implementation from its location.
pub use engines::fold_engine::FoldEngine;

/// Re-exports the position-mapping artifact type.
pub use sourcemap::SourceMap;

/// Re-exports functions for one-shot, non-pipeline use.
pub use oneshot::{rewrite_string, rewrite_string_with_map};

// Re-export key types from the compiler module for advanced usage.
pub use compiler::{
    compile_rules, CompiledRule, CompiledRules, DroppedRule, MatchPredicate, MAX_PATTERN_LENGTH,
};
