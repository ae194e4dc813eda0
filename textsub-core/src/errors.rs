//! errors.rs - Custom error types for the textsub-core library.
//!
//! This module defines a structured error enum for the library, plus the
//! diagnostic reasons attached to rule declarations that are silently dropped
//! during compilation. Dropped declarations are never surfaced as errors;
//! `DropReason` exists purely for logging and introspection.

use thiserror::Error;

/// This enum represents all possible error types in the `textsub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TextsubError {
    #[error("Failed to read rules file '{0}': {1}")]
    RulesRead(String, std::io::Error),

    #[error("Failed to parse rules from '{0}': {1}")]
    RulesParse(String, serde_yml::Error),
}

/// Why a rule declaration was dropped during compilation.
///
/// A declaration that compiles to zero rules is not an error; it is treated
/// as "rule does not apply". Each drop is logged at `warn!` level and recorded
/// on [`crate::compiler::CompiledRules::dropped`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DropReason {
    #[error("filter produced an empty alternation")]
    EmptyFilter,

    #[error("filter pattern failed to compile: {0}")]
    InvalidFilterPattern(String),

    #[error("filter pattern length ({0}) exceeds maximum allowed ({1})")]
    FilterPatternTooLong(usize, usize),

    #[error("no usable transforms remained after normalization")]
    NoTransforms,
}
