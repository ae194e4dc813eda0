//! Configuration management for `textsub-core`.
//!
//! This module defines the declaration-side data model for substitution rules:
//! the heterogeneous filter and replacement shapes a caller may supply, the
//! `TextTransform` capability trait for function transforms, and utilities for
//! loading rule files. Declarations are loosely typed on purpose; the compiler
//! normalizes them into exactly one canonical internal representation, and
//! downstream code never branches on the original shape again.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use log::{debug, info};

use crate::errors::TextsubError;

/// The capability interface for function transforms.
///
/// A transform is a pure function of `(text, key)` returning the next text.
/// It is blanket-implemented for any matching closure, so callers may supply
/// closures, function pointers, or hand-rolled types interchangeably.
pub trait TextTransform: Send + Sync {
    fn apply(&self, text: &str, key: &str) -> String;
}

impl<F> TextTransform for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn apply(&self, text: &str, key: &str) -> String {
        self(text, key)
    }
}

/// A custom key predicate supplied in place of a pattern filter.
///
/// Predicate filters bypass the auto-generated path handling (trimming,
/// separator normalization, literal escaping) entirely: the callable decides
/// membership on the raw key. They cannot back a file-load interceptor, which
/// requires a pattern.
#[derive(Clone)]
pub struct KeyPredicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl KeyPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Tests a key string for membership.
    pub fn test(&self, key: &str) -> bool {
        (self.0)(key)
    }
}

impl fmt::Debug for KeyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("KeyPredicate(<fn>)")
    }
}

/// A raw, uninterpreted pattern string.
///
/// Raw patterns are compiled verbatim by the rule compiler, with module-id
/// semantics: they search anywhere in the candidate key and no escaping is
/// applied. In YAML this is spelled `{ pattern: "..." }` to keep it distinct
/// from a literal string filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPattern {
    pub pattern: String,
}

/// The filter side of a rule declaration: which keys the rule applies to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// A raw pattern, used unchanged.
    Pattern(RawPattern),
    /// A single literal string, matched exactly after trimming and path
    /// separator normalization.
    Literal(String),
    /// Several literal strings, alternated.
    Literals(Vec<String>),
    /// A custom predicate over the key. Programmatic construction only.
    #[serde(skip)]
    Predicate(KeyPredicate),
}

impl FilterSpec {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        FilterSpec::Pattern(RawPattern { pattern: pattern.into() })
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FilterSpec::Predicate(KeyPredicate::new(predicate))
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::Literals(Vec::new())
    }
}

impl From<&str> for FilterSpec {
    fn from(literal: &str) -> Self {
        FilterSpec::Literal(literal.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(literal: String) -> Self {
        FilterSpec::Literal(literal)
    }
}

impl From<Vec<String>> for FilterSpec {
    fn from(literals: Vec<String>) -> Self {
        FilterSpec::Literals(literals)
    }
}

impl From<Vec<&str>> for FilterSpec {
    fn from(literals: Vec<&str>) -> Self {
        FilterSpec::Literals(literals.into_iter().map(String::from).collect())
    }
}

impl From<regex::Regex> for FilterSpec {
    fn from(pattern: regex::Regex) -> Self {
        FilterSpec::pattern(pattern.as_str())
    }
}

/// The `from` side of a substitution pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FromSpec {
    /// A raw pattern, used unchanged.
    Pattern(RawPattern),
    /// A single literal string, matched exactly.
    Literal(String),
    /// Several literal strings, alternated.
    Literals(Vec<String>),
}

impl FromSpec {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        FromSpec::Pattern(RawPattern { pattern: pattern.into() })
    }
}

impl From<&str> for FromSpec {
    fn from(literal: &str) -> Self {
        FromSpec::Literal(literal.to_string())
    }
}

impl From<String> for FromSpec {
    fn from(literal: String) -> Self {
        FromSpec::Literal(literal)
    }
}

impl From<Vec<String>> for FromSpec {
    fn from(literals: Vec<String>) -> Self {
        FromSpec::Literals(literals)
    }
}

impl From<Vec<&str>> for FromSpec {
    fn from(literals: Vec<&str>) -> Self {
        FromSpec::Literals(literals.into_iter().map(String::from).collect())
    }
}

impl From<regex::Regex> for FromSpec {
    fn from(pattern: regex::Regex) -> Self {
        FromSpec::pattern(pattern.as_str())
    }
}

/// The replacement value of a substitution pair: a string or a number,
/// stringified at compile time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ToValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl ToValue {
    /// The string form used as the actual replacement text.
    pub fn string_form(&self) -> String {
        match self {
            ToValue::Text(text) => text.clone(),
            ToValue::Int(value) => value.to_string(),
            ToValue::Float(value) => value.to_string(),
        }
    }
}

impl From<&str> for ToValue {
    fn from(text: &str) -> Self {
        ToValue::Text(text.to_string())
    }
}

impl From<String> for ToValue {
    fn from(text: String) -> Self {
        ToValue::Text(text)
    }
}

impl From<i64> for ToValue {
    fn from(value: i64) -> Self {
        ToValue::Int(value)
    }
}

impl From<f64> for ToValue {
    fn from(value: f64) -> Self {
        ToValue::Float(value)
    }
}

/// A single `{from, to}` substitution.
///
/// A pair with either field absent is invalid and is dropped silently during
/// compilation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SubstitutionPair {
    pub from: Option<FromSpec>,
    pub to: Option<ToValue>,
}

impl SubstitutionPair {
    pub fn new(from: impl Into<FromSpec>, to: impl Into<ToValue>) -> Self {
        Self { from: Some(from.into()), to: Some(to.into()) }
    }
}

/// One step of a rule's replacement list: a substitution pair or a function.
#[derive(Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ReplaceStep {
    Pair(SubstitutionPair),
    /// A function transform. Programmatic construction only.
    #[serde(skip)]
    Func(Arc<dyn TextTransform>),
}

impl ReplaceStep {
    pub fn func<F>(transform: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        ReplaceStep::Func(Arc::new(transform))
    }
}

impl fmt::Debug for ReplaceStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReplaceStep::Pair(pair) => f.debug_tuple("Pair").field(pair).finish(),
            ReplaceStep::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

impl From<SubstitutionPair> for ReplaceStep {
    fn from(pair: SubstitutionPair) -> Self {
        ReplaceStep::Pair(pair)
    }
}

/// The replace side of a rule declaration: a single step or an ordered list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ReplaceSpec {
    One(ReplaceStep),
    Many(Vec<ReplaceStep>),
}

impl ReplaceSpec {
    pub fn func<F>(transform: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        ReplaceSpec::One(ReplaceStep::func(transform))
    }

    /// The declaration-order list of steps, regardless of the original shape.
    pub fn steps(&self) -> &[ReplaceStep] {
        match self {
            ReplaceSpec::One(step) => std::slice::from_ref(step),
            ReplaceSpec::Many(steps) => steps,
        }
    }
}

impl Default for ReplaceSpec {
    fn default() -> Self {
        ReplaceSpec::Many(Vec::new())
    }
}

impl From<SubstitutionPair> for ReplaceSpec {
    fn from(pair: SubstitutionPair) -> Self {
        ReplaceSpec::One(ReplaceStep::Pair(pair))
    }
}

impl From<Vec<ReplaceStep>> for ReplaceSpec {
    fn from(steps: Vec<ReplaceStep>) -> Self {
        ReplaceSpec::Many(steps)
    }
}

/// A single substitution rule declaration, as supplied by the user.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplacementRule {
    /// Opaque label used for diagnostics and interceptor naming only.
    pub id: Option<String>,
    /// Which keys (file paths or module ids) the rule applies to.
    pub filter: FilterSpec,
    /// The ordered substitutions and transforms to fold over matching text.
    pub replace: ReplaceSpec,
}

impl ReplacementRule {
    pub fn new(filter: impl Into<FilterSpec>, replace: impl Into<ReplaceSpec>) -> Self {
        Self { id: None, filter: filter.into(), replace: replace.into() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Top-level container for a declarative rule file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplacementConfig {
    /// Rule declarations, in application order.
    pub rules: Vec<ReplacementRule>,
}

impl ReplacementConfig {
    /// Loads rule declarations from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextsubError> {
        let path = path.as_ref();
        info!("Loading replacement rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(|e| TextsubError::RulesRead(path.display().to_string(), e))?;
        let config: ReplacementConfig = serde_yml::from_str(&text)
            .map_err(|e| TextsubError::RulesParse(path.display().to_string(), e))?;

        info!("Loaded {} rule declarations from {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses rule declarations from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self, TextsubError> {
        debug!("Parsing replacement rules from inline YAML...");
        let config: ReplacementConfig = serde_yml::from_str(text)
            .map_err(|e| TextsubError::RulesParse("<inline>".to_string(), e))?;
        debug!("Parsed {} rule declarations.", config.rules.len());
        Ok(config)
    }
}
