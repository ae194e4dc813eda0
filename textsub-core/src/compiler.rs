//! compiler.rs - Normalizes rule declarations into compiled rules.
//!
//! This module converts the heterogeneous, loosely-typed declaration shapes
//! from `config` into `CompiledRules`: each compiled rule carries a
//! precompiled match predicate over keys and a non-empty, ordered list of
//! pure text transforms. Malformed declarations are dropped (with a logged
//! diagnostic), never raised as errors, so one bad rule cannot abort a whole
//! rule set.

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::Arc;

use crate::config::{
    FilterSpec, FromSpec, KeyPredicate, ReplaceStep, ReplacementRule, SubstitutionPair,
    TextTransform,
};
use crate::errors::DropReason;

/// Maximum allowed length for a raw pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Characters that must be escaped so literal filter/`from` text is matched
/// exactly rather than interpreted as pattern operators.
const PATTERN_SPECIALS: &[char] = &[
    '-', '[', ']', '/', '{', '}', '(', ')', '*', '+', '?', '.', '\\', '^', '$', '|',
];

/// Escapes every pattern-special character in `text` with a backslash.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if PATTERN_SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Normalizes path separators to the canonical forward-slash form.
pub fn normalize_separators(text: &str) -> String {
    text.replace('\\', "/")
}

/// Represents a single compiled substitution rule.
///
/// Holds the precompiled key predicate together with the rule's ordered
/// transforms, ready for efficient application to content.
pub struct CompiledRule {
    /// The declaration's opaque label, kept for diagnostics.
    pub id: Option<String>,
    /// The predicate that tests a key string for membership.
    pub predicate: MatchPredicate,
    /// The non-empty, declaration-ordered transform sequence.
    pub transforms: Vec<Arc<dyn TextTransform>>,
}

impl CompiledRule {
    /// Folds this rule's transforms left-to-right over `text`.
    pub fn fold(&self, text: String, key: &str) -> String {
        self.transforms
            .iter()
            .fold(text, |current, transform| transform.apply(&current, key))
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("id", &self.id)
            .field("predicate", &self.predicate)
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

/// A compiled match predicate over keys (file paths or module ids).
#[derive(Debug, Clone)]
pub enum MatchPredicate {
    /// A regex searched anywhere in the candidate key, not anchored.
    Pattern(Regex),
    /// A caller-supplied predicate; bypasses path handling entirely.
    Custom(KeyPredicate),
}

impl MatchPredicate {
    /// Tests a key for membership. Pattern predicates normalize the key's
    /// path separators first, symmetric with filter compilation.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            MatchPredicate::Pattern(regex) => {
                if key.contains('\\') {
                    regex.is_match(&normalize_separators(key))
                } else {
                    regex.is_match(key)
                }
            }
            MatchPredicate::Custom(predicate) => predicate.test(key),
        }
    }

    /// The underlying pattern, when this predicate has one. Custom predicates
    /// return `None` and cannot back a file-load interceptor.
    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            MatchPredicate::Pattern(regex) => Some(regex),
            MatchPredicate::Custom(_) => None,
        }
    }
}

/// A declaration that was rejected during compilation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRule {
    /// Position of the declaration in the input list.
    pub index: usize,
    /// The declaration's label, if it had one.
    pub id: Option<String>,
    pub reason: DropReason,
}

/// Represents the full set of compiled rules for a session.
///
/// Rule order equals declaration order; overlapping rules are never merged.
/// `dropped` records declarations rejected during compilation, for
/// diagnostics only.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    pub dropped: Vec<DroppedRule>,
}

impl CompiledRules {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compiles a list of rule declarations into `CompiledRules`.
///
/// Compilation is eager, infallible, and side-effect free apart from logging:
/// declarations with an unusable filter or an empty transform list are
/// dropped and recorded, and equal inputs always produce functionally
/// equivalent rule sets.
pub fn compile_rules(declarations: &[ReplacementRule]) -> CompiledRules {
    debug!("Starting compilation of {} rule declarations.", declarations.len());

    let mut rules = Vec::new();
    let mut dropped = Vec::new();

    for (index, declaration) in declarations.iter().enumerate() {
        match compile_declaration(declaration) {
            Ok(rule) => rules.push(rule),
            Err(reason) => {
                warn!(
                    "Dropping rule declaration {} ('{}'): {}",
                    index,
                    declaration.id.as_deref().unwrap_or("<unnamed>"),
                    reason
                );
                dropped.push(DroppedRule { index, id: declaration.id.clone(), reason });
            }
        }
    }

    debug!(
        "Finished compiling rules. Total compiled: {}, dropped: {}.",
        rules.len(),
        dropped.len()
    );
    CompiledRules { rules, dropped }
}

fn compile_declaration(declaration: &ReplacementRule) -> Result<CompiledRule, DropReason> {
    let predicate = compile_filter(&declaration.filter)?;
    let transforms = normalize_transforms(declaration.replace.steps());
    if transforms.is_empty() {
        return Err(DropReason::NoTransforms);
    }
    Ok(CompiledRule { id: declaration.id.clone(), predicate, transforms })
}

fn compile_filter(filter: &FilterSpec) -> Result<MatchPredicate, DropReason> {
    match filter {
        FilterSpec::Pattern(raw) => {
            if raw.pattern.len() > MAX_PATTERN_LENGTH {
                return Err(DropReason::FilterPatternTooLong(
                    raw.pattern.len(),
                    MAX_PATTERN_LENGTH,
                ));
            }
            compile_pattern(&raw.pattern)
                .map(MatchPredicate::Pattern)
                .map_err(|e| DropReason::InvalidFilterPattern(e.to_string()))
        }
        FilterSpec::Predicate(predicate) => Ok(MatchPredicate::Custom(predicate.clone())),
        FilterSpec::Literal(item) => literal_predicate(std::slice::from_ref(item)),
        FilterSpec::Literals(items) => literal_predicate(items),
    }
}

fn literal_predicate(items: &[String]) -> Result<MatchPredicate, DropReason> {
    let source = literal_alternation(items, |item| normalize_separators(item.trim()))
        .ok_or(DropReason::EmptyFilter)?;
    compile_pattern(&source)
        .map(MatchPredicate::Pattern)
        .map_err(|e| DropReason::InvalidFilterPattern(e.to_string()))
}

/// Builds a single-group alternation of escaped literals, e.g. `(a\.js|b\.js)`.
/// Items that are empty after preparation are filtered out; returns `None`
/// when nothing survives.
fn literal_alternation(items: &[String], prepare: fn(&str) -> String) -> Option<String> {
    let escaped: Vec<String> = items
        .iter()
        .map(|item| escape_literal(&prepare(item)))
        .filter(|item| !item.is_empty())
        .collect();

    if escaped.is_empty() {
        None
    } else {
        Some(format!("({})", escaped.join("|")))
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
}

fn normalize_transforms(steps: &[ReplaceStep]) -> Vec<Arc<dyn TextTransform>> {
    let mut transforms = Vec::with_capacity(steps.len());
    for step in steps {
        match step {
            ReplaceStep::Func(transform) => transforms.push(Arc::clone(transform)),
            ReplaceStep::Pair(pair) => {
                if let Some(transform) = compile_pair(pair) {
                    transforms.push(transform);
                }
            }
        }
    }
    transforms
}

/// Compiles a substitution pair into a global-replacement transform, or
/// `None` when the pair is incomplete or its pattern is unusable.
fn compile_pair(pair: &SubstitutionPair) -> Option<Arc<dyn TextTransform>> {
    let (from, to) = match (&pair.from, &pair.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            warn!("Dropping substitution pair with absent `from` or `to`.");
            return None;
        }
    };

    let source = match from {
        FromSpec::Pattern(raw) => {
            if raw.pattern.len() > MAX_PATTERN_LENGTH {
                warn!(
                    "Dropping substitution pair: pattern length ({}) exceeds maximum allowed ({}).",
                    raw.pattern.len(),
                    MAX_PATTERN_LENGTH
                );
                return None;
            }
            raw.pattern.clone()
        }
        FromSpec::Literal(item) => {
            match literal_alternation(std::slice::from_ref(item), str::to_string) {
                Some(source) => source,
                None => {
                    warn!("Dropping substitution pair with empty `from` literal.");
                    return None;
                }
            }
        }
        FromSpec::Literals(items) => match literal_alternation(items, str::to_string) {
            Some(source) => source,
            None => {
                warn!("Dropping substitution pair with empty `from` alternation.");
                return None;
            }
        },
    };

    let regex = match compile_pattern(&source) {
        Ok(regex) => regex,
        Err(e) => {
            warn!("Dropping substitution pair with invalid `from` pattern: {}", e);
            return None;
        }
    };
    let replacement = to.string_form();

    Some(Arc::new(move |text: &str, _key: &str| {
        regex.replace_all(text, replacement.as_str()).into_owned()
    }))
}
