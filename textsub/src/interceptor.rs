// textsub/src/interceptor.rs
//! Per-rule file-load interceptors for the dependency pre-bundling path.
//!
//! While serving, every compiled rule with a pattern predicate is registered
//! as its own interceptor in the host's pre-bundling step. On load, the
//! interceptor reads the file's full contents and folds that one rule's
//! transforms over it; the engine's multi-rule folding is bypassed on this
//! path.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use textsub_core::{CompiledRule, TextTransform};

use crate::plugin::PLUGIN_NAME;

/// The namespace interceptors are scoped to: real files on disk, as opposed
/// to virtual modules the host may synthesize.
pub const REAL_FILE_NAMESPACE: &str = "file";

/// Content-type marker attached to intercepted loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderHint {
    /// Pass-through: let the host infer handling from the file name.
    #[default]
    Default,
}

/// The rewritten contents of an intercepted file load.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub contents: String,
    pub loader: LoaderHint,
}

/// A file-load interceptor scoped to a single rule's predicate.
#[derive(Clone)]
pub struct FileLoadInterceptor {
    name: String,
    filter: Regex,
    transforms: Vec<Arc<dyn TextTransform>>,
}

impl FileLoadInterceptor {
    /// Builds the interceptor for one compiled rule.
    ///
    /// Returns `None` for rules with a custom predicate filter: interceptor
    /// registration requires a pattern the host can evaluate.
    pub fn for_rule(rule: &CompiledRule) -> Option<Self> {
        let filter = rule.predicate.as_pattern()?.clone();
        let name = match &rule.id {
            Some(id) => format!("{}:{}", PLUGIN_NAME, id),
            None => PLUGIN_NAME.to_string(),
        };
        Some(Self { name, filter, transforms: rule.transforms.clone() })
    }

    /// The interceptor's diagnostic identity: the fixed plugin prefix plus
    /// the declaration's `id` when present.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &'static str {
        REAL_FILE_NAMESPACE
    }

    /// The pattern the host evaluates to scope this interceptor.
    pub fn filter(&self) -> &Regex {
        &self.filter
    }

    /// Whether this interceptor applies to `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.filter.is_match(&path.replace('\\', "/"))
    }

    /// Reads `path` from storage and folds this rule's transforms over its
    /// contents. Read failures propagate to the host; no retry, no recovery.
    pub async fn load(&self, path: &str) -> Result<LoadedFile> {
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {} for interceptor '{}'", path, self.name))?;

        debug!("Interceptor '{}' rewriting {} ({} bytes).", self.name, path, source.len());
        let contents = self
            .transforms
            .iter()
            .fold(source, |text, transform| transform.apply(&text, path));

        Ok(LoadedFile { contents, loader: LoaderHint::Default })
    }
}

impl fmt::Debug for FileLoadInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FileLoadInterceptor")
            .field("name", &self.name)
            .field("filter", &self.filter.as_str())
            .field("transforms", &self.transforms.len())
            .finish()
    }
}
