// textsub/src/plugin.rs
//! Plugin construction and the lifecycle hooks wired into the host.
//!
//! A `RewritePlugin` is built once from rule declarations, compiles them
//! eagerly, and then exposes the four host lifecycle points: the `config`
//! merge (which registers pre-bundling interceptors while serving), the
//! per-module `transform`, the build-only `render_chunk`, and the serve-only
//! `handle_hot_update` wrapper.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use once_cell::sync::OnceCell;

use textsub_core::{
    compile_rules, CompiledRules, FoldEngine, ReplacementRule, RewriteEngine,
};

use crate::host::{
    ConfigEnv, HostConfig, HotContentReader, HotUpdate, PipelineCommand, PrebundleOptions,
    TransformOutput,
};
use crate::interceptor::FileLoadInterceptor;

/// The fixed diagnostic identity of this plugin and its interceptors.
pub const PLUGIN_NAME: &str = "textsub";

/// Host-invocation tier, analogous to loader ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforceTier {
    /// Run before the host's own transform plugins.
    Pre,
    /// Run after the host's own transform plugins.
    Post,
}

/// Restricts plugin activation to one pipeline mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Serve,
    Build,
}

/// Options recognized at plugin construction time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginOptions {
    /// Host-invocation tier; the host reads this via [`RewritePlugin::enforce`].
    pub enforce: Option<EnforceTier>,
    /// Mode restriction; the host reads this via [`RewritePlugin::apply_phase`].
    pub apply: Option<ApplyPhase>,
}

/// Session facts read once at configuration time.
#[derive(Debug, Clone, Copy)]
struct SessionState {
    serving: bool,
    emit_maps: bool,
}

const DEFAULT_SESSION: SessionState = SessionState { serving: false, emit_maps: false };

/// The constructed plugin object.
///
/// Rule declarations are compiled exactly once, here; the compiled set is
/// immutable for the lifetime of the build session. A declaration list that
/// compiles to zero rules yields an inert plugin: still validly shaped, all
/// hooks behave as identity.
pub struct RewritePlugin {
    rules: Arc<CompiledRules>,
    engine: FoldEngine,
    options: PluginOptions,
    session: OnceCell<SessionState>,
}

impl RewritePlugin {
    pub fn new(declarations: Vec<ReplacementRule>, options: PluginOptions) -> Self {
        let rules = Arc::new(compile_rules(&declarations));
        if rules.is_empty() {
            debug!("No usable rules compiled; plugin '{}' is inert.", PLUGIN_NAME);
        }
        let engine = FoldEngine::with_rules(Arc::clone(&rules));
        Self { rules, engine, options, session: OnceCell::new() }
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn enforce(&self) -> Option<EnforceTier> {
        self.options.enforce
    }

    pub fn apply_phase(&self) -> Option<ApplyPhase> {
        self.options.apply
    }

    /// True when no declaration compiled to a usable rule.
    pub fn is_inert(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn compiled_rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// The per-rule interceptors this plugin registers while serving. Rules
    /// with a custom predicate filter are skipped; they need a pattern.
    pub fn load_interceptors(&self) -> Vec<FileLoadInterceptor> {
        self.rules.rules.iter().filter_map(FileLoadInterceptor::for_rule).collect()
    }

    fn session(&self) -> SessionState {
        self.session.get().copied().unwrap_or(DEFAULT_SESSION)
    }

    /// The `config` hook: an explicit merge over the host's configuration
    /// value.
    ///
    /// Reads the session facts (serving vs. building, sourcemap enablement)
    /// once and caches them. While serving, ensures the pre-bundling options
    /// path exists (creating empty containers if absent) and prepends this
    /// plugin's interceptors to that step's plugin list, preserving whatever
    /// the host or other plugins already registered there.
    pub fn config(&self, mut config: HostConfig, env: &ConfigEnv) -> HostConfig {
        let state = SessionState {
            serving: env.command == PipelineCommand::Serve,
            emit_maps: config.build.map(|b| b.sourcemap).unwrap_or(false),
        };
        let _ = self.session.set(state);

        if !state.serving || self.is_inert() {
            return config;
        }

        let prebundle = config.prebundle.get_or_insert_with(PrebundleOptions::default);
        let plugins = prebundle.plugins.get_or_insert_with(Vec::new);
        let mut merged = self.load_interceptors();
        debug!("Registering {} pre-bundling interceptor(s).", merged.len());
        merged.append(plugins);
        *plugins = merged;
        config
    }

    /// The `transform` hook: rewrites a module's text, keyed by its id.
    ///
    /// Runs while serving and while building. A position-mapping artifact is
    /// requested from the engine only when the configuration enabled input
    /// maps.
    pub fn transform(&self, code: &str, id: &str) -> TransformOutput {
        if self.session().emit_maps {
            let rewritten = self.engine.rewrite_with_map(code, id);
            TransformOutput { code: rewritten.text, map: rewritten.map }
        } else {
            TransformOutput { code: self.engine.rewrite(code, id), map: None }
        }
    }

    /// The `render_chunk` hook: rewrites an emitted chunk's final text,
    /// keyed by its filename. Renderer-stage rewrites are textual only, so
    /// no map is produced. Returns `None` while serving.
    pub fn render_chunk(&self, code: &str, file_name: &str) -> Option<String> {
        if self.session().serving {
            return None;
        }
        Some(self.engine.rewrite(code, file_name))
    }

    /// The `handle_hot_update` hook: wraps the update's content reader so
    /// the delivered content passes through the engine, keyed by the updated
    /// file's path. Returns the update unchanged outside serve mode.
    pub fn handle_hot_update(&self, update: HotUpdate) -> HotUpdate {
        if !self.session().serving || self.is_inert() {
            return update;
        }
        let reader = RewritingReader {
            inner: Arc::clone(&update.reader),
            engine: self.engine.clone(),
            key: update.file.clone(),
        };
        HotUpdate { file: update.file, reader: Arc::new(reader) }
    }
}

/// Wraps a host content reader, rewriting whatever it returns.
struct RewritingReader {
    inner: Arc<dyn HotContentReader>,
    engine: FoldEngine,
    key: String,
}

#[async_trait]
impl HotContentReader for RewritingReader {
    async fn read(&self) -> std::io::Result<String> {
        let content = self.inner.read().await?;
        Ok(self.engine.rewrite(&content, &self.key))
    }
}
