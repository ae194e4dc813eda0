// textsub/src/lib.rs
//! # textsub Pipeline Plugin
//!
//! This crate wires the `textsub-core` substitution engine into a module
//! bundler's transform pipeline. A [`RewritePlugin`] is constructed once from
//! rule declarations and exposes the host lifecycle hooks: the `config`
//! merge, per-module `transform`, build-time `render_chunk`, and serve-time
//! `handle_hot_update`, plus per-rule file-load interceptors for the host's
//! dependency pre-bundling step.

pub mod host;
pub mod interceptor;
pub mod plugin;

// Re-export the plugin surface.
pub use plugin::{ApplyPhase, EnforceTier, PluginOptions, RewritePlugin, PLUGIN_NAME};

pub use host::{
    BuildOptions, ConfigEnv, HostConfig, HotContentReader, HotUpdate, PipelineCommand,
    PrebundleOptions, TransformOutput,
};

pub use interceptor::{FileLoadInterceptor, LoadedFile, LoaderHint, REAL_FILE_NAMESPACE};

// Re-export the core declaration types so plugin consumers need only this
// crate.
pub use textsub_core::{
    rewrite_string, FilterSpec, FromSpec, ReplaceSpec, ReplaceStep, ReplacementConfig,
    ReplacementRule, RewriteEngine, SubstitutionPair, TextTransform, ToValue,
};
