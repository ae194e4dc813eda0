// textsub/src/host.rs
//! Models of the host pipeline contracts the plugin layer plugs into.
//!
//! The host build tool owns file discovery, module resolution, output
//! writing, and scheduling; this module only describes the shapes that cross
//! the boundary: the configuration value the plugin may merge into, the
//! environment it is configured under, and the hot-update unit whose content
//! reader the plugin wraps.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use textsub_core::SourceMap;

use crate::interceptor::FileLoadInterceptor;

/// Which pipeline the host is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineCommand {
    /// The dev server: modules are served and hot-updated in place.
    Serve,
    /// A production build: chunks are emitted to disk.
    Build,
}

/// The environment the `config` hook is invoked under.
#[derive(Debug, Clone, Copy)]
pub struct ConfigEnv {
    pub command: PipelineCommand,
}

/// Build-output options relevant to this plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Whether the build emits input source maps for transforms.
    pub sourcemap: bool,
}

/// Options for the host's dependency pre-bundling step.
///
/// The plugin list is shared with the host and other plugins; interceptors
/// registered here run against files on load, before module transforms.
#[derive(Debug, Clone, Default)]
pub struct PrebundleOptions {
    pub plugins: Option<Vec<FileLoadInterceptor>>,
}

/// The host configuration value passed through the `config` hook.
///
/// Hooks receive and return this by value; the plugin never relies on
/// object identity across the host's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub build: Option<BuildOptions>,
    pub prebundle: Option<PrebundleOptions>,
}

/// The result of a module transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// Reads the content a hot update would deliver to its consumer.
///
/// The host's reader may suspend on I/O; failures propagate to the host
/// unmodified.
#[async_trait]
pub trait HotContentReader: Send + Sync {
    async fn read(&self) -> std::io::Result<String>;
}

/// A single hot update: the changed file plus the reader producing the
/// content handed to the hot-update consumer.
#[derive(Clone)]
pub struct HotUpdate {
    pub file: String,
    pub reader: Arc<dyn HotContentReader>,
}

impl fmt::Debug for HotUpdate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HotUpdate").field("file", &self.file).finish()
    }
}
