// textsub-core/src/engines/mod.rs
//! This module contains rewrite engine implementations.
//!
//! Each engine is a separate file within this directory and implements the
//! `RewriteEngine` trait. This modular design allows for easy addition of
//! new application strategies, such as a position-tracking rewriter.
//!
//! To add a new engine, create a new file (e.g., `tracking_engine.rs`),
//! define its logic, and declare it here using `pub mod <engine_name>;`.

pub mod fold_engine;
