//! vore-lib: build orchestration for LÖVE games
//!
//! This crate turns a tree of game sources into a packaged `.love` archive
//! and per-platform bundles:
//! - [`transpile`]: per-glob asset batches gated by [`incremental`] checks
//! - [`graph`]: the dependency-ordered, concurrent task scheduler
//! - [`pack`], [`dist`], [`publish`]: archive, bundle and push steps
//! - [`pipeline`]: the standard task declarations tying them together

pub mod clean;
pub mod config;
pub mod consts;
pub mod dist;
pub mod graph;
pub mod incremental;
pub mod init;
pub mod layout;
pub mod pack;
pub mod pipeline;
pub mod publish;
pub mod tool;
pub mod transpile;
pub mod util;
pub mod watch;
