//! Library exports for the CLI, benchmarks and tests.
/// App folder locations.
pub mod app_dirs;
/// User settings persisted as TOML.
pub mod config;
/// Drag-and-drop resolution and dispatch.
pub mod drop;
/// Tracing subscriber setup.
pub mod logging;
