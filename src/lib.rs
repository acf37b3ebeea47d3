// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod block;
pub mod conditions;
pub mod config;
pub mod instructions;
pub mod metadata;
pub mod output;
pub mod runtime;
pub mod session;
pub mod summary;
pub mod trial;
