//! CLI subcommand implementations.

pub mod analyze;
pub mod render;
pub mod validate;
