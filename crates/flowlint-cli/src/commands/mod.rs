//! Subcommand implementations.

pub mod list_rules;
pub mod review;
