//! Subcommand implementations

pub mod note;
pub mod scan;
