//! CLI subcommand implementations for the macwatch binary.

pub mod check_cmd;
pub mod status_cmd;
