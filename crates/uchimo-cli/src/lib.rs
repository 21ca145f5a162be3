//! # uchimo-cli
//!
//! Operator commands run against the PostgreSQL store.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
