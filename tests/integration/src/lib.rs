//! Integration test utilities for uchimo
//!
//! Backends wired the way the application wires them: an in-memory store
//! with fault injection and optional interleaving, or PostgreSQL when
//! `DATABASE_URL` is set.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
