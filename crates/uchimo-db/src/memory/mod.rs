//! In-process store for tests and local runs
//!
//! `MemoryStore` implements every repository port, can be told to fail
//! chosen operations through a `FaultPlan`, and can yield at each call so
//! concurrent toggles interleave deterministically.

mod fault;
mod store;

pub use fault::{FaultKind, FaultPlan, StoreOp};
pub use store::MemoryStore;
