//! # uchimo-db
//!
//! Store adapters implementing the repository traits of `uchimo-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with connection pool management and
//!   bundled migrations
//! - Database models with SQLx `FromRow` derives and model -> entity mappers
//! - `MemoryStore`, an in-process implementation of every port with fault
//!   injection, used by the service and integration tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uchimo_db::pool::{create_pool, PoolConfig};
//! use uchimo_db::repositories::PgPostRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     let posts = PgPostRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{FaultKind, FaultPlan, MemoryStore, StoreOp};
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig, MIGRATIONS_DIR};
pub use repositories::{
    PgFavoriteRepository, PgPostRepository, PgProfileRepository, PgReactionRepository,
    PgThreadRepository,
};
