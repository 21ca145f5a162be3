//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod favorite;
pub mod guard;
pub mod maintenance;
pub mod post;
pub mod profile;
pub mod reaction;
pub mod thread;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use favorite::FavoriteToggleService;
pub use guard::{GuardBusy, ToggleGuard, ToggleKey, ToggleKind, TogglePermit};
pub use maintenance::MaintenanceService;
pub use post::{local_day_start, PostService};
pub use profile::ProfileService;
pub use reaction::{ReactionToggleService, ToggleFailure, WriteStep};
pub use thread::{ThreadService, STARTER_THREADS};
