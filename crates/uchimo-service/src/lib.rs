//! # uchimo-service
//!
//! Application layer: toggle services, posting, threads, profiles, and the
//! optimistic view state that sits in front of them.

pub mod dto;
pub mod services;
pub mod view;

pub use services::{
    FavoriteToggleService, MaintenanceService, PostService, ProfileService,
    ReactionToggleService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    ThreadService, ToggleGuard,
};
pub use view::{OptimisticFavorites, OptimisticReactions, SyncState, ToggleOutcome, ViewNotice};
