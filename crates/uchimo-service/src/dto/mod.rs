//! Data transfer objects
//!
//! This module provides:
//! - Request DTOs with validation
//! - Response DTOs, including the toggle results
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreatePostRequest, CreateThreadRequest, SaveProfileRequest};
pub use responses::{
    CounterDrift, DriftEntry, FavoriteToggle, Page, PostResponse, ProfileResponse,
    ReactionToggle, SeedReport, ThreadResponse,
};
