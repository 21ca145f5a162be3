//! Optimistic view state
//!
//! What the UI shows for reaction buttons and favorite stars: membership is
//! flipped before the backend call, then confirmed or rolled back.

pub mod favorites;
pub mod mirror;
pub mod optimistic;
pub mod reactions;

pub use favorites::FavoriteView;
pub use mirror::{MirrorSet, PendingToggle, SyncState};
pub use optimistic::{OptimisticFavorites, OptimisticReactions, ToggleOutcome, ViewNotice};
pub use reactions::{ReactionAttempt, ReactionTuple, ReactionView};
