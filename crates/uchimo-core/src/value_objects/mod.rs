//! Value objects - immutable types that represent domain concepts

mod ids;
mod reaction_type;

pub use ids::{generate_auto_id, IdParseError, PostId, ThreadId, UserId, AUTO_ID_LEN};
pub use reaction_type::ReactionType;
