//! Reaction types
//!
//! A post can receive exactly two kinds of reaction: "uchimo" ("same here")
//! and "gambarou" ("hang in there"). Each kind has its own counter field on
//! the post document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fixed reaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Uchimo,
    Gambarou,
}

impl ReactionType {
    /// Both reaction types, in display order
    pub const ALL: [ReactionType; 2] = [ReactionType::Uchimo, ReactionType::Gambarou];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uchimo => "uchimo",
            Self::Gambarou => "gambarou",
        }
    }

    /// Name of the aggregate counter field on the post document
    pub fn counter_field(self) -> &'static str {
        match self {
            Self::Uchimo => "likes_uchimo",
            Self::Gambarou => "likes_gambarou",
        }
    }

    /// Parse from either the wire name or the counter field name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uchimo" | "likes_uchimo" => Some(Self::Uchimo),
            "gambarou" | "likes_gambarou" => Some(Self::Gambarou),
            _ => None,
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
