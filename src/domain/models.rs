use serde::{Deserialize, Serialize};

/// A user's vote on a tag. `NoTag` is never stored; it is synthesized on
/// read when the user has no row for the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagState {
    #[serde(rename = "upvote")]
    Upvote,
    #[serde(rename = "downvote")]
    Downvote,
    #[serde(rename = "noTag")]
    NoTag,
}

impl TagState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagState::Upvote => "upvote",
            TagState::Downvote => "downvote",
            TagState::NoTag => "noTag",
        }
    }

    /// Parses a stored state. Only the two votable states live in the
    /// database.
    pub fn from_stored(value: &str) -> Option<TagState> {
        match value {
            "upvote" => Some(TagState::Upvote),
            "downvote" => Some(TagState::Downvote),
            _ => None,
        }
    }
}

/// A vote request against a tag row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Downvote,
}

impl VoteAction {
    /// The state a tag row ends up in after this action, whether the row
    /// already existed or is created by the vote itself.
    pub fn target_state(&self) -> TagState {
        match self {
            VoteAction::Upvote => TagState::Upvote,
            VoteAction::Downvote => TagState::Downvote,
        }
    }
}

/// What a rating submission did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingWriteOutcome {
    Created,
    Updated,
    RejectedOutOfRange,
    UnknownMovie,
}

/// What a tag create or vote did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagWriteOutcome {
    Created,
    Switched,
    Unchanged,
    UnknownMovie,
}

/// The single "most popular" rating summary for a movie: the most rated
/// category name, its most used upperbound, and the mean of that group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRating {
    pub category_name: String,
    pub upperbound: i64,
    pub average: f64,
}

/// Per-category mean for a movie, carrying the requester's own rating when
/// they are part of the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub movie_id: i64,
    pub category_name: String,
    pub upperbound: i64,
    pub subtype: String,
    pub average: f64,
    pub requester_value: Option<i64>,
    pub requester_username: Option<String>,
}

/// Net upvote/downvote score for one tag name on a movie, plus the
/// requester's own vote state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagScore {
    pub movie_id: i64,
    pub tag_name: String,
    pub score: i64,
    pub requester_state: TagState,
}
