pub mod scores;

pub use scores::tag_scores;
