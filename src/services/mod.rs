pub mod ratings;
pub mod tags;

pub use ratings::{RatingService, RatingSubmission};
pub use tags::TagService;
