pub mod aggregate;

pub use aggregate::{category_summaries, most_popular_rating};
