use anyhow::Result;
use chrono::Utc;

use crate::database::{self, DbPool, Rating};
use crate::domain::{AggregateRating, CategorySummary, RatingWriteOutcome};
use crate::rating;

/// One rating submission. The scale is part of the submission: the same
/// category name with a different upperbound is a different category.
#[derive(Debug, Clone)]
pub struct RatingSubmission {
    pub movie_id: i64,
    pub category_name: String,
    pub value: i64,
    pub upperbound: i64,
    pub subtype: String,
    pub username: String,
    pub privacy: String,
}

#[derive(Clone)]
pub struct RatingService {
    pool: DbPool,
}

impl RatingService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Records a rating, or overwrites the user's previous value for the
    /// same (movie, category, upperbound). Out-of-range values and unknown
    /// movies leave the store untouched; the outcome reports which.
    pub fn submit(&self, submission: &RatingSubmission) -> Result<RatingWriteOutcome> {
        if submission.value < 1 || submission.value > submission.upperbound {
            log::debug!(
                "Discarding rating {} outside [1, {}] for movie {}",
                submission.value,
                submission.upperbound,
                submission.movie_id
            );
            return Ok(RatingWriteOutcome::RejectedOutOfRange);
        }

        let mut conn = database::get_connection(&self.pool)?;
        let Some(movie) = database::movies::find_by_id(&mut conn, submission.movie_id)? else {
            log::debug!("Discarding rating for unknown movie {}", submission.movie_id);
            return Ok(RatingWriteOutcome::UnknownMovie);
        };

        let existing = database::ratings::find_by_key(
            &mut conn,
            submission.movie_id,
            &submission.category_name,
            submission.upperbound,
            &submission.username,
        )?;

        database::ratings::upsert_rating(
            &mut conn,
            submission.movie_id,
            &movie.title,
            &submission.category_name,
            submission.upperbound,
            submission.value,
            &submission.username,
            &submission.subtype,
            &submission.privacy,
            Utc::now().naive_utc(),
        )?;

        if existing.is_some() {
            return Ok(RatingWriteOutcome::Updated);
        }

        database::movies::register_rating_category_if_new(
            &mut conn,
            submission.movie_id,
            &submission.category_name,
        )?;
        Ok(RatingWriteOutcome::Created)
    }

    pub fn most_popular(&self, movie_id: i64) -> Result<Option<AggregateRating>> {
        let mut conn = database::get_connection(&self.pool)?;
        let rows = database::ratings::list_by_movie(&mut conn, movie_id)?;
        Ok(rating::most_popular_rating(&rows))
    }

    pub fn category_summaries(
        &self,
        movie_id: i64,
        requester_username: &str,
    ) -> Result<Vec<CategorySummary>> {
        let mut conn = database::get_connection(&self.pool)?;
        let rows = database::ratings::list_by_movie(&mut conn, movie_id)?;
        Ok(rating::category_summaries(&rows, requester_username))
    }

    pub fn by_movie(&self, movie_id: i64) -> Result<Vec<Rating>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::ratings::list_by_movie(&mut conn, movie_id)
    }

    pub fn by_category_and_upperbound(
        &self,
        category_name: &str,
        upperbound: i64,
    ) -> Result<Vec<Rating>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::ratings::list_by_category_and_upperbound(&mut conn, category_name, upperbound)
    }

    pub fn by_category(&self, category_name: &str) -> Result<Vec<Rating>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::ratings::list_by_category(&mut conn, category_name)
    }

    pub fn by_upperbound(&self, upperbound: i64) -> Result<Vec<Rating>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::ratings::list_by_upperbound(&mut conn, upperbound)
    }
}
