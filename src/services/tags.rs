use anyhow::Result;
use chrono::Utc;

use crate::database::{self, DbPool, Tag};
use crate::domain::{TagScore, TagState, TagWriteOutcome, VoteAction};
use crate::tagging;

// votes on a tag the user never created fall back to a public row
const DEFAULT_VOTE_PRIVACY: &str = "public";

#[derive(Clone)]
pub struct TagService {
    pool: DbPool,
}

impl TagService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Attaches a tag to a movie in the creator's name, starting as an
    /// upvote. Creating a tag that already exists changes nothing.
    pub fn create(
        &self,
        tag_name: &str,
        movie_id: i64,
        username: &str,
        privacy: &str,
    ) -> Result<TagWriteOutcome> {
        let username = username.to_lowercase();

        let mut conn = database::get_connection(&self.pool)?;
        let Some(movie) = database::movies::find_by_id(&mut conn, movie_id)? else {
            log::debug!("Discarding tag for unknown movie {movie_id}");
            return Ok(TagWriteOutcome::UnknownMovie);
        };

        let inserted = database::tags::create_if_absent(
            &mut conn,
            movie_id,
            &movie.title,
            tag_name,
            &username,
            privacy,
            TagState::Upvote,
            Utc::now().naive_utc(),
        )?;
        if !inserted {
            return Ok(TagWriteOutcome::Unchanged);
        }

        database::movies::register_tag_name_if_new(&mut conn, movie_id, tag_name)?;
        Ok(TagWriteOutcome::Created)
    }

    pub fn upvote(&self, username: &str, tag_name: &str, movie_id: i64) -> Result<TagWriteOutcome> {
        self.vote(username, tag_name, movie_id, VoteAction::Upvote)
    }

    pub fn downvote(&self, username: &str, tag_name: &str, movie_id: i64) -> Result<TagWriteOutcome> {
        self.vote(username, tag_name, movie_id, VoteAction::Downvote)
    }

    /// A vote on a missing row creates it directly in the target state, in
    /// one statement, so no reader can observe a freshly downvoted tag
    /// passing through upvote. A vote on an existing row flips its state;
    /// re-voting the same way changes nothing.
    fn vote(
        &self,
        username: &str,
        tag_name: &str,
        movie_id: i64,
        action: VoteAction,
    ) -> Result<TagWriteOutcome> {
        let username = username.to_lowercase();
        let target = action.target_state();

        let mut conn = database::get_connection(&self.pool)?;
        let Some(movie) = database::movies::find_by_id(&mut conn, movie_id)? else {
            log::debug!("Discarding vote for unknown movie {movie_id}");
            return Ok(TagWriteOutcome::UnknownMovie);
        };

        let existing = database::tags::find_by_key(&mut conn, movie_id, tag_name, &username)?;
        database::tags::upsert_vote(
            &mut conn,
            movie_id,
            &movie.title,
            tag_name,
            &username,
            DEFAULT_VOTE_PRIVACY,
            target,
            Utc::now().naive_utc(),
        )?;

        match existing {
            None => {
                database::movies::register_tag_name_if_new(&mut conn, movie_id, tag_name)?;
                Ok(TagWriteOutcome::Created)
            }
            Some(tag) if tag.state != target => Ok(TagWriteOutcome::Switched),
            Some(_) => Ok(TagWriteOutcome::Unchanged),
        }
    }

    pub fn state(&self, username: &str, movie_id: i64, tag_name: &str) -> Result<TagState> {
        let username = username.to_lowercase();
        let mut conn = database::get_connection(&self.pool)?;
        let tag = database::tags::find_by_key(&mut conn, movie_id, tag_name, &username)?;
        Ok(tag.map(|t| t.state).unwrap_or(TagState::NoTag))
    }

    pub fn scores_for_movie(
        &self,
        requester_username: &str,
        movie_id: i64,
    ) -> Result<Vec<TagScore>> {
        let mut conn = database::get_connection(&self.pool)?;
        let rows = database::tags::list_by_movie(&mut conn, movie_id)?;
        Ok(tagging::tag_scores(&rows, requester_username, movie_id))
    }

    pub fn by_movie(&self, movie_id: i64) -> Result<Vec<Tag>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::tags::list_by_movie(&mut conn, movie_id)
    }

    pub fn by_tag_name(&self, tag_name: &str) -> Result<Vec<Tag>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::tags::list_by_tag_name(&mut conn, tag_name)
    }

    pub fn by_username(&self, username: &str) -> Result<Vec<Tag>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::tags::list_by_username(&mut conn, &username.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_pool, get_connection, movies, setup::init_database};

    fn service_with_movie(test_name: &str) -> (TagService, i64) {
        let path = std::env::temp_dir().join(format!(
            "cinescore-tags-{}-{}.db",
            test_name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        init_database(&mut conn).unwrap();
        let movie = movies::insert_movie(&mut conn, "Brick").unwrap();
        (TagService::new(pool), movie.id)
    }

    #[test]
    fn create_then_repeated_downvotes_settle_on_one_downvoted_row() {
        let (service, movie_id) = service_with_movie("downvote-idempotent");

        assert_eq!(service.create("Funny", movie_id, "alice", "public").unwrap(), TagWriteOutcome::Created);
        assert_eq!(service.downvote("alice", "Funny", movie_id).unwrap(), TagWriteOutcome::Switched);
        assert_eq!(service.downvote("alice", "Funny", movie_id).unwrap(), TagWriteOutcome::Unchanged);

        let rows = service.by_movie(movie_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, TagState::Downvote);
        assert_eq!(service.state("alice", movie_id, "Funny").unwrap(), TagState::Downvote);
    }

    #[test]
    fn duplicate_create_is_a_noop() {
        let (service, movie_id) = service_with_movie("dup-create");

        assert_eq!(service.create("Funny", movie_id, "alice", "public").unwrap(), TagWriteOutcome::Created);
        assert_eq!(service.create("Funny", movie_id, "alice", "private").unwrap(), TagWriteOutcome::Unchanged);

        assert_eq!(service.by_movie(movie_id).unwrap().len(), 1);
    }

    #[test]
    fn downvote_on_missing_row_creates_it_downvoted() {
        let (service, movie_id) = service_with_movie("downvote-create");

        assert_eq!(service.downvote("bob", "Slow", movie_id).unwrap(), TagWriteOutcome::Created);

        let rows = service.by_movie(movie_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, TagState::Downvote);
        assert_eq!(rows[0].movie_title, "Brick");
    }

    #[test]
    fn upvote_revives_a_downvoted_tag() {
        let (service, movie_id) = service_with_movie("flip");

        service.downvote("bob", "Slow", movie_id).unwrap();
        assert_eq!(service.upvote("bob", "Slow", movie_id).unwrap(), TagWriteOutcome::Switched);
        assert_eq!(service.upvote("bob", "Slow", movie_id).unwrap(), TagWriteOutcome::Unchanged);
        assert_eq!(service.state("bob", movie_id, "Slow").unwrap(), TagState::Upvote);
    }

    #[test]
    fn votes_on_unknown_movies_are_discarded() {
        let (service, movie_id) = service_with_movie("unknown-movie");

        let outcome = service.upvote("alice", "Funny", movie_id + 100).unwrap();
        assert_eq!(outcome, TagWriteOutcome::UnknownMovie);
        assert!(service.by_movie(movie_id + 100).unwrap().is_empty());
    }

    #[test]
    fn usernames_are_stored_lower_cased() {
        let (service, movie_id) = service_with_movie("lowercase");

        service.create("Funny", movie_id, "Alice", "public").unwrap();

        let rows = service.by_username("ALICE").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "alice");
        assert_eq!(service.state("aLiCe", movie_id, "Funny").unwrap(), TagState::Upvote);
    }

    #[test]
    fn tag_name_is_registered_once_per_movie() {
        let (service, movie_id) = service_with_movie("register-name");

        service.create("Funny", movie_id, "alice", "public").unwrap();
        service.upvote("bob", "Funny", movie_id).unwrap();

        let pool = service.pool.clone();
        let mut conn = get_connection(&pool).unwrap();
        assert_eq!(movies::tag_names(&mut conn, movie_id).unwrap(), vec!["Funny".to_string()]);
    }

    #[test]
    fn scores_net_upvotes_against_downvotes_with_requester_state() {
        let (service, movie_id) = service_with_movie("scores");

        service.upvote("a", "Funny", movie_id).unwrap();
        service.upvote("b", "Funny", movie_id).unwrap();
        service.upvote("c", "Funny", movie_id).unwrap();
        service.downvote("d", "Funny", movie_id).unwrap();
        service.upvote("d", "Quotable", movie_id).unwrap();

        let scores = service.scores_for_movie("d", movie_id).unwrap();
        assert_eq!(scores.len(), 2);

        assert_eq!(scores[0].tag_name, "Funny");
        assert_eq!(scores[0].score, 2);
        assert_eq!(scores[0].requester_state, TagState::Downvote);

        assert_eq!(scores[1].tag_name, "Quotable");
        assert_eq!(scores[1].score, 1);
        assert_eq!(scores[1].requester_state, TagState::Upvote);
    }

    #[test]
    fn concurrent_upvotes_produce_exactly_one_row() {
        let (service, movie_id) = service_with_movie("concurrent");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || service.upvote("carol", "Funny", movie_id).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rows = service.by_movie(movie_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, TagState::Upvote);
    }
}
