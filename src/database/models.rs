use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::TagState;

#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub created_at: Option<NaiveDateTime>,
}

/// One user's scaled opinion in one category on one movie. The identity key
/// is (movie_id, category_name, upperbound, username); the same category
/// name with a different upperbound is a different category. The movie
/// title is copied from the catalog at write time.
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub category_name: String,
    pub upperbound: i64,
    pub value: i64,
    pub username: String,
    pub subtype: String,
    pub privacy: String,
    pub created_at: NaiveDateTime,
}

/// One user's vote on one tag name on one movie. Usernames are stored
/// lower-cased; the identity key is (movie_id, tag_name, username).
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub tag_name: String,
    pub username: String,
    pub privacy: String,
    pub state: TagState,
    pub created_at: NaiveDateTime,
}
