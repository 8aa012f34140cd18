use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Tag;
use crate::domain::TagState;

/// Inserts a tag row unless the identity key (movie_id, tag_name, username)
/// already has one. Returns true when a row was actually inserted.
#[allow(clippy::too_many_arguments)]
pub fn create_if_absent(
    conn: &mut DbConn,
    movie_id: i64,
    movie_title: &str,
    tag_name: &str,
    username: &str,
    privacy: &str,
    state: TagState,
    created_at: NaiveDateTime,
) -> Result<bool> {
    let sql = "INSERT INTO tags (movie_id, movie_title, tag_name, username, privacy, state, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT (movie_id, tag_name, username) DO NOTHING";

    let inserted = conn
        .execute(
            sql,
            params![movie_id, movie_title, tag_name, username, privacy, state.as_str(), created_at],
        )
        .context("Failed to create tag")?;

    Ok(inserted > 0)
}

/// Creates the row directly in the requested state, or flips the state of
/// an existing row. A single statement, so a missing row never passes
/// through an intermediate state under concurrent readers.
#[allow(clippy::too_many_arguments)]
pub fn upsert_vote(
    conn: &mut DbConn,
    movie_id: i64,
    movie_title: &str,
    tag_name: &str,
    username: &str,
    privacy: &str,
    state: TagState,
    created_at: NaiveDateTime,
) -> Result<()> {
    let sql = "INSERT INTO tags (movie_id, movie_title, tag_name, username, privacy, state, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT (movie_id, tag_name, username) DO UPDATE SET state = excluded.state";

    conn.execute(
        sql,
        params![movie_id, movie_title, tag_name, username, privacy, state.as_str(), created_at],
    )
    .context("Failed to upsert tag vote")
    .map(|_| ())
}

pub fn find_by_key(
    conn: &mut DbConn,
    movie_id: i64,
    tag_name: &str,
    username: &str,
) -> Result<Option<Tag>> {
    let sql = "SELECT id, movie_id, movie_title, tag_name, username, privacy, state, created_at FROM tags WHERE movie_id = ?1 AND tag_name = ?2 AND username = ?3";

    conn.query_row(sql, params![movie_id, tag_name, username], parse_tag_row)
        .optional()
        .context("Failed to query tag by identity key")
}

pub fn list_by_movie(conn: &mut DbConn, movie_id: i64) -> Result<Vec<Tag>> {
    let sql = "SELECT id, movie_id, movie_title, tag_name, username, privacy, state, created_at FROM tags WHERE movie_id = ?1 ORDER BY id";

    collect_tags(conn, sql, params![movie_id]).context("Failed to list tags by movie")
}

pub fn list_by_tag_name(conn: &mut DbConn, tag_name: &str) -> Result<Vec<Tag>> {
    let sql = "SELECT id, movie_id, movie_title, tag_name, username, privacy, state, created_at FROM tags WHERE tag_name = ?1 ORDER BY id";

    collect_tags(conn, sql, params![tag_name]).context("Failed to list tags by name")
}

pub fn list_by_username(conn: &mut DbConn, username: &str) -> Result<Vec<Tag>> {
    let sql = "SELECT id, movie_id, movie_title, tag_name, username, privacy, state, created_at FROM tags WHERE username = ?1 ORDER BY id";

    collect_tags(conn, sql, params![username]).context("Failed to list tags by username")
}

fn collect_tags(conn: &mut DbConn, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, parse_tag_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_tag_row(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    let state: String = row.get(6)?;
    let state = TagState::from_stored(&state).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown tag state: {state}").into(),
        )
    })?;

    Ok(Tag {
        id: row.get(0)?,
        movie_id: row.get(1)?,
        movie_title: row.get(2)?,
        tag_name: row.get(3)?,
        username: row.get(4)?,
        privacy: row.get(5)?,
        state,
        created_at: row.get(7)?,
    })
}
