use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Rating;

/// Inserts a rating, or overwrites `value` in place when the identity key
/// (movie_id, category_name, upperbound, username) already has a row. The
/// conflict clause keeps the write atomic per key: two racing submissions
/// can never produce two rows.
#[allow(clippy::too_many_arguments)]
pub fn upsert_rating(
    conn: &mut DbConn,
    movie_id: i64,
    movie_title: &str,
    category_name: &str,
    upperbound: i64,
    value: i64,
    username: &str,
    subtype: &str,
    privacy: &str,
    created_at: NaiveDateTime,
) -> Result<()> {
    let sql = "INSERT INTO ratings (movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) ON CONFLICT (movie_id, category_name, upperbound, username) DO UPDATE SET value = excluded.value";

    conn.execute(
        sql,
        params![
            movie_id,
            movie_title,
            category_name,
            upperbound,
            value,
            username,
            subtype,
            privacy,
            created_at
        ],
    )
    .context("Failed to upsert rating")
    .map(|_| ())
}

pub fn find_by_key(
    conn: &mut DbConn,
    movie_id: i64,
    category_name: &str,
    upperbound: i64,
    username: &str,
) -> Result<Option<Rating>> {
    let sql = "SELECT id, movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at FROM ratings WHERE movie_id = ?1 AND category_name = ?2 AND upperbound = ?3 AND username = ?4";

    conn.query_row(sql, params![movie_id, category_name, upperbound, username], parse_rating_row)
        .optional()
        .context("Failed to query rating by identity key")
}

pub fn list_by_movie(conn: &mut DbConn, movie_id: i64) -> Result<Vec<Rating>> {
    let sql = "SELECT id, movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at FROM ratings WHERE movie_id = ?1 ORDER BY id";

    collect_ratings(conn, sql, params![movie_id]).context("Failed to list ratings by movie")
}

pub fn list_by_category_and_upperbound(
    conn: &mut DbConn,
    category_name: &str,
    upperbound: i64,
) -> Result<Vec<Rating>> {
    let sql = "SELECT id, movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at FROM ratings WHERE category_name = ?1 AND upperbound = ?2 ORDER BY id";

    collect_ratings(conn, sql, params![category_name, upperbound])
        .context("Failed to list ratings by category and upperbound")
}

pub fn list_by_category(conn: &mut DbConn, category_name: &str) -> Result<Vec<Rating>> {
    let sql = "SELECT id, movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at FROM ratings WHERE category_name = ?1 ORDER BY id";

    collect_ratings(conn, sql, params![category_name]).context("Failed to list ratings by category")
}

pub fn list_by_upperbound(conn: &mut DbConn, upperbound: i64) -> Result<Vec<Rating>> {
    let sql = "SELECT id, movie_id, movie_title, category_name, upperbound, value, username, subtype, privacy, created_at FROM ratings WHERE upperbound = ?1 ORDER BY id";

    collect_ratings(conn, sql, params![upperbound]).context("Failed to list ratings by upperbound")
}

fn collect_ratings(
    conn: &mut DbConn,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Rating>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_rating_row(row: &rusqlite::Row) -> rusqlite::Result<Rating> {
    Ok(Rating {
        id: row.get(0)?,
        movie_id: row.get(1)?,
        movie_title: row.get(2)?,
        category_name: row.get(3)?,
        upperbound: row.get(4)?,
        value: row.get(5)?,
        username: row.get(6)?,
        subtype: row.get(7)?,
        privacy: row.get(8)?,
        created_at: row.get(9)?,
    })
}
