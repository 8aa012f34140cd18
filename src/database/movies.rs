use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Movie;

pub fn insert_movie(conn: &mut DbConn, title: &str) -> Result<Movie> {
    let sql = "INSERT INTO movies (title) VALUES (?1) RETURNING id, title, created_at";

    conn.query_row(sql, params![title], parse_movie_row)
        .context("Failed to insert movie")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Movie>> {
    let sql = "SELECT id, title, created_at FROM movies WHERE id = ?1";

    conn.query_row(sql, params![id], parse_movie_row)
        .optional()
        .context("Failed to query movie by id")
}

fn parse_movie_row(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Records a category name in the movie's rating-category list the first
/// time it appears. A name already on the list is left alone.
pub fn register_rating_category_if_new(
    conn: &mut DbConn,
    movie_id: i64,
    category_name: &str,
) -> Result<()> {
    let sql = "INSERT OR IGNORE INTO movie_rating_categories (movie_id, category_name) VALUES (?1, ?2)";

    conn.execute(sql, params![movie_id, category_name])
        .context("Failed to register rating category for movie")
        .map(|_| ())
}

/// Same as `register_rating_category_if_new`, for tag names.
pub fn register_tag_name_if_new(conn: &mut DbConn, movie_id: i64, tag_name: &str) -> Result<()> {
    let sql = "INSERT OR IGNORE INTO movie_tag_names (movie_id, tag_name) VALUES (?1, ?2)";

    conn.execute(sql, params![movie_id, tag_name])
        .context("Failed to register tag name for movie")
        .map(|_| ())
}

pub fn rating_category_names(conn: &mut DbConn, movie_id: i64) -> Result<Vec<String>> {
    let sql = "SELECT category_name FROM movie_rating_categories WHERE movie_id = ?1 ORDER BY category_name";

    collect_names(conn, sql, movie_id).context("Failed to list rating category names for movie")
}

pub fn tag_names(conn: &mut DbConn, movie_id: i64) -> Result<Vec<String>> {
    let sql = "SELECT tag_name FROM movie_tag_names WHERE movie_id = ?1 ORDER BY tag_name";

    collect_names(conn, sql, movie_id).context("Failed to list tag names for movie")
}

fn collect_names(conn: &mut DbConn, sql: &str, movie_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![movie_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
