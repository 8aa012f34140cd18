pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod rating;
pub mod services;
pub mod tagging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::auth::AuthClient;
use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::services::{RatingService, RatingSubmission, TagService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_pool() -> Result<DbPool> {
    let config = AppConfig::new();
    database::create_pool(&config.database.path)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("Failed to render result as JSON")?;
    println!("{rendered}");
    Ok(())
}

pub fn handle_init() -> Result<()> {
    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::init_database(&mut conn)
}

pub fn handle_add_movie(title: &str) -> Result<()> {
    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;
    let movie = database::movies::insert_movie(&mut conn, title)?;
    log::info!("Registered movie {} ({})", movie.id, movie.title);
    print_json(&movie)
}

pub fn handle_show_movie(movie_id: i64) -> Result<()> {
    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;

    let movie = database::movies::find_by_id(&mut conn, movie_id)?
        .ok_or_else(|| anyhow::anyhow!("No movie with id {movie_id}"))?;
    let rating_categories = database::movies::rating_category_names(&mut conn, movie_id)?;
    let tag_names = database::movies::tag_names(&mut conn, movie_id)?;

    print_json(&serde_json::json!({
        "movie": movie,
        "rating_categories": rating_categories,
        "tag_names": tag_names,
    }))
}

pub fn handle_rate(submission: &RatingSubmission) -> Result<()> {
    let service = RatingService::new(open_pool()?);
    let outcome = service.submit(submission)?;
    log::info!("Rating write outcome: {outcome:?}");
    Ok(())
}

pub fn handle_popular(movie_id: i64) -> Result<()> {
    let service = RatingService::new(open_pool()?);
    print_json(&service.most_popular(movie_id)?)
}

pub fn handle_categories(movie_id: i64, user: &str) -> Result<()> {
    let service = RatingService::new(open_pool()?);
    print_json(&service.category_summaries(movie_id, user)?)
}

pub fn handle_ratings(
    movie: Option<i64>,
    category: Option<&str>,
    upperbound: Option<i64>,
) -> Result<()> {
    let service = RatingService::new(open_pool()?);
    let rows = match (movie, category, upperbound) {
        (Some(movie_id), None, None) => service.by_movie(movie_id)?,
        (None, Some(name), Some(ub)) => service.by_category_and_upperbound(name, ub)?,
        (None, Some(name), None) => service.by_category(name)?,
        (None, None, Some(ub)) => service.by_upperbound(ub)?,
        _ => anyhow::bail!("Pass --movie, --category, --upperbound, or --category with --upperbound"),
    };
    print_json(&rows)
}

pub fn handle_tag(movie_id: i64, user: &str, name: &str, privacy: &str) -> Result<()> {
    let service = TagService::new(open_pool()?);
    let outcome = service.create(name, movie_id, user, privacy)?;
    log::info!("Tag write outcome: {outcome:?}");
    Ok(())
}

pub fn handle_upvote(movie_id: i64, user: &str, name: &str) -> Result<()> {
    let service = TagService::new(open_pool()?);
    let outcome = service.upvote(user, name, movie_id)?;
    log::info!("Tag write outcome: {outcome:?}");
    Ok(())
}

pub fn handle_downvote(movie_id: i64, user: &str, name: &str) -> Result<()> {
    let service = TagService::new(open_pool()?);
    let outcome = service.downvote(user, name, movie_id)?;
    log::info!("Tag write outcome: {outcome:?}");
    Ok(())
}

pub fn handle_tag_state(movie_id: i64, user: &str, name: &str) -> Result<()> {
    let service = TagService::new(open_pool()?);
    print_json(&service.state(user, movie_id, name)?)
}

pub fn handle_scores(movie_id: i64, user: &str) -> Result<()> {
    let service = TagService::new(open_pool()?);
    print_json(&service.scores_for_movie(user, movie_id)?)
}

pub fn handle_tags(movie: Option<i64>, name: Option<&str>, user: Option<&str>) -> Result<()> {
    let service = TagService::new(open_pool()?);
    let rows = match (movie, name, user) {
        (Some(movie_id), None, None) => service.by_movie(movie_id)?,
        (None, Some(tag_name), None) => service.by_tag_name(tag_name)?,
        (None, None, Some(username)) => service.by_username(username)?,
        _ => anyhow::bail!("Pass exactly one of --movie, --name, or --user"),
    };
    print_json(&rows)
}

pub fn handle_whoami(session_id: &str) -> Result<()> {
    let config = AppConfig::new();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let client = AuthClient::new(&config.auth)?;
        match client.resolve_username(session_id).await? {
            Some(username) => println!("{username}"),
            None => println!("unauthenticated"),
        }
        Ok(())
    })
}
