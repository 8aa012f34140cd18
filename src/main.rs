use anyhow::Result;

use cinescore::cli::Command;
use cinescore::interpret;
use cinescore::services::RatingSubmission;

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Init => cinescore::handle_init(),
        Command::AddMovie { title } => cinescore::handle_add_movie(&title),
        Command::ShowMovie { movie_id } => cinescore::handle_show_movie(movie_id),
        Command::Rate {
            movie,
            user,
            category,
            value,
            upperbound,
            subtype,
            privacy,
        } => cinescore::handle_rate(&RatingSubmission {
            movie_id: movie,
            category_name: category,
            value,
            upperbound,
            subtype,
            username: user,
            privacy,
        }),
        Command::Popular { movie_id } => cinescore::handle_popular(movie_id),
        Command::Categories { movie_id, user } => cinescore::handle_categories(movie_id, &user),
        Command::Ratings {
            movie,
            category,
            upperbound,
        } => cinescore::handle_ratings(movie, category.as_deref(), upperbound),
        Command::Tag {
            movie,
            user,
            name,
            privacy,
        } => cinescore::handle_tag(movie, &user, &name, &privacy),
        Command::Upvote { movie, user, name } => cinescore::handle_upvote(movie, &user, &name),
        Command::Downvote { movie, user, name } => cinescore::handle_downvote(movie, &user, &name),
        Command::TagState { movie, user, name } => cinescore::handle_tag_state(movie, &user, &name),
        Command::Scores { movie_id, user } => cinescore::handle_scores(movie_id, &user),
        Command::Tags { movie, name, user } => {
            cinescore::handle_tags(movie, name.as_deref(), user.as_deref())
        }
        Command::Whoami { session_id } => cinescore::handle_whoami(&session_id),
    }
}
