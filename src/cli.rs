use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "movie rating and tag voting backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Apply the database schema
    Init,
    /// Register a movie so ratings and tags can reference it
    AddMovie {
        /// Movie title
        title: String,
    },
    /// Show a movie with its recorded rating category and tag names
    ShowMovie {
        /// Movie id
        movie_id: i64,
    },
    /// Submit a rating, or overwrite a previous one for the same scale
    Rate {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        user: String,
        /// Rating category name, e.g. "Stickiness"
        #[arg(long)]
        category: String,
        #[arg(long)]
        value: i64,
        /// Maximum of the rating scale; valid values are 1..=upperbound
        #[arg(long)]
        upperbound: i64,
        #[arg(long, default_value = "scale")]
        subtype: String,
        #[arg(long, default_value = "public")]
        privacy: String,
    },
    /// Most popular aggregated rating for a movie
    Popular {
        movie_id: i64,
    },
    /// Per-category averages for a movie, personalized for a user
    Categories {
        movie_id: i64,
        user: String,
    },
    /// List raw ratings by movie, category, upperbound, or category + upperbound
    Ratings {
        #[arg(long)]
        movie: Option<i64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        upperbound: Option<i64>,
    },
    /// Create a tag on a movie (starts as the creator's upvote)
    Tag {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "public")]
        privacy: String,
    },
    /// Upvote a tag, creating it if needed
    Upvote {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
    },
    /// Downvote a tag, creating it downvoted if needed
    Downvote {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
    },
    /// Show one user's vote state for a tag
    TagState {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
    },
    /// Net tag scores for a movie, personalized for a user
    Scores {
        movie_id: i64,
        user: String,
    },
    /// List raw tags by movie, name, or user
    Tags {
        #[arg(long)]
        movie: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Resolve a session id to a username via the auth service
    Whoami {
        session_id: String,
    },
}
