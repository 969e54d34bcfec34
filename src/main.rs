use clap::{Args, Parser, Subcommand};
use moviereviews::api::{CommentInput, MovieInput, ReviewInput};
use moviereviews::config::ClientConfig;
use moviereviews::error::{ApiError, ConfigError};
use moviereviews::navigation::NavigationEvent;
use moviereviews::session::LOGIN_FAILED_FALLBACK;
use moviereviews::ClientContext;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("login failed: {0}")]
    Login(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "moviereviews", about = "Movie review platform client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login {
        #[arg(long, env = "MOVIE_EMAIL")]
        email: String,
        #[arg(long, env = "MOVIE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted session.
    Logout,
    /// Show the current session; `--remote` asks the backend.
    Whoami {
        #[arg(long, default_value_t = false)]
        remote: bool,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new_password: String,
    },
    Movies(MoviesCommand),
    Reviews(ReviewsCommand),
}

#[derive(Args, Debug)]
struct MoviesCommand {
    #[command(subcommand)]
    command: MoviesSubcommand,
}

#[derive(Subcommand, Debug)]
enum MoviesSubcommand {
    List,
    Get {
        id: i64,
    },
    TopRated,
    Trending,
    Search {
        query: String,
    },
    Genre {
        genre: String,
    },
    Recommended {
        #[arg(long)]
        user_id: Option<i64>,
    },
    Create(MovieArgs),
    Update {
        id: i64,
        #[command(flatten)]
        movie: MovieArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct MovieArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    genre: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    poster_url: Option<String>,
    #[arg(long)]
    release_date: Option<String>,
}

impl From<MovieArgs> for MovieInput {
    fn from(args: MovieArgs) -> Self {
        Self {
            title: args.title,
            genre: args.genre,
            description: args.description,
            poster_url: args.poster_url,
            release_date: args.release_date,
        }
    }
}

#[derive(Args, Debug)]
struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewsSubcommand {
    /// Reviews for a movie.
    List {
        movie_id: i64,
    },
    /// Reviews written by a user.
    ByUser {
        user_id: i64,
    },
    Add {
        movie_id: i64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        content: String,
    },
    Delete {
        review_id: i64,
    },
    Comment {
        review_id: i64,
        #[arg(long)]
        content: String,
    },
    Like {
        review_id: i64,
    },
    Unlike {
        review_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let ctx = ClientContext::start(&config)?;
    let mut navigation = ctx.navigation();
    let is_login = matches!(cli.command, Command::Login { .. });

    let result = run(&ctx, cli.command).await;

    if let Some(notice) = reset_notice(is_login, navigation.try_recv().ok()) {
        eprintln!("{notice}");
    }
    result
}

/// Message for a hard reset fired during the command. A rejected `login`
/// already reports its own failure, so it gets none.
fn reset_notice(is_login: bool, event: Option<NavigationEvent>) -> Option<String> {
    match event {
        Some(NavigationEvent::HardReset { to, .. }) if !is_login => {
            Some(format!("session is no longer valid; log in again ({to})"))
        }
        _ => None,
    }
}

async fn run(ctx: &ClientContext, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = ctx
                .login(&email, &password)
                .await
                .map_err(|e| CliError::Login(e.display_message(LOGIN_FAILED_FALLBACK)))?;
            print_json(&user)
        }
        Command::Logout => {
            ctx.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami { remote } => {
            if remote {
                return print_json(&ctx.auth().current_user().await?);
            }
            match ctx.user() {
                Some(user) => print_json(&user),
                None => {
                    println!("not logged in");
                    Ok(())
                }
            }
        }
        Command::Register { email, password } => {
            println!("{}", ctx.auth().register(&email, &password).await?);
            Ok(())
        }
        Command::ForgotPassword { email } => {
            println!("{}", ctx.auth().forgot_password(&email).await?);
            Ok(())
        }
        Command::ResetPassword { token, new_password } => {
            println!("{}", ctx.auth().reset_password(&token, &new_password).await?);
            Ok(())
        }
        Command::Movies(movies) => run_movies(ctx, movies.command).await,
        Command::Reviews(reviews) => run_reviews(ctx, reviews.command).await,
    }
}

async fn run_movies(ctx: &ClientContext, command: MoviesSubcommand) -> Result<(), CliError> {
    let movies = ctx.movies();
    match command {
        MoviesSubcommand::List => print_json(&movies.list().await?),
        MoviesSubcommand::Get { id } => print_json(&movies.get(id).await?),
        MoviesSubcommand::TopRated => print_json(&movies.top_rated().await?),
        MoviesSubcommand::Trending => print_json(&movies.trending().await?),
        MoviesSubcommand::Search { query } => print_json(&movies.search(&query).await?),
        MoviesSubcommand::Genre { genre } => print_json(&movies.by_genre(&genre).await?),
        MoviesSubcommand::Recommended { user_id } => print_json(&movies.recommendations(user_id).await?),
        MoviesSubcommand::Create(args) => print_json(&movies.create(&args.into()).await?),
        MoviesSubcommand::Update { id, movie } => print_json(&movies.update(id, &movie.into()).await?),
        MoviesSubcommand::Delete { id } => {
            movies.delete(id).await?;
            println!("deleted movie {id}");
            Ok(())
        }
    }
}

async fn run_reviews(ctx: &ClientContext, command: ReviewsSubcommand) -> Result<(), CliError> {
    let reviews = ctx.reviews();
    match command {
        ReviewsSubcommand::List { movie_id } => print_json(&reviews.for_movie(movie_id).await?),
        ReviewsSubcommand::ByUser { user_id } => print_json(&reviews.for_user(user_id).await?),
        ReviewsSubcommand::Add { movie_id, rating, content } => {
            print_json(&reviews.add(movie_id, &ReviewInput { rating, content }).await?)
        }
        ReviewsSubcommand::Delete { review_id } => {
            reviews.delete(review_id).await?;
            println!("deleted review {review_id}");
            Ok(())
        }
        ReviewsSubcommand::Comment { review_id, content } => {
            print_json(&reviews.add_comment(review_id, &CommentInput { content }).await?)
        }
        ReviewsSubcommand::Like { review_id } => {
            reviews.like(review_id).await?;
            println!("liked review {review_id}");
            Ok(())
        }
        ReviewsSubcommand::Unlike { review_id } => {
            reviews.unlike(review_id).await?;
            println!("unliked review {review_id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
