use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marquee::app::App;

#[derive(Parser)]
#[command(name = "marquee", about = "Browse TMDB movie listings from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Now playing, popular and top rated rails
    Home,
    /// Search movies by title
    Search { query: String },
    /// Full detail for one movie
    Detail { id: i32 },
    /// Toggle the bookmark for one movie
    Bookmark { id: i32 },
    /// List saved bookmarks
    Bookmarks,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let mut app = App::from_env()?;
    app.cancel_on_shutdown();

    match cli.command {
        Command::Home => app.home().await,
        Command::Search { query } => app.search(&query).await,
        Command::Detail { id } => app.detail(id).await,
        Command::Bookmark { id } => app.bookmark(id).await,
        Command::Bookmarks => app.bookmarks(),
    }
}
