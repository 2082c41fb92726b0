use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bookmarks::BookmarkStore;
use crate::config::TmdbConfig;
use crate::render;
use crate::screens::{DetailProvider, HomeProvider, ScreenState, SearchProvider};
use crate::tmdb::{CatalogApi, MovieSummary, TmdbClient};

/// CLI-facing composition of the catalog client, bookmark store and screen
/// providers. One `App` per invocation; each command is one screen
/// activation.
pub struct App {
    catalog: Arc<dyn CatalogApi>,
    store: BookmarkStore,
    image_base: String,
    cancel: CancellationToken,
}

impl App {
    pub fn new(config: TmdbConfig, store: BookmarkStore) -> Self {
        let image_base = config.image_base.clone();
        Self {
            catalog: Arc::new(TmdbClient::new(config)),
            store,
            image_base,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let config = TmdbConfig::from_env()?;
        let path = BookmarkStore::default_path()
            .ok_or_else(|| anyhow!("No platform data directory available"))?;
        let store = BookmarkStore::open(path)?;
        Ok(Self::new(config, store))
    }

    /// Ctrl-C / SIGTERM cancel the shared token, so in-flight catalog
    /// fetches return `Cancelled` instead of being abandoned.
    pub fn cancel_on_shutdown(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        });
    }

    pub async fn home(&mut self) -> Result<()> {
        let mut provider = HomeProvider::new();
        provider.activate(self.catalog.as_ref(), &self.cancel).await;
        self.print_rail("Now Playing", &provider.now_playing);
        self.print_rail("Popular Movie", &provider.popular);
        self.print_rail("Top Rated Movie", &provider.top_rated);
        Ok(())
    }

    pub async fn search(&mut self, query: &str) -> Result<()> {
        let mut provider = SearchProvider::new(query);
        provider.activate(self.catalog.as_ref(), &self.cancel).await;
        match &provider.results {
            ScreenState::Ready(movies) if movies.is_empty() => {
                println!("No results for '{query}'");
            }
            ScreenState::Ready(movies) => {
                for movie in movies {
                    println!("{}", render::render_card(&render::movie_card(movie, &self.image_base)));
                    println!("    id {}", movie.id);
                }
            }
            state => self.print_failure(state),
        }
        Ok(())
    }

    pub async fn detail(&mut self, id: i32) -> Result<()> {
        let mut provider = DetailProvider::new(id);
        provider
            .activate(self.catalog.as_ref(), &self.store, &self.cancel)
            .await;
        match &provider.data {
            ScreenState::Ready(bundle) => {
                let view = render::detail_view(bundle, provider.bookmarked, &self.image_base);
                print!("{}", render::render_detail(&view));
            }
            state => self.print_failure(state),
        }
        Ok(())
    }

    /// Toggles the bookmark for `id`, fetching the detail first so the
    /// saved record carries title and poster.
    pub async fn bookmark(&mut self, id: i32) -> Result<()> {
        let mut provider = DetailProvider::new(id);
        provider
            .activate(self.catalog.as_ref(), &self.store, &self.cancel)
            .await;
        if provider.data.data().is_none() {
            self.print_failure(&provider.data);
            return Ok(());
        }
        let bookmarked = provider.toggle_bookmark(&mut self.store)?;
        if bookmarked {
            info!("Bookmarked movie {}", id);
            println!("Movie saved");
        } else {
            info!("Removed bookmark for movie {}", id);
            println!("Movie removed");
        }
        Ok(())
    }

    pub fn bookmarks(&self) -> Result<()> {
        let mut any = false;
        for record in self.store.list() {
            any = true;
            match &record.poster_path {
                Some(path) => println!(
                    "{} (id {})\n    {}",
                    record.title,
                    record.movie_id,
                    render::poster_url(&self.image_base, path)
                ),
                None => println!("{} (id {})", record.title, record.movie_id),
            }
        }
        if !any {
            println!("No bookmarks saved");
        }
        Ok(())
    }

    fn print_rail(&self, heading: &str, state: &ScreenState<Vec<MovieSummary>>) {
        match state {
            ScreenState::Ready(movies) => {
                print!("{}", render::render_rail(heading, movies, &self.image_base));
            }
            state => {
                println!("== {heading} ==");
                self.print_failure(state);
            }
        }
    }

    fn print_failure<T>(&self, state: &ScreenState<T>) {
        if let Some(message) = state.error() {
            println!("Fetch failed: {message}");
            println!("Run the command again to retry.");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
