use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bookmarks::{BookmarkStore, StoreError};
use crate::tmdb::{CatalogApi, DetailBundle, FetchError, MovieSummary};

/// List queries stay on the first page; the app has no pagination.
const FIRST_PAGE: u32 = 1;

/// Per-screen fetch state. A provider moves `Idle -> Loading -> Ready`
/// or `Idle -> Loading -> Failed`; it never silently stays loading after
/// the fetch has settled.
#[derive(Debug, Clone, Default)]
pub enum ScreenState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ScreenState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ScreenState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn settle(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => ScreenState::Ready(data),
            Err(e) => {
                warn!("Catalog fetch failed: {}", e);
                ScreenState::Failed(e.to_string())
            }
        }
    }
}

/// Home feed: three independent rails fetched concurrently on activation.
#[derive(Debug, Default)]
pub struct HomeProvider {
    pub now_playing: ScreenState<Vec<MovieSummary>>,
    pub popular: ScreenState<Vec<MovieSummary>>,
    pub top_rated: ScreenState<Vec<MovieSummary>>,
}

impl HomeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the three rail fetches. One fetch per activation: a second call
    /// without `reset()` is a no-op.
    pub async fn activate(&mut self, catalog: &dyn CatalogApi, cancel: &CancellationToken) {
        if !self.now_playing.is_idle() {
            debug!("Home screen already activated, skipping fetch");
            return;
        }
        self.now_playing = ScreenState::Loading;
        self.popular = ScreenState::Loading;
        self.top_rated = ScreenState::Loading;

        let (now_playing, popular, top_rated) = tokio::join!(
            catalog.now_playing(FIRST_PAGE, cancel),
            catalog.popular(FIRST_PAGE, cancel),
            catalog.top_rated(FIRST_PAGE, cancel),
        );
        self.now_playing = ScreenState::settle(now_playing);
        self.popular = ScreenState::settle(popular);
        self.top_rated = ScreenState::settle(top_rated);
    }

    /// Retry affordance: return to `Idle` so the next activation fetches.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Search results screen for a single query.
#[derive(Debug)]
pub struct SearchProvider {
    pub query: String,
    pub results: ScreenState<Vec<MovieSummary>>,
}

impl SearchProvider {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: ScreenState::Idle,
        }
    }

    pub async fn activate(&mut self, catalog: &dyn CatalogApi, cancel: &CancellationToken) {
        if !self.results.is_idle() {
            debug!("Search screen already activated, skipping fetch");
            return;
        }
        self.results = ScreenState::Loading;
        self.results = ScreenState::settle(catalog.search(&self.query, FIRST_PAGE, cancel).await);
    }

    pub fn reset(&mut self) {
        self.results = ScreenState::Idle;
    }
}

/// Detail screen: the catalog bundle plus the bookmark toggle, which is
/// seeded from the store on every activation.
#[derive(Debug)]
pub struct DetailProvider {
    pub movie_id: i32,
    pub data: ScreenState<DetailBundle>,
    pub bookmarked: bool,
}

impl DetailProvider {
    pub fn new(movie_id: i32) -> Self {
        Self {
            movie_id,
            data: ScreenState::Idle,
            bookmarked: false,
        }
    }

    pub async fn activate(
        &mut self,
        catalog: &dyn CatalogApi,
        store: &BookmarkStore,
        cancel: &CancellationToken,
    ) {
        if !self.data.is_idle() {
            debug!("Detail screen already activated, skipping fetch");
            return;
        }
        self.bookmarked = store.contains(self.movie_id);
        self.data = ScreenState::Loading;
        self.data = ScreenState::settle(catalog.detail(self.movie_id, cancel).await);
    }

    /// Flips the bookmark for the displayed movie. Requires the detail
    /// bundle to be loaded; before that the toggle state is left alone.
    pub fn toggle_bookmark(&mut self, store: &mut BookmarkStore) -> Result<bool, StoreError> {
        let (title, poster) = match self.data.data() {
            Some(bundle) => (
                bundle.detail.title.clone(),
                bundle.detail.poster_path.clone(),
            ),
            None => {
                warn!("Bookmark toggle before detail loaded, ignoring");
                return Ok(self.bookmarked);
            }
        };
        self.bookmarked = store.toggle(self.movie_id, &title, poster.as_deref())?;
        Ok(self.bookmarked)
    }

    pub fn reset(&mut self) {
        self.data = ScreenState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_state_accessors() {
        let idle: ScreenState<Vec<MovieSummary>> = ScreenState::Idle;
        assert!(idle.is_idle());
        assert!(!idle.is_loading());
        assert!(idle.data().is_none());

        let failed: ScreenState<Vec<MovieSummary>> = ScreenState::Failed("boom".into());
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.data().is_none());
    }
}
