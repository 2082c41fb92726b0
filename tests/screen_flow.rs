use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use marquee::bookmarks::BookmarkStore;
use marquee::render;
use marquee::screens::{DetailProvider, HomeProvider, SearchProvider};
use marquee::tmdb::{
    CastMember, CatalogApi, CreditsInfo, DetailBundle, FetchError, Genre, MovieDetail,
    MovieSummary, Video, VideosInfo,
};

#[derive(Default)]
struct FakeCatalog {
    now_playing: Vec<MovieSummary>,
    popular: Vec<MovieSummary>,
    top_rated: Vec<MovieSummary>,
    search_results: Vec<MovieSummary>,
    bundle: Option<DetailBundle>,
    popular_fails: bool,
    calls: AtomicUsize,
}

impl FakeCatalog {
    fn check_cancel(&self, cancel: &CancellationToken) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(())
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn now_playing(
        &self,
        _page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.check_cancel(cancel)?;
        Ok(self.now_playing.clone())
    }

    async fn popular(
        &self,
        _page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.check_cancel(cancel)?;
        if self.popular_fails {
            return Err(FetchError::Status {
                url: "http://fake/movie/popular".to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "upstream down".to_string(),
            });
        }
        Ok(self.popular.clone())
    }

    async fn top_rated(
        &self,
        _page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.check_cancel(cancel)?;
        Ok(self.top_rated.clone())
    }

    async fn search(
        &self,
        _query: &str,
        _page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.check_cancel(cancel)?;
        Ok(self.search_results.clone())
    }

    async fn detail(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<DetailBundle, FetchError> {
        self.check_cancel(cancel)?;
        match &self.bundle {
            Some(bundle) if bundle.detail.id == id => Ok(bundle.clone()),
            _ => Err(FetchError::Status {
                url: format!("http://fake/movie/{id}"),
                status: reqwest::StatusCode::NOT_FOUND,
                body: "not found".to_string(),
            }),
        }
    }
}

fn summaries(n: usize) -> Vec<MovieSummary> {
    (0..n)
        .map(|i| MovieSummary {
            id: i as i32,
            title: format!("Movie {i}"),
            poster_path: Some(format!("/poster{i}.jpg")),
            release_date: Some("2021-03-15".to_string()),
            vote_average: 6.0,
        })
        .collect()
}

fn answer_bundle() -> DetailBundle {
    DetailBundle {
        detail: MovieDetail {
            id: 42,
            title: "The Answer".to_string(),
            poster_path: Some("/answer.jpg".to_string()),
            backdrop_path: Some("/bg.jpg".to_string()),
            release_date: Some("2021-03-15".to_string()),
            vote_average: 8.4,
            runtime: Some(108),
            overview: "Deep thought.".to_string(),
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
        },
        credits: CreditsInfo {
            cast: vec![CastMember {
                id: 1,
                name: "Lead Actor".to_string(),
                character: "Lead".to_string(),
                profile_path: None,
            }],
        },
        videos: VideosInfo {
            results: vec![Video {
                key: "abc".to_string(),
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
            }],
        },
    }
}

#[tokio::test]
async fn home_surfaces_first_five_of_popular() {
    let catalog = FakeCatalog {
        now_playing: summaries(3),
        popular: summaries(8),
        top_rated: summaries(6),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut home = HomeProvider::new();
    home.activate(&catalog, &cancel).await;

    assert!(!home.popular.is_loading());
    let popular = home.popular.data().expect("popular should be ready");
    assert_eq!(popular.len(), 8);
    assert_eq!(render::home_rail(popular).len(), 5);
    assert_eq!(render::home_rail(popular)[0].title, "Movie 0");
}

#[tokio::test]
async fn home_rails_fail_independently() {
    let catalog = FakeCatalog {
        now_playing: summaries(2),
        popular_fails: true,
        top_rated: summaries(2),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut home = HomeProvider::new();
    home.activate(&catalog, &cancel).await;

    assert!(home.now_playing.data().is_some());
    assert!(home.top_rated.data().is_some());
    assert!(!home.popular.is_loading());
    let message = home.popular.error().expect("popular should have failed");
    assert!(message.contains("upstream down"));
}

#[tokio::test]
async fn activation_fetches_exactly_once() {
    let catalog = FakeCatalog {
        popular: summaries(1),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut home = HomeProvider::new();

    home.activate(&catalog, &cancel).await;
    assert_eq!(catalog.call_count(), 3);

    // Re-activation without reset must not fetch again.
    home.activate(&catalog, &cancel).await;
    assert_eq!(catalog.call_count(), 3);

    // Reset is the retry affordance.
    home.reset();
    home.activate(&catalog, &cancel).await;
    assert_eq!(catalog.call_count(), 6);
}

#[tokio::test]
async fn cancelled_token_lands_in_failed_state() {
    let catalog = FakeCatalog {
        search_results: summaries(4),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut search = SearchProvider::new("avenger");
    search.activate(&catalog, &cancel).await;

    assert!(!search.results.is_loading());
    let message = search.results.error().expect("search should have failed");
    assert!(message.contains("cancelled"));
}

#[tokio::test]
async fn search_returns_parsed_summaries() {
    let catalog = FakeCatalog {
        search_results: summaries(4),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut search = SearchProvider::new("movie");
    search.activate(&catalog, &cancel).await;

    let results = search.results.data().expect("search should be ready");
    assert_eq!(results.len(), 4);
    assert_eq!(results[2].title, "Movie 2");
}

#[tokio::test]
async fn detail_seeds_bookmark_state_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = BookmarkStore::open(dir.path().join("bookmarks.json")).unwrap();
    store.save(42, "The Answer", Some("/answer.jpg")).unwrap();

    let catalog = FakeCatalog {
        bundle: Some(answer_bundle()),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut detail = DetailProvider::new(42);
    detail.activate(&catalog, &store, &cancel).await;

    assert!(detail.bookmarked);
    assert_eq!(detail.data.data().unwrap().detail.title, "The Answer");
}

#[tokio::test]
async fn bookmark_toggle_saves_then_removes() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = BookmarkStore::open(dir.path().join("bookmarks.json")).unwrap();

    let catalog = FakeCatalog {
        bundle: Some(answer_bundle()),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let mut detail = DetailProvider::new(42);
    detail.activate(&catalog, &store, &cancel).await;
    assert!(!detail.bookmarked);

    // First press saves the record.
    let on = detail.toggle_bookmark(&mut store).unwrap();
    assert!(on);
    assert!(detail.bookmarked);
    let record = store.get(42).expect("record should exist");
    assert_eq!(record.title, "The Answer");
    assert_eq!(record.poster_path.as_deref(), Some("/answer.jpg"));

    // Second press removes it and reverts the toggle.
    let off = detail.toggle_bookmark(&mut store).unwrap();
    assert!(!off);
    assert!(!detail.bookmarked);
    assert!(store.get(42).is_none());
}

#[tokio::test]
async fn detail_fetch_failure_is_explicit() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookmarkStore::open(dir.path().join("bookmarks.json")).unwrap();

    let catalog = FakeCatalog::default(); // no bundle: every detail is a 404
    let cancel = CancellationToken::new();
    let mut detail = DetailProvider::new(7);
    detail.activate(&catalog, &store, &cancel).await;

    assert!(!detail.data.is_loading());
    assert!(detail.data.error().is_some());
}
