use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::TmdbConfig;

/// Error taxonomy for catalog queries. The client performs no retries;
/// callers decide how a failure is presented.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} -> {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("JSON parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fetch cancelled")]
    Cancelled,
}

/// Read-only queries against the remote movie catalog. Every call takes a
/// cancellation token so a screen torn down mid-fetch does not leak the
/// request.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn now_playing(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError>;
    async fn popular(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError>;
    async fn top_rated(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError>;
    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError>;
    async fn detail(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<DetailBundle, FetchError>;
}

/// One movie as it appears in a list query. A fresh snapshot per fetch,
/// never mutated locally.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsInfo {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideosInfo {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Everything the detail screen needs, fetched in one activation.
#[derive(Debug, Clone)]
pub struct DetailBundle {
    pub detail: MovieDetail,
    pub credits: CreditsInfo,
    pub videos: VideosInfo,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<MovieSummary>,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn fetch_list(
        &self,
        endpoint: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let url = format!(
            "{}/movie/{endpoint}?api_key={}&language=en-US&page={page}",
            self.config.base_url, self.config.api_key
        );
        let data: ListResponse = self.get_json(&url, cancel).await?;
        Ok(data.results)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let res = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            res = self.client.get(url).send() => res?,
        };
        let status = res.status();
        let text = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            text = res.text() => text?,
        };
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: text,
            });
        }
        let parsed: T = serde_json::from_str(&text)?;
        Ok(parsed)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn now_playing(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.fetch_list("now_playing", page, cancel).await
    }

    async fn popular(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.fetch_list("popular", page, cancel).await
    }

    async fn top_rated(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.fetch_list("top_rated", page, cancel).await
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let url = format!(
            "{}/search/movie/?query={}&api_key={}&page={page}",
            self.config.base_url,
            urlencoding::encode(query),
            self.config.api_key
        );
        let data: ListResponse = self.get_json(&url, cancel).await?;
        Ok(data.results)
    }

    async fn detail(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<DetailBundle, FetchError> {
        let url_detail = format!(
            "{}/movie/{id}?api_key={}&language=en-US",
            self.config.base_url, self.config.api_key
        );
        let url_credits = format!(
            "{}/movie/{id}/credits?api_key={}",
            self.config.base_url, self.config.api_key
        );
        let url_videos = format!(
            "{}/movie/{id}/videos?api_key={}",
            self.config.base_url, self.config.api_key
        );

        let (detail, credits, videos) = tokio::try_join!(
            self.get_json::<MovieDetail>(&url_detail, cancel),
            self.get_json::<CreditsInfo>(&url_credits, cancel),
            self.get_json::<VideosInfo>(&url_videos, cancel),
        )?;

        Ok(DetailBundle {
            detail,
            credits,
            videos,
        })
    }
}
