use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Configuration for the TMDB catalog client. Built once at startup and
/// handed to the client constructor; nothing else reads the environment.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base: String,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
        }
    }

    /// Reads `TMDB_API_KEY` (required) and `TMDB_BASE_URL` /
    /// `TMDB_IMAGE_BASE` (optional overrides, mainly for tests).
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        let mut config = Self::new(api_key);
        if let Ok(base) = env::var("TMDB_BASE_URL") {
            config.base_url = base;
        }
        if let Ok(base) = env::var("TMDB_IMAGE_BASE") {
            config.image_base = base;
        }
        Ok(config)
    }
}
