use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bookmark store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("bookmark store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One saved movie. Created on bookmark, removed on un-bookmark; the store
/// owns the whole lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
}

/// Key-value persistence for bookmarks, backed by a single JSON file.
/// Mutations are idempotent and rewrite the file on every change; there is
/// no cross-process concurrency to guard against.
#[derive(Debug)]
pub struct BookmarkStore {
    path: PathBuf,
    entries: BTreeMap<i32, BookmarkRecord>,
}

impl BookmarkStore {
    /// Opens the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened bookmark store at {:?} ({} entries)", path, entries.len());
        Ok(Self { path, entries })
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("marquee").join("bookmarks.json"))
    }

    pub fn get(&self, movie_id: i32) -> Option<&BookmarkRecord> {
        self.entries.get(&movie_id)
    }

    pub fn contains(&self, movie_id: i32) -> bool {
        self.entries.contains_key(&movie_id)
    }

    pub fn list(&self) -> impl Iterator<Item = &BookmarkRecord> {
        self.entries.values()
    }

    pub fn save(
        &mut self,
        movie_id: i32,
        title: &str,
        poster_path: Option<&str>,
    ) -> Result<(), StoreError> {
        self.entries.insert(
            movie_id,
            BookmarkRecord {
                movie_id,
                title: title.to_string(),
                poster_path: poster_path.map(|p| p.to_string()),
            },
        );
        self.persist()
    }

    pub fn delete(&mut self, movie_id: i32) -> Result<(), StoreError> {
        self.entries.remove(&movie_id);
        self.persist()
    }

    /// Flips the bookmark for `movie_id` and returns the new state:
    /// `true` if the movie is now bookmarked.
    pub fn toggle(
        &mut self,
        movie_id: i32,
        title: &str,
        poster_path: Option<&str>,
    ) -> Result<bool, StoreError> {
        if self.contains(movie_id) {
            self.delete(movie_id)?;
            Ok(false)
        } else {
            self.save(movie_id, title, poster_path)?;
            Ok(true)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Write-then-rename so a crash mid-write cannot truncate the store.
    fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
