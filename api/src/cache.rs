//! On-disk cache of raw game-summary payloads, one JSON file per game.
//!
//! Entries never expire. Only summaries the provider reports as complete are
//! written, so a cached file always describes a finished game.

use serde_json::Value;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SummaryCache {
    dir: PathBuf,
}

impl SummaryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<game_id>_summary.json`. Bytes of the id outside `[A-Za-z0-9-]`
    /// are written as `%XX`, so distinct ids get distinct files and none can
    /// escape the directory.
    pub fn path_for(&self, game_id: &str) -> PathBuf {
        let mut safe = String::with_capacity(game_id.len());
        for byte in game_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                safe.push(char::from(byte));
            } else {
                safe.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{safe}_summary.json"))
    }

    /// Return the cached blob for `game_id`, or run `fetch` once and keep its
    /// result if `is_complete` accepts it. A failed fetch writes nothing.
    pub async fn get_or_fetch<C, F, Fut>(
        &self,
        game_id: &str,
        is_complete: C,
        fetch: F,
    ) -> Option<Value>
    where
        C: Fn(&Value) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Value>>,
    {
        if let Some(hit) = self.load(game_id) {
            log::debug!("summary cache hit for {game_id}");
            return Some(hit);
        }

        log::debug!("summary cache miss for {game_id}");
        let value = fetch().await?;
        if is_complete(&value) {
            if let Err(e) = self.store(game_id, &value) {
                log::warn!("could not cache summary for {game_id}: {e}");
            }
        }
        Some(value)
    }

    /// Read a cached blob. Unreadable or corrupt files are removed and
    /// reported as a miss.
    pub fn load(&self, game_id: &str) -> Option<Value> {
        let path = self.path_for(game_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding corrupt cache file {}: {e}", path.display());
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Write through a temporary sibling and rename, so readers never see a
    /// partial file.
    pub fn store(&self, game_id: &str, value: &Value) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(game_id);
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_vec(value).map_err(io::Error::other)?;
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &path)
    }

    /// Remove every cached summary. Returns how many files were deleted.
    pub fn clear(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_summary = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_summary.json"));
            if is_summary {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
