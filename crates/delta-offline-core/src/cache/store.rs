use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::error::validate_name;
use super::{CacheError, CacheStorage, CachedData};
use crate::models::{Request, RequestKey, Response};

/// Extension for persisted generation files
const GENERATION_EXT: &str = "json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Generation {
    name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    entries: BTreeMap<RequestKey, CachedData<Response>>,
}

impl Generation {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// Overview of one generation, for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub name: String,
    pub entries: usize,
    pub last_write: Option<String>,
}

/// In-memory cache storage, optionally mirrored to a directory.
///
/// Each generation is written to `<dir>/<name>.json` after every change and
/// read back by [`CacheStore::persistent`].
pub struct CacheStore {
    dir: Option<PathBuf>,
    generations: RwLock<Vec<Generation>>,
}

impl CacheStore {
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            generations: RwLock::new(Vec::new()),
        }
    }

    /// Open a store backed by `dir`, loading every generation file found there.
    ///
    /// Unreadable or corrupt files are skipped with a warning.
    pub async fn persistent(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))?;

        let mut generations = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))?;
        while let Some(item) = read_dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&dir, e))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(GENERATION_EXT) {
                continue;
            }
            match Self::load_generation(&path).await {
                Ok(generation) => generations.push(generation),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable cache generation"),
            }
        }
        generations.sort_by_key(|g| g.created_at);
        debug!(dir = %dir.display(), count = generations.len(), "Loaded cache generations");

        Ok(Self {
            dir: Some(dir),
            generations: RwLock::new(generations),
        })
    }

    async fn load_generation(path: &Path) -> Result<Generation, CacheError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| CacheError::io(path, e))?;
        let generation: Generation =
            serde_json::from_slice(&contents).map_err(|source| CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        validate_name(&generation.name)?;
        Ok(generation)
    }

    fn generation_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", name, GENERATION_EXT))
    }

    async fn persist(&self, generation: &Generation) -> Result<(), CacheError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = Self::generation_path(dir, &generation.name);
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_vec(generation).map_err(|source| CacheError::Corrupt {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| CacheError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| CacheError::io(&path, e))?;
        Ok(())
    }

    /// Summaries of every generation in creation order
    pub async fn summaries(&self) -> Vec<GenerationSummary> {
        let generations = self.generations.read().await;
        generations
            .iter()
            .map(|g| GenerationSummary {
                name: g.name.clone(),
                entries: g.entries.len(),
                last_write: g
                    .entries
                    .values()
                    .max_by_key(|e| e.cached_at)
                    .map(|e| e.age_display()),
            })
            .collect()
    }

    /// Cached URLs in one generation, sorted
    pub async fn urls(&self, name: &str) -> Vec<String> {
        let generations = self.generations.read().await;
        generations
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.entries.keys().map(|k| k.to_string()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CacheStorage for CacheStore {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        validate_name(name)?;
        let mut generations = self.generations.write().await;
        if generations.iter().any(|g| g.name == name) {
            return Ok(());
        }
        let generation = Generation::new(name);
        self.persist(&generation).await?;
        debug!(cache = name, "Created cache generation");
        generations.push(generation);
        Ok(())
    }

    async fn put(
        &self,
        name: &str,
        request: &Request,
        response: Response,
    ) -> Result<(), CacheError> {
        validate_name(name)?;
        let key = request
            .cache_key()
            .ok_or_else(|| CacheError::UnsupportedMethod(request.to_string()))?;

        let mut generations = self.generations.write().await;
        let position = generations.iter().position(|g| g.name == name);
        let mut updated = match position {
            Some(index) => generations[index].clone(),
            None => Generation::new(name),
        };
        updated.entries.insert(key, CachedData::new(response));

        // Memory only changes once the file is written
        self.persist(&updated).await?;
        match position {
            Some(index) => generations[index] = updated,
            None => generations.push(updated),
        }
        Ok(())
    }

    async fn lookup(&self, name: &str, request: &Request) -> Result<Option<Response>, CacheError> {
        let Some(key) = request.cache_key() else {
            return Ok(None);
        };
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find(|g| g.name == name)
            .and_then(|g| g.entries.get(&key))
            .map(|e| e.data.clone()))
    }

    async fn match_any(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        let Some(key) = request.cache_key() else {
            return Ok(None);
        };
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find_map(|g| g.entries.get(&key))
            .map(|e| e.data.clone()))
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let generations = self.generations.read().await;
        Ok(generations.iter().map(|g| g.name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut generations = self.generations.write().await;
        let Some(index) = generations.iter().position(|g| g.name == name) else {
            return Ok(false);
        };
        if let Some(dir) = &self.dir {
            let path = Self::generation_path(dir, name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(path, e)),
            }
        }
        generations.remove(index);
        debug!(cache = name, "Deleted cache generation");
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn request(path: &str) -> Request {
        let origin = Url::parse("https://delta.example/").expect("valid origin");
        Request::get_path(&origin, path).expect("valid path")
    }

    #[tokio::test]
    async fn test_put_then_lookup() {
        let store = CacheStore::in_memory();
        store
            .put("delta-lighting-v1", &request("/"), Response::ok("home"))
            .await
            .expect("put failed");

        let hit = store
            .lookup("delta-lighting-v1", &request("/"))
            .await
            .expect("lookup failed");
        assert_eq!(hit, Some(Response::ok("home")));

        let miss = store
            .lookup("delta-lighting-v1", &request("/about.html"))
            .await
            .expect("lookup failed");
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_put_rejects_non_get() {
        let store = CacheStore::in_memory();
        let url = Url::parse("https://delta.example/api/submit-requests").expect("valid url");
        let post = Request::new(Method::POST, url);

        let err = store
            .put("delta-lighting-v1", &post, Response::ok(""))
            .await
            .expect_err("POST must not be cached");
        assert!(matches!(err, CacheError::UnsupportedMethod(_)));
    }

    #[tokio::test]
    async fn test_match_any_prefers_oldest_generation() {
        let store = CacheStore::in_memory();
        store.open("v1").await.expect("open failed");
        store.open("v2").await.expect("open failed");
        store
            .put("v2", &request("/"), Response::ok("new"))
            .await
            .expect("put failed");
        store
            .put("v1", &request("/"), Response::ok("old"))
            .await
            .expect("put failed");

        let hit = store.match_any(&request("/")).await.expect("match failed");
        assert_eq!(hit, Some(Response::ok("old")));
        assert_eq!(store.keys().await.expect("keys failed"), vec!["v1", "v2"]);
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_validates() {
        let store = CacheStore::in_memory();
        store.open("v1").await.expect("open failed");
        store
            .put("v1", &request("/"), Response::ok("home"))
            .await
            .expect("put failed");
        store.open("v1").await.expect("reopen failed");

        assert!(store.match_any(&request("/")).await.expect("match failed").is_some());
        assert!(matches!(
            store.open("../escape").await,
            Err(CacheError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = CacheStore::in_memory();
        store.open("v1").await.expect("open failed");

        assert!(store.delete("v1").await.expect("delete failed"));
        assert!(!store.delete("v1").await.expect("delete failed"));
        assert!(store.keys().await.expect("keys failed").is_empty());
    }

    #[tokio::test]
    async fn test_persistent_store_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = CacheStore::persistent(dir.path()).await.expect("open store");
            store.open("v1").await.expect("open failed");
            store
                .put("v2", &request("/index.html"), Response::ok("index"))
                .await
                .expect("put failed");
            store.delete("v1").await.expect("delete failed");
        }

        let reloaded = CacheStore::persistent(dir.path()).await.expect("reopen store");
        assert_eq!(reloaded.keys().await.expect("keys failed"), vec!["v2"]);
        let hit = reloaded
            .lookup("v2", &request("/index.html"))
            .await
            .expect("lookup failed");
        assert_eq!(hit, Some(Response::ok("index")));
        assert_eq!(
            reloaded.urls("v2").await,
            vec!["https://delta.example/index.html".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_generation_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CacheStore::persistent(dir.path()).await.expect("open store");
        store
            .put("v1", &request("/"), Response::ok("home"))
            .await
            .expect("put failed");

        // A directory in the way of the temp file makes every write fail
        std::fs::create_dir(dir.path().join("v1.json.tmp")).expect("create blocker");

        let err = store
            .put("v1", &request("/"), Response::ok("replaced"))
            .await
            .expect_err("write should fail");
        assert!(matches!(err, CacheError::Io { .. }));
        let err = store
            .put("v1", &request("/about.html"), Response::ok("about"))
            .await
            .expect_err("write should fail");
        assert!(matches!(err, CacheError::Io { .. }));

        let hit = store.match_any(&request("/")).await.expect("match failed");
        assert_eq!(hit, Some(Response::ok("home")));
        assert!(store
            .match_any(&request("/about.html"))
            .await
            .expect("match failed")
            .is_none());

        let reloaded = CacheStore::persistent(dir.path()).await.expect("reopen store");
        assert_eq!(reloaded.urls("v1").await, store.urls("v1").await);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_create_generation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CacheStore::persistent(dir.path()).await.expect("open store");
        std::fs::create_dir(dir.path().join("v2.json.tmp")).expect("create blocker");

        assert!(store
            .put("v2", &request("/"), Response::ok("home"))
            .await
            .is_err());
        assert!(store.keys().await.expect("keys failed").is_empty());
        assert!(store.match_any(&request("/")).await.expect("match failed").is_none());
    }

    #[tokio::test]
    async fn test_persistent_store_skips_corrupt_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{not json").expect("write");

        let store = CacheStore::persistent(dir.path()).await.expect("open store");
        assert!(store.keys().await.expect("keys failed").is_empty());
    }

    #[tokio::test]
    async fn test_summaries() {
        let store = CacheStore::in_memory();
        store.open("v1").await.expect("open failed");
        store
            .put("v1", &request("/"), Response::ok("home"))
            .await
            .expect("put failed");

        let summaries = store.summaries().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "v1");
        assert_eq!(summaries[0].entries, 1);
        assert_eq!(summaries[0].last_write.as_deref(), Some("just now"));
    }
}
