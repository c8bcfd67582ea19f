use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkerState;

/// Registration file name in the cache directory
const REGISTRATION_FILE: &str = "registration.json";

/// Lifecycle state recorded for one cache generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub cache_name: String,
    pub state: WorkerState,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(cache_name: impl Into<String>, state: WorkerState) -> Self {
        Self {
            cache_name: cache_name.into(),
            state,
            updated_at: Utc::now(),
        }
    }

    /// State to resume with when running generation `cache_name`.
    ///
    /// A registration for another generation means the version was bumped,
    /// so the new worker starts from scratch.
    pub fn state_for(&self, cache_name: &str) -> WorkerState {
        if self.cache_name == cache_name {
            self.state
        } else {
            WorkerState::Uninstalled
        }
    }
}

/// Persists the registration between host processes.
pub struct RegistrationStore {
    cache_dir: PathBuf,
}

impl RegistrationStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn load(&self) -> Result<Option<Registration>> {
        let path = self.registration_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read registration file")?;
        let registration: Registration =
            serde_json::from_str(&contents).context("Failed to parse registration file")?;
        Ok(Some(registration))
    }

    pub fn save(&self, registration: &Registration) -> Result<()> {
        let path = self.registration_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(registration)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.registration_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn registration_path(&self) -> PathBuf {
        self.cache_dir.join(REGISTRATION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_for_same_generation() {
        let reg = Registration::new("delta-lighting-v1", WorkerState::Active);
        assert_eq!(reg.state_for("delta-lighting-v1"), WorkerState::Active);
    }

    #[test]
    fn test_state_for_bumped_generation() {
        let reg = Registration::new("delta-lighting-v1", WorkerState::Active);
        assert_eq!(reg.state_for("delta-lighting-v2"), WorkerState::Uninstalled);
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RegistrationStore::new(dir.path().join("nested"));
        assert!(store.load().expect("load").is_none());

        let reg = Registration::new("delta-lighting-v1", WorkerState::Installed);
        store.save(&reg).expect("save");
        assert_eq!(store.load().expect("load"), Some(reg));

        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
    }
}
