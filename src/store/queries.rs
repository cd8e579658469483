// Durable per-user store of the last search parameters.
// One JSON file per user, written atomically; no TTL.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::photos::SearchParameters;

use super::paths;

/// On-disk record: the caller-visible parameters plus when they were stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredQuery {
    parameters: SearchParameters,
    stored_at: DateTime<Utc>,
}

/// Records "the last thing each user asked for", so an expired result cache
/// can be refilled without new user input.
#[derive(Debug)]
pub struct QueryStore {
    base_dir: PathBuf,
}

impl QueryStore {
    /// Store rooted at an explicit directory (tests point this at a tempdir).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store rooted at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let base_dir = paths::data_dir().ok_or(FrameError::NoDataDir)?;
        Ok(Self::new(base_dir))
    }

    /// Last stored parameters for a user, if any.
    pub fn get(&self, user_id: &str) -> Result<Option<SearchParameters>> {
        let path = paths::query_path(&self.base_dir, user_id);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let stored: StoredQuery = serde_json::from_str(&contents)?;
        Ok(Some(stored.parameters))
    }

    /// Record a user's query, overwriting any prior record. The request-scoped
    /// paging fields are stripped unconditionally before hitting disk.
    pub fn set(&self, user_id: &str, parameters: &SearchParameters) -> Result<()> {
        let stored = StoredQuery {
            parameters: parameters.without_paging(),
            stored_at: Utc::now(),
        };

        let path = paths::query_path(&self.base_dir, user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&stored)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}
