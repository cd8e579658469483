// Runtime configuration.
// Environment variables override hard defaults; nothing is required.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::photos::client::DEFAULT_API_BASE;

/// Knobs for the service: where to listen, where the upstream lives, how much
/// to accumulate per search, and how long results stay fresh.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub api_base_url: String,
    /// Minimum accumulation target for media-item searches.
    pub photos_to_load: usize,
    pub search_page_size: u32,
    pub album_page_size: u32,
    /// Kept under the upstream base-URL expiry window (~60 min).
    pub photo_ttl: Duration,
    pub album_ttl: Duration,
    /// Query-store location; `None` falls back to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            photos_to_load: 150,
            search_page_size: 100,
            album_page_size: 50,
            photo_ttl: Duration::from_secs(55 * 60),
            album_ttl: Duration::from_secs(10 * 60),
            data_dir: None,
        }
    }
}

impl Config {
    /// Build a config from `PHOTOFRAME_*` environment variables, keeping the
    /// default for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(bind) = env::var("PHOTOFRAME_BIND") {
            config.bind_addr = bind;
        }
        if let Ok(base) = env::var("PHOTOFRAME_API_BASE") {
            config.api_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(count) = env_parse("PHOTOFRAME_PHOTOS_TO_LOAD") {
            config.photos_to_load = count;
        }
        if let Some(size) = env_parse("PHOTOFRAME_SEARCH_PAGE_SIZE") {
            config.search_page_size = size;
        }
        if let Some(size) = env_parse("PHOTOFRAME_ALBUM_PAGE_SIZE") {
            config.album_page_size = size;
        }
        if let Some(secs) = env_parse("PHOTOFRAME_PHOTO_TTL_SECS") {
            config.photo_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("PHOTOFRAME_ALBUM_TTL_SECS") {
            config.album_ttl = Duration::from_secs(secs);
        }
        if let Ok(dir) = env::var("PHOTOFRAME_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
