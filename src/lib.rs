// photoframe: demo web service that proxies a photo-library API.
// Searches and album listings are paged out of the upstream, cached per user
// with independent TTLs, and the last query is kept for transparent replay.

pub mod cache;
pub mod config;
pub mod error;
pub mod photos;
pub mod queue;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{ApiError, FrameError, Result};
pub use queue::{AlbumsResponse, FrameService, QueueResponse};
