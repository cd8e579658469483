// Photo-library API module.
// Client, wire types, and the pagination fetcher for the upstream service.

pub mod client;
pub mod search;
pub mod types;

pub use client::PhotosClient;
pub use search::{AlbumsOutcome, SearchOutcome, list_albums, search_media_items};
pub use types::*;
