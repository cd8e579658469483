// Pagination fetcher for the photo-library API.
// Drives repeated page calls until a minimum accumulation or end of data,
// normalizing and filtering results along the way.

use crate::error::ApiError;

use super::client::PhotosClient;
use super::types::{Album, MediaItem, SearchParameters};

/// Result of a paged media-item search. A failure mid-loop lands in `error`
/// with everything accumulated up to that point preserved.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub media_items: Vec<MediaItem>,
    /// Parameters as they stood after the last round trip (page fields
    /// included). Callers strip paging before persisting.
    pub parameters: SearchParameters,
    pub error: Option<ApiError>,
}

/// Result of a full album enumeration.
#[derive(Debug, Clone)]
pub struct AlbumsOutcome {
    pub albums: Vec<Album>,
    pub error: Option<ApiError>,
}

/// Page-loop state after absorbing one response. Failure is terminal and
/// carried separately by the outcome, so only the live states appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    MorePages,
    Done,
}

/// Decide whether the loop continues, from the accumulated count, the
/// minimum target (`None` = enumerate everything), and the continuation
/// token of the last response.
pub fn advance(
    accumulated: usize,
    minimum_count: Option<usize>,
    next_page_token: Option<&str>,
) -> PageState {
    match next_page_token {
        Some(token) if !token.is_empty() => match minimum_count {
            Some(minimum) if accumulated >= minimum => PageState::Done,
            _ => PageState::MorePages,
        },
        // No token: end of data regardless of how much accumulated.
        _ => PageState::Done,
    }
}

/// Drop sparse entries and, for filter-mode searches, anything that is not a
/// still image.
pub fn normalize_media_items(
    entries: Vec<Option<MediaItem>>,
    images_only: bool,
) -> Vec<MediaItem> {
    entries
        .into_iter()
        .flatten()
        .filter(|item| !images_only || item.is_image())
        .collect()
}

fn normalize_albums(entries: Vec<Option<Album>>) -> Vec<Album> {
    entries.into_iter().flatten().collect()
}

/// Search media items, looping pages until at least `minimum_count` items
/// accumulate or the upstream runs out of data.
///
/// Errors abort the loop immediately; no retries.
pub async fn search_media_items(
    client: &PhotosClient,
    token: &str,
    mut parameters: SearchParameters,
    minimum_count: usize,
    page_size: u32,
) -> SearchOutcome {
    parameters.page_size = Some(page_size);
    parameters.page_token = None;
    let images_only = parameters.wants_images_only();

    let mut media_items = Vec::new();
    let error = loop {
        let page = match client.search_page(token, &parameters).await {
            Ok(page) => page,
            Err(failure) => break Some(ApiError::from_failure(failure)),
        };

        media_items.extend(normalize_media_items(page.media_items, images_only));
        parameters.page_token = page.next_page_token;

        match advance(
            media_items.len(),
            Some(minimum_count),
            parameters.page_token.as_deref(),
        ) {
            PageState::MorePages => {}
            PageState::Done => break None,
        }
    };

    SearchOutcome {
        media_items,
        parameters,
        error,
    }
}

/// Enumerate every album the user has. Unbounded: the loop only stops when
/// no continuation token remains, since callers need the complete list.
pub async fn list_albums(client: &PhotosClient, token: &str, page_size: u32) -> AlbumsOutcome {
    let mut albums = Vec::new();
    let mut page_token: Option<String> = None;

    let error = loop {
        let page = match client
            .albums_page(token, page_size, page_token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(failure) => break Some(ApiError::from_failure(failure)),
        };

        albums.extend(normalize_albums(page.albums));
        page_token = page.next_page_token;

        match advance(albums.len(), None, page_token.as_deref()) {
            PageState::MorePages => {}
            PageState::Done => break None,
        }
    };

    AlbumsOutcome { albums, error }
}
