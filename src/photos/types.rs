// Photo-library API wire types.
// Defines structs for serializing search requests and deserializing responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for a media-item search.
///
/// Exactly one mode is active per request: a filter search (`filters` set) or
/// an album search (`album_id` set). `page_size` and `page_token` are
/// request-scoped paging artifacts managed by the fetcher; they are stripped
/// before the parameters are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl SearchParameters {
    /// Parameters for a generic filter search.
    pub fn for_filters(filters: Filters) -> Self {
        SearchParameters {
            filters: Some(filters),
            ..Default::default()
        }
    }

    /// Parameters selecting a single album.
    pub fn for_album(album_id: impl Into<String>) -> Self {
        SearchParameters {
            album_id: Some(album_id.into()),
            ..Default::default()
        }
    }

    /// Whether results should be restricted to still images.
    ///
    /// Album listings cannot be type-filtered upstream, so album-mode
    /// searches pass everything through.
    pub fn wants_images_only(&self) -> bool {
        self.album_id.is_none()
    }

    /// Copy with the request-scoped paging fields removed. This is the shape
    /// the query store persists.
    pub fn without_paging(&self) -> Self {
        SearchParameters {
            album_id: self.album_id.clone(),
            filters: self.filters.clone(),
            page_size: None,
            page_token: None,
        }
    }
}

/// Search filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_filter: Option<ContentFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type_filter: Option<MediaTypeFilter>,
}

/// Content-category include/exclude lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_content_categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_content_categories: Vec<String>,
}

/// Date restriction: exact dates and/or ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<ApiDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<DateRange>,
}

/// Calendar date in the upstream's year/month/day shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: ApiDate,
    pub end_date: ApiDate,
}

/// Media-type restriction (e.g. ["PHOTO"]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeFilter {
    pub media_types: Vec<String>,
}

/// A photo or video from the upstream library.
///
/// `base_url` is time-limited by upstream policy (roughly 60 minutes), which
/// is why cached media items expire before that window does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub base_url: String,
    pub mime_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_metadata: Option<MediaMetadata>,
}

impl MediaItem {
    /// Whether the MIME type indicates a still image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Capture metadata attached to a media item. Dimensions arrive as strings
/// from the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// An album from the upstream library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_items_count: Option<String>,
}

/// One page of a media-item search response.
///
/// The upstream may return a sparse array, so entries deserialize as options
/// and are flattened during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub media_items: Vec<Option<MediaItem>>,

    pub next_page_token: Option<String>,
}

/// One page of an album-listing response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumsPage {
    #[serde(default)]
    pub albums: Vec<Option<Album>>,

    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_filters() -> Filters {
        Filters {
            content_filter: Some(ContentFilter {
                included_content_categories: vec!["LANDSCAPES".to_string()],
                excluded_content_categories: Vec::new(),
            }),
            date_filter: None,
            media_type_filter: Some(MediaTypeFilter {
                media_types: vec!["PHOTO".to_string()],
            }),
        }
    }

    #[test]
    fn test_without_paging_strips_request_fields() {
        let mut params = SearchParameters::for_filters(sample_filters());
        params.page_size = Some(100);
        params.page_token = Some("token-1".to_string());

        let stored = params.without_paging();
        assert!(stored.page_size.is_none());
        assert!(stored.page_token.is_none());
        assert_eq!(stored.filters, params.filters);

        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("pageToken").is_none());
        assert!(json.get("pageSize").is_none());
    }

    #[test]
    fn test_search_modes() {
        let filter_search = SearchParameters::for_filters(sample_filters());
        assert!(filter_search.wants_images_only());

        let album_search = SearchParameters::for_album("abc");
        assert!(!album_search.wants_images_only());
        assert_eq!(album_search.album_id.as_deref(), Some("abc"));
        assert!(album_search.filters.is_none());
    }

    #[test]
    fn test_search_body_is_camel_case() {
        let mut params = SearchParameters::for_album("abc");
        params.page_size = Some(50);
        params.page_token = Some("t".to_string());

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["albumId"], "abc");
        assert_eq!(json["pageSize"], 50);
        assert_eq!(json["pageToken"], "t");
    }

    #[test]
    fn test_sparse_page_deserializes() {
        let raw = r#"{
            "mediaItems": [
                {"id": "a", "baseUrl": "https://x/a", "mimeType": "image/jpeg"},
                null,
                {"id": "b", "baseUrl": "https://x/b", "mimeType": "video/mp4"}
            ],
            "nextPageToken": "next"
        }"#;

        let page: SearchPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.media_items.len(), 3);
        assert!(page.media_items[1].is_none());
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    }

    #[test]
    fn test_page_without_items_deserializes() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.media_items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
