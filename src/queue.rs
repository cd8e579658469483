// Request orchestrator.
// Ties the fetcher, the result caches, and the query store together for each
// inbound user action.

use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::photos::{
    Album, Filters, MediaItem, MediaTypeFilter, PhotosClient, SearchOutcome, SearchParameters,
    list_albums, search_media_items,
};
use crate::store::QueryStore;

/// Outcome of a queue-producing operation.
#[derive(Debug, Clone)]
pub enum QueueResponse {
    /// Photos plus the parameters that produced them, for provenance.
    /// `parameters` can be absent when a cache hit has no surviving query
    /// record (removed out of band).
    Queue {
        photos: Vec<MediaItem>,
        parameters: Option<SearchParameters>,
    },
    /// Fresh user: nothing cached, nothing stored. Not an error.
    Empty,
    /// Upstream failure. Items fetched before the failure ride along so the
    /// caller may still use partial data.
    Failed {
        error: ApiError,
        partial: Vec<MediaItem>,
    },
}

/// Outcome of an album-listing operation.
#[derive(Debug, Clone)]
pub enum AlbumsResponse {
    Albums(Vec<Album>),
    Failed(ApiError),
}

/// Owns all per-user state and the upstream client. Constructed once at
/// startup and shared by the handlers; everything is keyed by the opaque
/// user id the auth layer supplies.
pub struct FrameService {
    client: PhotosClient,
    photo_cache: TtlCache<Vec<MediaItem>>,
    album_cache: TtlCache<Vec<Album>>,
    query_store: QueryStore,
    config: Config,
}

impl FrameService {
    pub fn new(config: Config) -> Result<Self> {
        let client = PhotosClient::new(config.api_base_url.clone())?;
        let query_store = match &config.data_dir {
            Some(dir) => QueryStore::new(dir.clone()),
            None => QueryStore::open_default()?,
        };

        Ok(Self {
            client,
            photo_cache: TtlCache::new(config.photo_ttl),
            album_cache: TtlCache::new(config.album_ttl),
            query_store,
            config,
        })
    }

    /// Run a new filter search. The filter is always restricted to still
    /// images before it goes upstream.
    pub async fn run_filter_search(
        &self,
        user_id: &str,
        token: &str,
        mut filters: Filters,
    ) -> QueueResponse {
        filters.media_type_filter = Some(MediaTypeFilter {
            media_types: vec!["PHOTO".to_string()],
        });

        self.search_and_store(user_id, token, SearchParameters::for_filters(filters))
            .await
    }

    /// Load the contents of a single album. Video items may appear: the
    /// upstream cannot type-filter album searches.
    pub async fn run_album_search(
        &self,
        user_id: &str,
        token: &str,
        album_id: &str,
    ) -> QueueResponse {
        self.search_and_store(user_id, token, SearchParameters::for_album(album_id))
            .await
    }

    /// Return the user's current photo queue without new input.
    ///
    /// Cache hit: cached photos paired with the stored query. Cache expired
    /// but a query survives: replay it transparently. Neither: empty.
    pub async fn get_queue(&self, user_id: &str, token: &str) -> QueueResponse {
        if let Some(photos) = self.photo_cache.get(user_id) {
            info!(user = user_id, count = photos.len(), "queue served from cache");
            return QueueResponse::Queue {
                photos,
                parameters: self.stored_query(user_id),
            };
        }

        match self.stored_query(user_id) {
            Some(parameters) => {
                info!(user = user_id, "queue cache lapsed, replaying stored query");
                self.search_and_store(user_id, token, parameters).await
            }
            None => QueueResponse::Empty,
        }
    }

    /// List every album the user owns, served from the album cache when
    /// fresh. A fetch failure also drops any stale cache slot.
    pub async fn get_albums(&self, user_id: &str, token: &str) -> AlbumsResponse {
        if let Some(albums) = self.album_cache.get(user_id) {
            info!(user = user_id, count = albums.len(), "albums served from cache");
            return AlbumsResponse::Albums(albums);
        }

        let outcome = list_albums(&self.client, token, self.config.album_page_size).await;
        match outcome.error {
            Some(error) => {
                warn!(user = user_id, %error, "album listing failed");
                self.album_cache.remove(user_id);
                AlbumsResponse::Failed(error)
            }
            None => {
                info!(user = user_id, count = outcome.albums.len(), "albums loaded");
                self.album_cache.set(user_id, outcome.albums.clone());
                AlbumsResponse::Albums(outcome.albums)
            }
        }
    }

    async fn search_and_store(
        &self,
        user_id: &str,
        token: &str,
        parameters: SearchParameters,
    ) -> QueueResponse {
        let outcome = search_media_items(
            &self.client,
            token,
            parameters,
            self.config.photos_to_load,
            self.config.search_page_size,
        )
        .await;

        self.complete_search(user_id, outcome)
    }

    /// Cache and persist a successful search; pass a failure through without
    /// touching either.
    fn complete_search(&self, user_id: &str, outcome: SearchOutcome) -> QueueResponse {
        match outcome.error {
            Some(error) => {
                warn!(
                    user = user_id,
                    %error,
                    partial = outcome.media_items.len(),
                    "search failed"
                );
                QueueResponse::Failed {
                    error,
                    partial: outcome.media_items,
                }
            }
            None => {
                info!(user = user_id, count = outcome.media_items.len(), "search loaded");
                self.photo_cache.set(user_id, outcome.media_items.clone());

                let stored = outcome.parameters.without_paging();
                if let Err(err) = self.query_store.set(user_id, &stored) {
                    // The queue still works for this session; only replay
                    // after expiry is degraded.
                    warn!(user = user_id, error = %err, "failed to persist query");
                }

                QueueResponse::Queue {
                    photos: outcome.media_items,
                    parameters: Some(stored),
                }
            }
        }
    }

    fn stored_query(&self, user_id: &str) -> Option<SearchParameters> {
        match self.query_store.get(user_id) {
            Ok(parameters) => parameters,
            Err(err) => {
                warn!(user = user_id, error = %err, "failed to read stored query");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::{ContentFilter, MediaItem};
    use tempfile::TempDir;

    fn test_service(data_dir: &TempDir) -> FrameService {
        let config = Config {
            // Unroutable; these tests never reach the network.
            api_base_url: "http://127.0.0.1:9".to_string(),
            data_dir: Some(data_dir.path().to_path_buf()),
            ..Config::default()
        };
        FrameService::new(config).unwrap()
    }

    fn image(id: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            base_url: format!("https://photos.test/{id}"),
            mime_type: "image/jpeg".to_string(),
            description: None,
            product_url: None,
            filename: None,
            media_metadata: None,
        }
    }

    fn landscape_params() -> SearchParameters {
        SearchParameters::for_filters(Filters {
            content_filter: Some(ContentFilter {
                included_content_categories: vec!["LANDSCAPES".to_string()],
                excluded_content_categories: Vec::new(),
            }),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_fresh_user_gets_empty_queue() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        let response = service.get_queue("new-user", "token").await;
        assert!(matches!(response, QueueResponse::Empty));
    }

    #[tokio::test]
    async fn test_successful_search_caches_and_stores() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        let mut parameters = landscape_params();
        parameters.page_size = Some(100);
        let outcome = SearchOutcome {
            media_items: vec![image("a"), image("b")],
            parameters,
            error: None,
        };

        let response = service.complete_search("user-1", outcome);
        match response {
            QueueResponse::Queue { photos, parameters } => {
                assert_eq!(photos.len(), 2);
                let parameters = parameters.unwrap();
                assert!(parameters.page_size.is_none());
                assert!(parameters.filters.is_some());
            }
            other => panic!("expected queue, got {other:?}"),
        }

        // A follow-up queue read is served from cache, paired with the
        // stored parameters, with no upstream call.
        match service.get_queue("user-1", "token").await {
            QueueResponse::Queue { photos, parameters } => {
                assert_eq!(photos.len(), 2);
                assert!(parameters.unwrap().filters.is_some());
            }
            other => panic!("expected cached queue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_search_leaves_cache_and_store_alone() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        // Seed state from an earlier successful search.
        let seeded = SearchOutcome {
            media_items: vec![image("old")],
            parameters: SearchParameters::for_album("album-1"),
            error: None,
        };
        service.complete_search("user-1", seeded);

        // Second page blew up with a 401; one page had accumulated.
        let failed = SearchOutcome {
            media_items: vec![image("page-one")],
            parameters: landscape_params(),
            error: Some(ApiError {
                code: 401,
                name: "UNAUTHENTICATED".to_string(),
                message: "expired token".to_string(),
            }),
        };

        match service.complete_search("user-1", failed) {
            QueueResponse::Failed { error, partial } => {
                assert_eq!(error.code, 401);
                assert_eq!(partial.len(), 1);
            }
            other => panic!("expected failure, got {other:?}"),
        }

        // Cache still holds the earlier result and the stored query still
        // points at the album.
        assert_eq!(service.photo_cache.get("user-1").unwrap().len(), 1);
        let stored = service.stored_query("user-1").unwrap();
        assert_eq!(stored.album_id.as_deref(), Some("album-1"));
    }

    #[tokio::test]
    async fn test_cache_hit_without_stored_query_still_serves() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        service.photo_cache.set("user-1", vec![image("a")]);

        match service.get_queue("user-1", "token").await {
            QueueResponse::Queue { photos, parameters } => {
                assert_eq!(photos.len(), 1);
                assert!(parameters.is_none());
            }
            other => panic!("expected queue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_albums_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        let album = Album {
            id: "album-1".to_string(),
            title: Some("Hikes".to_string()),
            product_url: None,
            cover_photo_base_url: None,
            media_items_count: Some("12".to_string()),
        };
        service.album_cache.set("user-1", vec![album]);

        match service.get_albums("user-1", "token").await {
            AlbumsResponse::Albums(albums) => {
                assert_eq!(albums.len(), 1);
                assert_eq!(albums[0].title.as_deref(), Some("Hikes"));
            }
            other => panic!("expected albums, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expired_photo_cache_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        service.photo_cache.set("user-1", vec![image("a")]);
        service
            .photo_cache
            .backdate("user-1", chrono::TimeDelta::hours(2));

        assert!(service.photo_cache.get("user-1").is_none());
    }

    #[tokio::test]
    async fn test_lapsed_cache_replays_stored_query() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        service
            .query_store
            .set("user-1", &SearchParameters::for_album("abc"))
            .unwrap();

        // No cache entry, but a stored query: get_queue must replay it rather
        // than report an empty queue. The replay hits the unroutable upstream,
        // so it comes back as a transport failure instead of photos.
        match service.get_queue("user-1", "token").await {
            QueueResponse::Failed { error, .. } => {
                assert_eq!(error.code, 500);
                assert_eq!(error.name, "TransportError");
            }
            other => panic!("expected replay attempt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream_surfaces_transport_error() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        match service
            .run_filter_search("user-1", "token", Filters::default())
            .await
        {
            QueueResponse::Failed { error, partial } => {
                assert_eq!(error.code, 500);
                assert_eq!(error.name, "TransportError");
                assert!(partial.is_empty());
            }
            other => panic!("expected transport failure, got {other:?}"),
        }

        // Nothing was cached or persisted for the failed search.
        assert!(service.photo_cache.get("user-1").is_none());
        assert!(service.stored_query("user-1").is_none());
    }

    #[tokio::test]
    async fn test_failed_album_listing_drops_stale_cache() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        let album = Album {
            id: "album-1".to_string(),
            title: None,
            product_url: None,
            cover_photo_base_url: None,
            media_items_count: None,
        };
        service.album_cache.set("user-1", vec![album]);
        service
            .album_cache
            .backdate("user-1", chrono::TimeDelta::hours(1));

        // Expired cache forces a fetch, which fails against the unroutable
        // upstream; the stale slot must be gone afterwards.
        match service.get_albums("user-1", "token").await {
            AlbumsResponse::Failed(error) => assert_eq!(error.code, 500),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(service.album_cache.get("user-1").is_none());
    }
}
