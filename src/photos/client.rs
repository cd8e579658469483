// Photo-library API HTTP client.
// Handles bearer authentication and request/response processing for the two
// paged endpoints the service consumes.

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FetchFailure, FrameError, Result};

use super::types::{AlbumsPage, SearchPage, SearchParameters};

pub const DEFAULT_API_BASE: &str = "https://photoslibrary.googleapis.com";

const SEARCH_PATH: &str = "/v1/mediaItems:search";
const ALBUMS_PATH: &str = "/v1/albums";

/// Client for the upstream photo-library REST API.
///
/// Tokens are per-user and passed on every call rather than baked into the
/// client, since one client instance serves all users.
pub struct PhotosClient {
    client: Client,
    base_url: String,
}

impl PhotosClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("photoframe"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FrameError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch one page of a media-item search (POST, JSON body = parameters).
    pub async fn search_page(
        &self,
        token: &str,
        params: &SearchParameters,
    ) -> std::result::Result<SearchPage, FetchFailure> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(params)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;

        Self::decode(response).await
    }

    /// Fetch one page of the album listing (GET, query-string pagination).
    pub async fn albums_page(
        &self,
        token: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> std::result::Result<AlbumsPage, FetchFailure> {
        let url = format!("{}{}", self.base_url, ALBUMS_PATH);
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = request.send().await.map_err(FetchFailure::Transport)?;
        Self::decode(response).await
    }

    /// Check the status and deserialize the body, or extract the upstream
    /// error payload.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> std::result::Result<T, FetchFailure> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(FetchFailure::Transport)
        } else {
            let body = response.json::<serde_json::Value>().await.ok();
            Err(FetchFailure::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}
