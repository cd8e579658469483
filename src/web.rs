// HTTP surface for the service.
// Thin glue: extracts identity headers, delegates to the orchestrator, and
// shapes JSON responses. The OAuth flow itself lives in front of this layer.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, FrameError, Result};
use crate::photos::Filters;
use crate::queue::{AlbumsResponse, FrameService, QueueResponse};

/// Who is asking, as established by the authentication layer in front of us:
/// an opaque user id plus the bearer token for the upstream API.
struct Identity {
    user_id: String,
    token: String,
}

/// Pull the identity out of the request headers, if both parts are present.
fn identity(headers: &HeaderMap) -> Option<Identity> {
    let user_id = headers.get("x-user-id")?.to_str().ok()?.to_string();
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .to_string();

    if user_id.is_empty() || token.is_empty() {
        return None;
    }
    Some(Identity { user_id, token })
}

fn unauthorized() -> Response {
    let error = ApiError {
        code: 401,
        name: "Unauthorized".to_string(),
        message: "Missing x-user-id or bearer token".to_string(),
    };
    error_response(error)
}

fn error_response(error: ApiError) -> Response {
    let status =
        StatusCode::from_u16(error.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": error }))).into_response()
}

fn queue_response(response: QueueResponse) -> Response {
    match response {
        QueueResponse::Queue { photos, parameters } => {
            let mut body = json!({ "photos": photos });
            if let Some(parameters) = parameters {
                body["parameters"] = json!(parameters);
            }
            Json(body).into_response()
        }
        QueueResponse::Empty => Json(json!({})).into_response(),
        QueueResponse::Failed { error, .. } => error_response(error),
    }
}

async fn load_from_search(
    State(service): State<Arc<FrameService>>,
    headers: HeaderMap,
    Json(filters): Json<Filters>,
) -> Response {
    let Some(identity) = identity(&headers) else {
        return unauthorized();
    };

    let response = service
        .run_filter_search(&identity.user_id, &identity.token, filters)
        .await;
    queue_response(response)
}

async fn load_from_album(
    State(service): State<Arc<FrameService>>,
    headers: HeaderMap,
    Path(album_id): Path<String>,
) -> Response {
    let Some(identity) = identity(&headers) else {
        return unauthorized();
    };

    let response = service
        .run_album_search(&identity.user_id, &identity.token, &album_id)
        .await;
    queue_response(response)
}

async fn get_queue(State(service): State<Arc<FrameService>>, headers: HeaderMap) -> Response {
    let Some(identity) = identity(&headers) else {
        return unauthorized();
    };

    let response = service.get_queue(&identity.user_id, &identity.token).await;
    queue_response(response)
}

async fn get_albums(State(service): State<Arc<FrameService>>, headers: HeaderMap) -> Response {
    let Some(identity) = identity(&headers) else {
        return unauthorized();
    };

    match service.get_albums(&identity.user_id, &identity.token).await {
        AlbumsResponse::Albums(albums) => Json(json!({ "albums": albums })).into_response(),
        AlbumsResponse::Failed(error) => error_response(error),
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Build the application router.
pub fn build_router(service: Arc<FrameService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/loadFromSearch", post(load_from_search))
        .route("/loadFromAlbum/{album_id}", post(load_from_album))
        .route("/getQueue", get(get_queue))
        .route("/getAlbums", get(get_albums))
        .with_state(service)
}

/// Bind and serve until the process is stopped.
pub async fn serve(service: Arc<FrameService>, bind_addr: &str) -> Result<()> {
    let app = build_router(service);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!("listening on {}", bind_addr);
    axum::serve(listener, app).await.map_err(FrameError::Io)?;

    Ok(())
}
