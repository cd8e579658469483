// Service entry point: logging, config, service construction, serve.

use std::sync::Arc;

use tracing::info;

use photoframe::{Config, FrameService, web};

#[tokio::main]
async fn main() -> photoframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "photoframe=info".into()))
        .with_target(false)
        .init();

    let config = Config::from_env();
    info!(
        upstream = %config.api_base_url,
        photos_to_load = config.photos_to_load,
        "starting photoframe"
    );

    let bind_addr = config.bind_addr.clone();
    let service = Arc::new(FrameService::new(config)?);
    web::serve(service, &bind_addr).await
}
