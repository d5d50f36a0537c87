use mw_http_server::{AppState, MiddlewareConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = MiddlewareConfig::load()?;
    log::info!("loaded configuration: {} NiFi server(s), bind_address={}", config.nifi_servers.len(), config.bind_address);

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config);

    let router = mw_http_server::build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("mw-http-server listening on {bind_address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutdown signal received");
}
