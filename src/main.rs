use std::sync::Arc;
use tessprep::configs::ConvertConfig;
use tessprep::service::{router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match ConvertConfig::load_default() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("[Service] {}", err);
            std::process::exit(2);
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = router(Arc::new(AppState::new(config)));

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("[Service] Failed to bind to {}: {}", bind_addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("[Service] Listening on {}", bind_addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("[Service] Server failed: {}", err);
        std::process::exit(1);
    }
}
