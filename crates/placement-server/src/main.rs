use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use placement_api::AppStateInner;
use placement_store::{MemoryStore, RemoteStore, RestStore, StoreConfig, SyncStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "placement_hub=debug,placement_store=debug,placement_api=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    // Config
    let demo = std::env::var("PLACEMENT_DEMO").is_ok_and(|v| v == "1");
    let host = std::env::var("PLACEMENT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PLACEMENT_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let remote: Arc<dyn RemoteStore> = if demo {
        warn!("PLACEMENT_DEMO=1: using the in-memory store, nothing is persisted");
        Arc::new(MemoryStore::new())
    } else {
        match StoreConfig::from_env() {
            Ok(config) => {
                info!("Using remote store at {}", config.url);
                Arc::new(RestStore::new(config))
            }
            Err(e) => {
                eprintln!("FATAL: {}", e);
                eprintln!("       Set SUPABASE_URL and SUPABASE_ANON_KEY in your .env file,");
                eprintln!("       or PLACEMENT_DEMO=1 to run against an in-memory store.");
                std::process::exit(1);
            }
        }
    };

    // Shared state; the first load runs in the background
    let state = AppStateInner::new(SyncStore::new(remote));
    let loader = state.clone();
    tokio::spawn(async move {
        let report = loader.store.refresh_all().await;
        if report.is_clean() {
            info!("Initial load complete");
        } else {
            warn!("Initial load finished with {} failed collections", report.failed.len());
        }
    });

    let app = placement_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Placement hub listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
