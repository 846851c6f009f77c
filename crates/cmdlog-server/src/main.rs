use std::time::Duration;

use anyhow::{Context as _, Result};
use cmdlog_core::store::Store;
use cmdlog_server::feed::FeedConfig;
use cmdlog_server::state::AppState;
use cmdlog_server::{config, db, routes};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmdlog_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::Config::from_env();
    let database_url = cfg
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;
    let pool = db::create_pool(&database_url).await?;
    if cfg.run_migrations {
        cmdlog_core::store::run_migrations(&pool).await?;
    }

    let state = AppState {
        store: Store::new(pool),
        feed: FeedConfig {
            poll_interval: Duration::from_secs(cfg.feed_poll_secs),
            window: cfg.feed_window,
        },
    };
    let app = routes::create_router(state).layer(
        // Header capture stays disabled so credentials never reach the logs.
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().include_headers(false)),
    );
    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl_c: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::warn!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
