use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use voca_api::{ApiConfig, ApiState, metrics, middleware as api_middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    voca_api::tracing::init_tracing(&config.env);

    let pool = voca_db::create_pool(&config.database_url, config.db_max_connections).await?;
    voca_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    tracing::info!("database ready");

    let cors = api_middleware::cors::create_cors_layer(config.allowed_origins());
    let environment = config.env;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_enabled = config.metrics_enabled;

    let state = ApiState::new(config, pool).await?;

    // Start background jobs for periodic maintenance
    let job_handles = voca_api::jobs::start_background_jobs(state.pool.clone());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut app = voca_api::router::router();

    if metrics_enabled {
        let metrics_handle = metrics::init_metrics()?;
        let metrics_app = Router::new()
            .route("/metrics", get(metrics::metrics_handler))
            .with_state(metrics_handle);
        app = app.merge(metrics_app);
        tracing::info!("Prometheus metrics exposed at /metrics");
    }

    let app = app
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(middleware::from_fn(
            api_middleware::request_id::request_id_middleware,
        ));

    let app = api_middleware::security_headers::apply_security_headers(app, environment);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %environment, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    for handle in job_handles {
        handle.abort();
    }
    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
