use axum::{
    routing::{get, patch},
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use talentflow::{
    config::{get_config, init_config},
    database::{pool::create_pool, seed::seed_demo_data},
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("talentflow=info,tower_http=info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;

    // Opening the store applies every schema version in order; a failed
    // upgrade leaves the store unopened and is fatal here.
    sqlx::migrate!("./migrations").run(&pool).await?;

    if config.seed_demo_data {
        seed_demo_data(&pool).await?;
    }

    let app_state = AppState::new(pool);

    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                match state.notification_service.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Outbox worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/jobs", get(routes::jobs::list_jobs))
        .route("/candidates", get(routes::candidates::list_candidates))
        .route("/candidates/:id", patch(routes::candidates::update_candidate))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
