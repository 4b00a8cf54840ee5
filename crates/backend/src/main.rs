pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use axum::{
        routing::{get, post, put},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Log to stdout and to an append-only file
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Quiet SQL noise, keep application logs
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()?;

    shared::data::db::initialize_database(Some(&config.database.path))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Seed the team, month targets and sample reports on first run
    system::initialization::ensure_seed_data().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_member).layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // BUSINESS ROUTES
        // ========================================
        // Members (create is leader-only, checked in the handler)
        .route(
            "/api/member",
            get(handlers::a001_member::list_all)
                .post(handlers::a001_member::create)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/member/:id/pin",
            put(handlers::a001_member::change_pin).layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // Reports (delete is leader-only, checked in the handler)
        .route(
            "/api/report",
            get(handlers::a002_report::list)
                .post(handlers::a002_report::create)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/report/:id",
            get(handlers::a002_report::get_by_id)
                .put(handlers::a002_report::update)
                .delete(handlers::a002_report::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // Month targets (upsert is leader-only, checked in the handler)
        .route(
            "/api/team_target",
            get(handlers::a003_team_target::list_all)
                .post(handlers::a003_team_target::upsert)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/team_target/:month",
            get(handlers::a003_team_target::get_by_month).layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // Target allocation
        .route(
            "/api/target_allocation",
            post(handlers::a004_target_allocation::save).layer(middleware::from_fn(system::auth::middleware::require_leader)),
        )
        .route(
            "/api/target_allocation/:month",
            get(handlers::a004_target_allocation::get_by_month).layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // D100 KPI Summary Dashboard
        .route(
            "/api/d100/kpi_summary",
            get(handlers::d100_kpi_summary::get_kpi_summary).layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
