use crate::frameworks::{config, db};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;
use std::net::SocketAddr;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    init_tracing();
    // Load .env before any configuration is read.
    dotenvy::dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL is not set");
            return;
        }
    };

    let pool = match db::connect_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to postgres");
            return;
        }
    };
    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        return;
    }

    let state = AppState {
        db: pool,
        max_overnight_nights: config::max_overnight_nights(),
        upload_dir: config::upload_dir(),
    };
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return;
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
