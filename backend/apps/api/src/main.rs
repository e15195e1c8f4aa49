//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod greeting;
mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::{AuthMiddlewareState, PgUserRepository, RedisTokenDenylist, auth_router, users_router};
use axum::{
    Router, http,
    http::{HeaderName, HeaderValue, Method, header},
};
use kata::{PgKataRepository, katas_router, user_katas_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::greeting::{greeting_router, root_redirect};
use crate::settings::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,kata=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations completed");

    // Token denylist
    let denylist = RedisTokenDenylist::connect(&settings.redis_url)
        .await
        .context("Failed to connect to Redis")?;

    tracing::info!("Connected to Redis");

    // Object storage
    let storage = settings.storage.open()?;
    tracing::info!(backend = ?settings.storage, "Object storage ready");

    let auth_config = settings.auth_config()?;
    let kata_config = settings.kata_config();

    let users = PgUserRepository::new(pool.clone());
    let katas = PgKataRepository::new(pool.clone());
    let guard = AuthMiddlewareState::new(Arc::new(denylist.clone()), Arc::new(auth_config.clone()));

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(auth::presentation::middleware::ACCESS_TOKEN_HEADER),
        ]))
        .allow_credentials(true);

    // Build router
    let api = Router::new()
        .nest(
            "/auth",
            auth_router(users.clone(), denylist.clone(), auth_config.clone()),
        )
        .nest(
            "/users",
            users_router(users.clone(), denylist.clone(), auth_config).merge(user_katas_router(
                katas.clone(),
                users.clone(),
                storage.clone(),
                kata_config.clone(),
                guard.clone(),
            )),
        )
        .nest(
            "/katas",
            katas_router(katas, users, storage, kata_config, guard),
        )
        .merge(greeting_router());

    let app = root_redirect()
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = settings.addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
