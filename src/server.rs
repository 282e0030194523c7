//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, and the Axum server lifecycle.

use crate::api::cookies::CookiePolicy;
use crate::config::{Config, StorageBackend};
use crate::infrastructure::persistence::{
    InMemoryStore, PgUrlRepository, PgUserRepository, PgVisitRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, Repositories, StateSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the connection pool and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// PostgreSQL-backed repositories sharing one pool.
pub fn pg_repositories(pool: &PgPool) -> Repositories {
    let pool = Arc::new(pool.clone());

    Repositories {
        urls: Arc::new(PgUrlRepository::new(pool.clone())),
        visits: Arc::new(PgVisitRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
    }
}

/// Repositories backed by one shared [`InMemoryStore`].
pub fn memory_repositories() -> Repositories {
    let store = Arc::new(InMemoryStore::new());

    Repositories {
        urls: store.clone(),
        visits: store.clone(),
        users: store,
    }
}

fn state_settings(config: &Config) -> StateSettings {
    StateSettings {
        base_url: config.base_url.clone(),
        session_secret: config.session_secret.clone(),
        identity_bridge_secret: config.identity_bridge_secret.clone(),
        cookies: CookiePolicy {
            guest_link_limit: config.guest_link_limit,
            guest_ttl_days: config.guest_cookie_ttl_days,
            secure: config.cookie_secure,
        },
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Application services
/// - Axum HTTP server with graceful shutdown
///
/// The pool is closed after the server has drained.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (repositories, pool) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_database(&config).await?;
            (pg_repositories(&pool), Some(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            (memory_repositories(), None)
        }
    };

    let state = AppState::new(repositories, state_settings(&config));

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
