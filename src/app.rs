//! Process wiring: configuration, database pool, and the HTTP server.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use figment::{Figment, providers::Env};
use sqlx::ConnectOptions;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;
use crate::web::create_router;

/// Owns the process's database pool and configuration. One `App` exists per
/// process; it outlives any individual request.
pub struct App {
    config: Config,
    db_pool: sqlx::PgPool,
}

impl App {
    /// Loads configuration, opens the catalog database pool, and runs
    /// pending migrations. Fails fast: an unreachable database or bad
    /// config at startup is fatal, matching `CatalogUnavailable`'s
    /// request-fatal severity extended to the whole process.
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config: Config = Figment::new().merge(Env::raw()).extract().context("failed to load config")?;

        let connect_options = sqlx::postgres::PgConnectOptions::from_str(&config.database_url)
            .context("failed to parse database URL")?
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(4))
            .idle_timeout(Duration::from_secs(60 * 2))
            .max_lifetime(Duration::from_secs(60 * 30))
            .connect_with(connect_options)
            .await
            .context("failed to create database pool")?;

        info!(max_connections = 4, acquire_timeout = "4s", "database pool established");

        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&db_pool).await.context("failed to run database migrations")?;
        info!("database migrations completed");

        Ok(App { config, db_pool })
    }

    fn app_state(&self) -> AppState {
        AppState::new(self.db_pool.clone(), self.config.solver_result_cap, self.config.solver_deadline)
    }

    /// Exposes the catalog pool and solver limits for the one-shot `solve`
    /// CLI path, which never stands up an HTTP server.
    pub fn state(&self) -> AppState {
        self.app_state()
    }

    /// Binds the configured port and serves the HTTP API until a shutdown
    /// signal arrives, draining in-flight requests for up to
    /// `config.shutdown_timeout`.
    pub async fn run(self) -> ExitCode {
        let state = self.app_state();
        let shutdown = state.shutdown.clone();
        let router = create_router(state);

        let listener = match tokio::net::TcpListener::bind(("0.0.0.0", self.config.port)).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, port = self.config.port, "failed to bind listener");
                return ExitCode::FAILURE;
            }
        };
        info!(port = self.config.port, "listening");

        let make_service: IntoMakeServiceWithConnectInfo<_, std::net::SocketAddr> = router.into_make_service_with_connect_info();
        let shutdown_timeout = self.config.shutdown_timeout;

        let serve = axum::serve(listener, make_service).with_graceful_shutdown(shutdown_signal(shutdown.clone()));

        if let Err(e) = serve.await {
            tracing::error!(error = %e, "server exited with error");
            return ExitCode::FAILURE;
        }

        // Give any solver tasks still draining a bounded grace period beyond
        // the cancellation signal before the process actually exits.
        tokio::time::sleep(shutdown_timeout.min(Duration::from_secs(1))).await;
        ExitCode::SUCCESS
    }
}

/// Resolves on SIGINT or SIGTERM and cancels the shared cancellation token so
/// in-flight solves stop enumerating rather than running to their deadline.
async fn shutdown_signal(cancel: tokio_util::sync::CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining in-flight requests");
    cancel.cancel();
}
