//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, queue selection, service wiring, background
//! jobs, and the Axum server lifecycle.

use crate::application::services::{AccountService, KeyProvisioner, LinkService, SessionService};
use crate::config::Config;
use crate::infrastructure::mail::LogMailer;
use crate::infrastructure::persistence::{
    PgLinkRepository, PgSecretRepository, PgTokenRepository, PgUserRepository,
};
use crate::infrastructure::queue::{ChannelQueue, NotificationQueue, RedisQueue};
use crate::routes::app_router;
use crate::state::AppState;
use crate::workers::{run_link_expiry_job, run_mail_worker, run_token_cleanup_job};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How long the mail worker waits on an empty queue before polling again.
const MAIL_IDLE_WAIT: Duration = Duration::from_secs(1);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Notification queue (Redis, or in-process fallback)
/// - Mail worker, link expiry job, token cleanup job
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
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
        .context("Failed to apply migrations")?;

    let queue = connect_queue(&config).await;

    let pool = Arc::new(pool);
    let tables = &config.tables;
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone(), &tables.links));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone(), &tables.users));
    let token_repository = Arc::new(PgTokenRepository::new(pool.clone(), &tables.tokens));
    let secret_repository = Arc::new(PgSecretRepository::new(pool.clone(), &tables.secrets));

    let key_provisioner = Arc::new(KeyProvisioner::new(secret_repository, config.key_bits));
    let session_service = Arc::new(SessionService::new(
        token_repository,
        user_repository.clone(),
        key_provisioner,
    ));
    let account_service = Arc::new(AccountService::new(
        user_repository,
        session_service.clone(),
        config.bcrypt_cost,
    ));
    let link_service = Arc::new(LinkService::new(
        link_repository,
        queue.clone(),
        config.base_url.clone(),
    ));

    let jobs = [
        tokio::spawn(run_mail_worker(
            queue.clone(),
            Arc::new(LogMailer::new(config.mail_from.clone())),
            MAIL_IDLE_WAIT,
        )),
        tokio::spawn(run_link_expiry_job(
            link_service.clone(),
            Duration::from_secs(config.link_sweep_interval_secs),
        )),
        tokio::spawn(run_token_cleanup_job(
            session_service.clone(),
            Duration::from_secs(config.token_sweep_interval_secs),
        )),
    ];
    tracing::info!("Mail worker and scheduled jobs started");

    let state = AppState::new(link_service, session_service, account_service, queue);
    let app = app_router(state, config.rate_limits)?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    for job in jobs {
        job.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Picks the Redis queue when configured and reachable, otherwise the
/// in-process channel.
async fn connect_queue(config: &Config) -> Arc<dyn NotificationQueue> {
    if let Some(redis_url) = &config.redis_url {
        match RedisQueue::connect(redis_url, &config.notification_queue).await {
            Ok(queue) => {
                tracing::info!(key = %config.notification_queue, "Notification queue: Redis");
                return Arc::new(queue);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process queue.", e);
            }
        }
    }

    tracing::warn!(
        capacity = config.notify_queue_capacity,
        "Notification queue is in-process; pending emails are lost on restart"
    );
    Arc::new(ChannelQueue::new(config.notify_queue_capacity))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
