use std::future::Future;
use std::time::Duration;

use migration::{is_up_to_date, migrate, MigrationCommand};
use rand::Rng;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{make_conn_spec, DbKind, DbOwner, RuntimeEnv};
use crate::error::DbInfraError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Retry `connect_fn` with a fixed interval plus a little jitter.
pub async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt < max_attempts {
                    warn!(
                        attempt,
                        max_attempts,
                        interval_ms,
                        error = %e,
                        "connection_retry=failed"
                    );
                    let jitter_ms = rand::rng().random_range(0..50);
                    tokio::time::sleep(Duration::from_millis(interval_ms + jitter_ms)).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::Connect {
        message: format!("no connection after {max_attempts} attempts"),
    }))
}

fn connect_options(url: &str, kind: DbKind, owner: DbOwner) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    match kind {
        // every new connection to :memory: is a separate database
        DbKind::SqliteMemory => {
            opt.min_connections(1).max_connections(1);
        }
        DbKind::Postgres => {
            let max = if owner == DbOwner::Owner { 1 } else { 10 };
            opt.min_connections(1).max_connections(max);
        }
    }
    opt.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    opt
}

/// Open a pool for `owner`; Postgres connects are retried.
pub async fn connect_db(
    env: RuntimeEnv,
    kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, kind, owner)?;
    let opt = connect_options(&url, kind, owner);
    let target = sanitize_db_url(&url);

    let connect = || {
        let opt = opt.clone();
        let target = target.clone();
        async move {
            Database::connect(opt)
                .await
                .map_err(|e| DbInfraError::Connect {
                    message: format!("failed to connect to {target}: {e}"),
                })
        }
    };

    match kind {
        DbKind::Postgres => retry_connection(connect, CONNECT_ATTEMPTS, CONNECT_INTERVAL_MS).await,
        DbKind::SqliteMemory => connect().await,
    }
}

/// Single-connection pool with schema-owner credentials.
pub async fn build_admin_pool(
    env: RuntimeEnv,
    kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    connect_db(env, kind, DbOwner::Owner).await
}

/// Mask the password part of a connection URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let Some((scheme, credentials)) = auth_part.split_once("://") else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host_part}"),
        None => url.to_string(),
    }
}

/// Open the application pool and bring the schema up to date.
///
/// In-memory SQLite has no separate owner role, so the same pool is migrated.
pub async fn bootstrap_db(
    env: RuntimeEnv,
    kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    match kind {
        DbKind::SqliteMemory => {
            let conn = connect_db(env, kind, DbOwner::App).await?;
            migrate_if_needed(&conn).await?;
            Ok(conn)
        }
        DbKind::Postgres => {
            let admin = build_admin_pool(env, kind).await?;
            migrate_if_needed(&admin).await?;
            let _ = admin.close().await;
            connect_db(env, kind, DbOwner::App).await
        }
    }
}

async fn migrate_if_needed(conn: &DatabaseConnection) -> Result<(), DbInfraError> {
    let up_to_date = is_up_to_date(conn)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("failed to read applied migrations: {e}"),
        })?;

    if up_to_date {
        info!("migrate=skipped up_to_date=true");
        return Ok(());
    }

    run_migration(conn, MigrationCommand::Up).await
}

async fn run_migration(
    conn: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    migrate(conn, command)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("{command:?} failed: {e}"),
        })
}

/// Connect as schema owner and run `command`. Entry point of the migration CLI.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(env = ?env, db_kind = ?kind, cmd = ?command, "migrate=start");

    let pool = build_admin_pool(env, kind).await?;
    let result = run_migration(&pool, command).await;
    let _ = pool.close().await;

    info!(ok = result.is_ok(), "migrate=done");
    result
}
