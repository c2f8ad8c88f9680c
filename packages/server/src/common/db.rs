//! Connection pool setup shared by the server and the tests.
//!
//! Every pooled connection carries a `lock_timeout` and a `statement_timeout`,
//! so a transaction stuck on a locked dispute row fails with a database error
//! instead of waiting forever. The error reaches callers as
//! `DisputeError::Database` and the request can be retried.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::Executor;

/// Postgres SQLSTATE for `lock_timeout` expiry (`lock_not_available`).
pub const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Upper bounds on how long a request may wait on the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbTimeouts {
    /// Waiting for a free pooled connection.
    pub acquire: Duration,
    /// Waiting for a row lock such as `SELECT ... FOR UPDATE`.
    pub lock: Duration,
    /// Any single statement.
    pub statement: Duration,
}

impl Default for DbTimeouts {
    fn default() -> Self {
        Self {
            acquire: Duration::from_secs(5),
            lock: Duration::from_secs(5),
            statement: Duration::from_secs(30),
        }
    }
}

/// Pool options with the timeouts applied to every new connection.
pub fn pool_options(max_connections: u32, timeouts: DbTimeouts) -> PgPoolOptions {
    let lock_ms = millis(timeouts.lock);
    let statement_ms = millis(timeouts.statement);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(timeouts.acquire)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                let settings = session_settings(lock_ms, statement_ms);
                conn.execute(settings.as_str()).await?;
                Ok(())
            })
        })
}

/// True when `err` is Postgres giving up on a lock wait.
pub fn is_lock_timeout(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == LOCK_NOT_AVAILABLE)
}

fn session_settings(lock_ms: u64, statement_ms: u64) -> String {
    // Integer values are milliseconds; zero would disable the timeout.
    format!(
        "SET lock_timeout = {}; SET statement_timeout = {};",
        lock_ms.max(1),
        statement_ms.max(1)
    )
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
