//! SQLite access for SHELF.
//!
//! The store is owned by another system; everything here opens it read-only.
//! Connections are short-lived: callers open one per unit of work and drop it
//! when done.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::{InitCtx, Module};

pub use rusqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures talking to the SQLite store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file could not be opened or is not a usable SQLite store.
    #[error("store unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed after the connection was established.
    #[error("query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),
}

/// Open the configured store in read-only mode.
///
/// A missing file is reported as [`StoreError::Unavailable`]; SQLite is never
/// allowed to create it. The header is read once so that a file which is not a
/// database is rejected here rather than by the first query.
pub fn open_read_only(settings: &DatabaseSettings) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let path = settings.path.as_path();

    let unavailable = |source: rusqlite::Error| {
        tracing::error!(
            target: "shelf-db",
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            error = %source,
            "store open failed"
        );
        StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    };

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(unavailable)?;

    conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
        .map_err(unavailable)?;
    conn.query_row("PRAGMA schema_version;", [], |row| row.get::<_, i64>(0))
        .map_err(unavailable)?;

    tracing::debug!(
        target: "shelf-db",
        path = %path.display(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "store opened read-only"
    );
    Ok(conn)
}

/// Core module that reports store reachability at startup.
///
/// An unreachable store is logged but does not abort startup: every request
/// opens its own connection and reports failures on its own.
pub struct DbModule;

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let settings = ctx.settings.database.clone();
        let probe = tokio::task::spawn_blocking(move || open_read_only(&settings).map(drop)).await?;

        match probe {
            Ok(()) => tracing::info!(
                target: "shelf-db",
                path = %ctx.settings.database.path.display(),
                "store reachable"
            ),
            Err(err) => tracing::warn!(
                target: "shelf-db",
                error = %err,
                "store not reachable yet; requests will fail until it is"
            ),
        }

        Ok(())
    }
}
