// Tracker Core - Manga/Anime Library Storage
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database connection and management
//!
//! This module handles database connection pooling, initialization, and maintenance.
//!
//! # Database Location
//! Defaults to `<data dir>/tracker-core/library.db` (see [`Config`]); mobile
//! hosts pass their app-specific path instead.
//!
//! # SQLite Configuration
//! - WAL mode for better concurrency
//! - Foreign keys enabled
//! - Incremental auto-vacuum for space efficiency
//! - Normal synchronous mode (balance safety/speed)

use crate::config::Config;
use crate::error::{Result, TrackerError};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous},
    ConnectOptions,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Database manager - handles connection pooling and operations
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>, // None for in-memory databases
}

impl Database {
    /// Open (or create) the database file and run migrations
    ///
    /// # Errors
    /// Returns error if:
    /// - Parent directory doesn't exist and can't be created
    /// - Database file can't be opened
    /// - Migrations fail
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        Self::open(database_path.as_ref(), DEFAULT_MAX_CONNECTIONS, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open the database described by a [`Config`]
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::open(
            &config.database_path,
            config.max_connections,
            Duration::from_secs(config.busy_timeout_secs),
        )
        .await
    }

    async fn open(path: &Path, max_connections: u32, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TrackerError::FileIoError(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(busy_timeout)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(busy_timeout)
            .connect_with(connect_opts)
            .await?;

        Self::configure_database(&pool).await?;

        let db = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        db.migrate().await?;

        info!(path = %path.display(), max_connections, "opened library database");
        Ok(db)
    }

    /// Create in-memory database for testing
    ///
    /// # Errors
    /// Returns error if database creation or migration fails
    pub async fn new_in_memory() -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .disable_statement_logging();

        // Every connection would get its own memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;

        Self::configure_database(&pool).await?;

        let db = Self { pool, path: None };
        db.migrate().await?;

        debug!("opened in-memory library database");
        Ok(db)
    }

    /// Pragmas not covered by the connect options
    async fn configure_database(pool: &SqlitePool) -> Result<()> {
        sqlx::query("PRAGMA auto_vacuum = INCREMENTAL")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Run database migrations
    ///
    /// Migrations are run automatically when creating a new database connection.
    pub async fn migrate(&self) -> Result<()> {
        crate::storage::migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| TrackerError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get database file path
    ///
    /// Returns `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close database and release all connections
    pub async fn close(self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }

    /// Vacuum database to reclaim unused space
    pub async fn vacuum(&self) -> Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    /// Get database statistics
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await?;

        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await?;

        let freelist_count: i64 = sqlx::query_scalar("PRAGMA freelist_count")
            .fetch_one(&self.pool)
            .await?;

        Ok(DatabaseStats {
            page_count: page_count as u64,
            page_size: page_size as u64,
            freelist_count: freelist_count as u64,
            total_size: (page_count * page_size) as u64,
            unused_size: (freelist_count * page_size) as u64,
        })
    }

    /// Checkpoint WAL file to main database
    pub async fn checkpoint(&self) -> Result<()> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check database integrity
    ///
    /// Runs SQLite integrity check and returns true if database is okay.
    pub async fn check_integrity(&self) -> Result<bool> {
        let result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&self.pool)
            .await?;

        Ok(result == "ok")
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    /// Total number of pages in database
    pub page_count: u64,
    /// Size of each page in bytes
    pub page_size: u64,
    /// Number of free pages (unused space)
    pub freelist_count: u64,
    /// Total size of database (page_count * page_size)
    pub total_size: u64,
    /// Unused space (freelist_count * page_size)
    pub unused_size: u64,
}

impl DatabaseStats {
    /// Get percentage of unused space
    pub fn unused_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.unused_size as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Check if vacuum is recommended (>20% unused space)
    pub fn should_vacuum(&self) -> bool {
        self.unused_percentage() > 20.0
    }
}
