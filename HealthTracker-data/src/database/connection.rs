//! Database connection module for the HealthTracker application
//!
//! Provides the SQLite connection pool and the per-request [`Session`] guard.
//! A pool is an ordinary value: build one at startup (or per test) and pass it
//! to whatever needs storage access.

use std::env;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::migrations::run_sqlite_migrations;

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    GenericError(String),
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file; `None` selects a private in-memory database
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a free connection before failing
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some("./data/health_records.db".to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    ///
    /// Reads `DB_SQLITE_PATH`, `DB_MAX_CONNECTIONS` and `DB_TIMEOUT_SECONDS`;
    /// anything missing or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sqlite_path = lookup("DB_SQLITE_PATH").or(defaults.sqlite_path);
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections);
        let timeout_seconds = parse_or(&lookup, "DB_TIMEOUT_SECONDS", defaults.timeout_seconds);

        info!(
            "Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds
        );

        Self {
            sqlite_path,
            max_connections,
            timeout_seconds,
        }
    }
}

/// Parse `key` from `lookup`, warning and falling back to `default` on bad input
pub fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value for {}: {:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

/// Shared handle to the SQLite connection pool.
///
/// Cloning is cheap; every clone refers to the same pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
    location: Arc<str>,
}

impl DatabasePool {
    /// Build a pool from configuration and bring the schema up to date
    pub fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.sqlite_path.as_deref() {
            Some(path) => Self::open_file(path, config),
            None => Self::in_memory(),
        }
    }

    /// Build a pool over a private in-memory database.
    ///
    /// Every `SqliteConnectionManager::memory()` connection is its own database,
    /// so the pool holds exactly one connection that is never recycled.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        debug!("Initializing in-memory SQLite database");

        let pool = r2d2::Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_timeout(Duration::from_secs(30))
            .build(SqliteConnectionManager::memory())?;

        let db = Self {
            pool: Arc::new(pool),
            location: Arc::from(":memory:"),
        };
        db.migrate()?;
        Ok(db)
    }

    fn open_file(sqlite_path: &str, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing SQLite database at: {}", sqlite_path);

        if let Some(parent) = Path::new(sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::GenericError(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let busy_timeout = Duration::from_secs(config.timeout_seconds);
        let manager = SqliteConnectionManager::file(sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(move |conn| conn.busy_timeout(busy_timeout));

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections.max(1))
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)?;

        info!("SQLite connection pool created successfully");

        let db = Self {
            pool: Arc::new(pool),
            location: Arc::from(sqlite_path),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        let session = self.session()?;
        run_sqlite_migrations(&session)
    }

    /// Open a scoped session.
    ///
    /// The connection goes back to the pool when the returned guard is dropped.
    pub fn session(&self) -> Result<Session, DatabaseError> {
        let conn = self.pool.get()?;
        debug!("Database session opened");
        Ok(Session { conn })
    }

    /// Current pool occupancy
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    /// Whether the pool sits on an in-memory database
    pub fn is_in_memory(&self) -> bool {
        &*self.location == ":memory:"
    }

    /// Get information about the current database connection
    pub fn connection_info(&self) -> String {
        let target = if self.is_in_memory() {
            "SQLite in-memory database".to_string()
        } else {
            format!("SQLite database at {}", self.location)
        };

        let state = self.state();
        format!(
            "{} (connections: active={}, idle={})",
            target,
            state.connections - state.idle_connections,
            state.idle_connections
        )
    }
}

/// Request-scoped handle to the database.
///
/// Dereferences to [`rusqlite::Connection`].
pub struct Session {
    conn: PooledConnection<SqliteConnectionManager>,
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Database session released");
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn unique_db_path(prefix: &str) -> String {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        env::temp_dir()
            .join(format!("{}_{}_{}_{}", prefix, std::process::id(), nanos, count))
            .join("health.db")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert!(config.sqlite_path.is_some());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_config_from_lookup() {
        let config = DatabaseConfig::from_lookup(|key| match key {
            "DB_SQLITE_PATH" => Some("/tmp/records.db".to_string()),
            "DB_MAX_CONNECTIONS" => Some("4".to_string()),
            "DB_TIMEOUT_SECONDS" => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config.sqlite_path.as_deref(), Some("/tmp/records.db"));
        assert_eq!(config.max_connections, 4);
        // Unparsable values keep the default
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_in_memory_pool_runs_migrations() {
        let pool = DatabasePool::in_memory().unwrap();
        let session = pool.session().unwrap();

        let count: i64 = session
            .query_row("SELECT COUNT(*) FROM health_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(pool.is_in_memory());
    }

    #[test]
    fn test_session_is_released_on_drop() {
        let pool = DatabasePool::in_memory().unwrap();

        {
            let _session = pool.session().unwrap();
            assert_eq!(pool.state().idle_connections, 0);
        }

        assert_eq!(pool.state().idle_connections, 1);
    }

    #[test]
    fn test_session_is_released_on_error() {
        let pool = DatabasePool::in_memory().unwrap();

        let result: Result<i64, DatabaseError> = (|| {
            let session = pool.session()?;
            let value = session.query_row("SELECT * FROM missing_table", [], |row| row.get(0))?;
            Ok(value)
        })();

        assert!(matches!(result, Err(DatabaseError::SqliteError(_))));
        assert_eq!(pool.state().idle_connections, 1);
    }

    #[test]
    fn test_file_pool_creates_parent_directory() {
        let path = unique_db_path("health_tracker_pool");
        let config = DatabaseConfig {
            sqlite_path: Some(path.clone()),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let pool = DatabasePool::new(&config).unwrap();
        assert!(Path::new(&path).exists());
        assert!(!pool.is_in_memory());
        assert!(pool.connection_info().contains(&path));

        drop(pool);
        if let Some(parent) = Path::new(&path).parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_none_path_selects_in_memory() {
        let config = DatabaseConfig {
            sqlite_path: None,
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::new(&config).unwrap();
        assert!(pool.is_in_memory());
        assert!(pool.connection_info().starts_with("SQLite in-memory database"));
    }
}
