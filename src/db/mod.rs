pub mod collection;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use once_cell::sync::OnceCell;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::DatabaseConfig;
use crate::error::DashboardError;

pub use collection::{Collection, Document, ReplaceCounts};

pub const ALERTS_COLLECTION: &str = "alerts";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tables are created on open; documents are JSON text keyed by a
/// monotonically increasing `_id` (AUTOINCREMENT never reuses ids).
const CREATE_SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS alerts (
        _id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at  INTEGER NOT NULL,
        doc         TEXT NOT NULL
    );
"#;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Owns the lazily opened store handle.
///
/// The first successful `get_handle` opens the pool and every later call
/// returns a clone of the same handle. Concurrent first callers block on the
/// same initialization instead of racing to open duplicate pools. A failed
/// open is not cached, so a later call tries again.
pub struct StoreAccessor {
    settings: DatabaseConfig,
    handle: OnceCell<StoreHandle>,
}

impl StoreAccessor {
    pub fn new(settings: DatabaseConfig) -> Self {
        Self {
            settings,
            handle: OnceCell::new(),
        }
    }

    pub fn get_handle(&self) -> Result<StoreHandle, DashboardError> {
        self.handle
            .get_or_try_init(|| StoreHandle::open(&self.settings))
            .cloned()
    }

    pub fn is_open(&self) -> bool {
        self.handle.get().is_some()
    }
}

/// A handle to one logical database of the store. Cheap to clone: the
/// underlying pool is reference counted.
#[derive(Clone)]
pub struct StoreHandle {
    pool: DbPool,
    name: String,
    path: PathBuf,
}

impl StoreHandle {
    fn open(settings: &DatabaseConfig) -> Result<Self, DashboardError> {
        let uri = settings.uri.trim();
        if uri.is_empty() {
            return Err(DashboardError::ConfigError(
                "database uri is not configured (set SOCDASH_DATABASE__URI)".to_string(),
            ));
        }

        let folder = Path::new(uri);
        fs::create_dir_all(folder)?;
        let path = folder.join(format!("{}.db", settings.name));

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")
        });
        let pool = Pool::builder()
            .max_size(settings.pool_size.max(1))
            .build(manager)?;

        let handle = Self {
            pool,
            name: settings.name.clone(),
            path,
        };
        handle.get_connection()?.execute_batch(CREATE_SCHEMA_SQL)?;

        info!(
            "Opened store database '{}' at {}",
            handle.name,
            handle.path.display()
        );

        Ok(handle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_connection(&self) -> Result<DbConnection, DashboardError> {
        Ok(self.pool.get()?)
    }

    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(self.pool.clone(), name)
    }

    pub fn alerts(&self) -> Collection {
        self.collection(ALERTS_COLLECTION)
    }
}
