use std::fs;
use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::{HandicapError, HandicapResult};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

/// Opens a single-connection pool; one is created and dropped per ingestion cycle.
pub fn create_pool(database_path: &Path) -> HandicapResult<DbPool> {
    ensure_parent_dir(database_path)?;
    let manager = build_manager(database_path);
    build_pool(manager)
}

fn ensure_parent_dir(path: &Path) -> HandicapResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| HandicapError::source_io(dir, e))
        }
        _ => Ok(()),
    }
}

fn build_manager(path: &Path) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path)
}

fn build_pool(manager: SqliteConnectionManager) -> HandicapResult<DbPool> {
    let pool = r2d2::Pool::builder().max_size(1).build(manager)?;
    Ok(pool)
}

pub fn get_connection(pool: &DbPool) -> HandicapResult<DbConn> {
    let conn = pool.get()?;
    Ok(conn)
}
