use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod seed;
pub mod serializer;
pub mod service;
pub mod store;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings, applied each time the pool hands out a connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    enable_foreign_keys: bool,
    write_ahead_log: bool,
    busy_timeout: Option<Duration>,
}

impl ConnectionOptions {
    /// `None` makes a locked database fail immediately instead of waiting.
    pub fn with_busy_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn pragmas(&self) -> String {
        let mut pragmas = String::new();
        if self.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        // Readers no longer block the single writer.
        if self.write_ahead_log {
            pragmas.push_str("PRAGMA journal_mode = WAL;");
        }
        if let Some(timeout) = self.busy_timeout {
            pragmas.push_str(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()));
        }
        pragmas
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_foreign_keys: true,
            write_ahead_log: true,
            busy_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.pragmas())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool(
    database_url: &str,
    max_size: u32,
    options: ConnectionOptions,
) -> Result<DbPool, PoolError> {
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(options))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

/// Applies every embedded migration not yet recorded in the database and
/// returns how many ran.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.len())
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::*;

    /// A seeded database living in a temporary directory. The directory is
    /// removed when this value is dropped.
    pub struct TestDatabase {
        pub pool: DbPool,
        _dir: TempDir,
    }

    pub fn setup_database() -> TestDatabase {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let pool =
            establish_pool(path.to_str().unwrap(), 8, ConnectionOptions::default()).unwrap();

        let conn = &mut pool.get().unwrap();
        run_migrations(conn).unwrap();
        crate::seed::run(conn).unwrap();

        TestDatabase { pool, _dir: dir }
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::test_support::setup_database;
    use super::*;

    #[test]
    fn test_run_migrations_is_idempotent() {
        let db = setup_database();
        let conn = &mut db.pool.get().unwrap();

        assert_eq!(run_migrations(conn).unwrap(), 0);
    }

    #[test]
    fn test_foreign_keys_enabled_on_pooled_connections() {
        let db = setup_database();
        let mut conn = db.pool.get().unwrap();

        let result = diesel::insert_into(schema::restaurant_pizzas::table)
            .values(models::NewRestaurantPizza {
                price: 10.0,
                pizza_id: 999,
                restaurant_id: 999,
            })
            .execute(&mut *conn);

        assert!(result.is_err());
    }

    #[test]
    fn test_pooled_connections_use_write_ahead_log() {
        let db = setup_database();
        let mut conn = db.pool.get().unwrap();

        let mode: String = diesel::select(diesel::dsl::sql::<diesel::sql_types::Text>(
            "journal_mode FROM pragma_journal_mode()",
        ))
        .get_result(&mut *conn)
        .unwrap();

        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_pragmas_without_busy_timeout() {
        let pragmas = ConnectionOptions::default()
            .with_busy_timeout(None)
            .pragmas();

        assert!(pragmas.contains("foreign_keys = ON"));
        assert!(!pragmas.contains("busy_timeout"));
    }
}
