use anyhow::{anyhow, Error};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite leaves foreign keys off unless asked per connection; the api token
/// cascade depends on them.
#[derive(Debug)]
struct ForeignKeys;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeys {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn new_pool(path: &str) -> Result<DbPool, Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(path);

    Pool::builder()
        .connection_customizer(Box::new(ForeignKeys))
        .build(manager)
        .map_err(|e| anyhow!("Could not create database pool: {}", e))
}

#[tracing::instrument(skip(pool))]
pub fn run_migrations(pool: &DbPool) -> Result<(), Error> {
    let mut conn = pool
        .get()
        .map_err(|e| anyhow!("Database error: {:?}", e))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Could not run migrations: {}", e))?;

    tracing::info!(count = applied.len(), "Database migrations applied");

    Ok(())
}
