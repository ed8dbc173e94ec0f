use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

// One migration process runs strictly sequentially; a small pool covers the
// lookup-then-insert pairs without piling up idle connections.
const MAX_CONNECTIONS: u32 = 5;

/// DbConnection manages the destination database pool.
///
/// The pool is lazy: no connection is established until the first query, so
/// a run that finds zero source users never contacts the destination.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<PgPool>,
}

impl DbConnection {
    /// Create the pool for the destination database.
    pub fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(database_url)
            .context("Invalid destination database URL")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
