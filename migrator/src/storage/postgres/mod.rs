//! Destination backend: the Supabase Postgres database.
//!
//! Tables are owned by the destination application; the migrator only
//! selects, inserts, and backfills. Row ids are generated by the database
//! and surfaced through `RETURNING`.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{LedgerRepository, ProductRepository, UserRepository};
