//! # Storage Module
//!
//! Handles every interaction with the two data stores involved in a run.
//!
//! The domain layer only sees the abstraction traits defined in [`traits`];
//! concrete backends live in their own submodules and are injected at
//! startup, so tests can swap in the in-memory implementations without
//! touching migration logic.
//!
//! - **firestore**: read-only source backend over the Firestore REST API
//! - **postgres**: destination backend over the Supabase Postgres database
//! - **memory**: in-memory fakes for tests

pub mod firestore;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use traits::{LedgerStorage, ProductStorage, SourceStorage, UserStorage};
