//! Source backend: the Firestore REST API.
//!
//! Documents are fetched page by page from the configured user collection
//! and their typed value wrappers decoded into plain JSON before the domain
//! layer ever sees them. This backend never writes.

pub mod connection;
pub mod document;
pub mod user_repository;

pub use connection::{FirestoreConnection, FirestoreError};
pub use user_repository::FirestoreUserRepository;
