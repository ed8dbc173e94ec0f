//! # Storage Traits
//!
//! Abstraction traits that decouple the migration logic from the concrete
//! stores. Lookups return `Result<Option<_>>` so callers can branch on
//! found / not-found / error explicitly instead of inspecting backend error
//! codes.

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    DestinationUser, NewBet, NewDebt, NewDream, NewExpense, NewGoal, NewProduct, NewRevenue,
    NewTransaction, NewUser, SourceUser,
};
use uuid::Uuid;

/// Read-only access to the source document store.
#[async_trait]
pub trait SourceStorage: Send + Sync {
    /// Load every user aggregate from the source collection, in store order.
    /// A store-level read failure is fatal to the run.
    async fn load_users(&self) -> Result<Vec<SourceUser>>;
}

/// Destination user rows, keyed by email for identity resolution.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Look up a user by email. `Ok(None)` means no row exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<DestinationUser>>;

    /// Insert a new user and return the created row, id included.
    async fn insert(&self, user: &NewUser) -> Result<DestinationUser>;

    /// Backfill the source document id on a row that does not have one yet.
    /// Must never overwrite an existing value.
    async fn set_firebase_uid(&self, id: Uuid, firebase_uid: &str) -> Result<()>;
}

/// Destination product rows. Products are the one kind with a natural dedup
/// key: (user, name).
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Look up a product by owner and name. `Ok(None)` means no row exists.
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<Uuid>>;

    /// Insert a new product row.
    async fn insert(&self, product: &NewProduct) -> Result<()>;
}

/// Destination rows for the seven kinds without a dedup key. Inserts are
/// unconditional; re-running a migration duplicates these rows.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    async fn insert_revenue(&self, revenue: &NewRevenue) -> Result<()>;
    async fn insert_expense(&self, expense: &NewExpense) -> Result<()>;
    async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<()>;
    async fn insert_dream(&self, dream: &NewDream) -> Result<()>;
    async fn insert_bet(&self, bet: &NewBet) -> Result<()>;
    async fn insert_goal(&self, goal: &NewGoal) -> Result<()>;
    async fn insert_debt(&self, debt: &NewDebt) -> Result<()>;
}
