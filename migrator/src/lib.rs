//! One-shot migration of finance data from the Firebase document store into
//! the Supabase relational database.
//!
//! The source holds one aggregate document per user with embedded arrays of
//! child records (products, revenues, expenses, transactions, dreams, bets,
//! goals, debts). The destination holds one normalized table per kind, each
//! row owned by a user via foreign key. A run reads every source user,
//! resolves the matching destination user by email, flattens the embedded
//! records into rows, and reports how many of each kind were migrated.

pub mod config;
pub mod domain;
pub mod storage;
