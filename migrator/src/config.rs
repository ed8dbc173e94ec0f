use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_USERS_COLLECTION: &str = "users";
const DEFAULT_PAUSE_MS: u64 = 500;

/// Runtime configuration, read from the environment before any store is
/// contacted. Missing required values abort the process.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Firebase project whose Firestore holds the user documents.
    pub firebase_project_id: String,
    /// Privileged bearer token for the Firestore REST API.
    pub firebase_access_token: String,
    /// Connection string for the destination Postgres database.
    pub supabase_db_url: String,
    /// Collection holding one aggregate document per user.
    pub users_collection: String,
    /// Pause inserted between users to bound the destination request rate.
    /// Zero disables the pause.
    pub pause_between_users: Duration,
}

impl MigratorConfig {
    pub fn from_env() -> Result<Self> {
        let firebase_project_id =
            std::env::var("FIREBASE_PROJECT_ID").context("FIREBASE_PROJECT_ID must be set")?;
        let firebase_access_token =
            std::env::var("FIREBASE_ACCESS_TOKEN").context("FIREBASE_ACCESS_TOKEN must be set")?;
        let supabase_db_url =
            std::env::var("SUPABASE_DB_URL").context("SUPABASE_DB_URL must be set")?;

        let users_collection = std::env::var("FIREBASE_USERS_COLLECTION")
            .unwrap_or_else(|_| DEFAULT_USERS_COLLECTION.to_string());

        let pause_ms = match std::env::var("MIGRATION_PAUSE_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("MIGRATION_PAUSE_MS must be a non-negative integer")?,
            Err(_) => DEFAULT_PAUSE_MS,
        };

        Ok(Self {
            firebase_project_id,
            firebase_access_token,
            supabase_db_url,
            users_collection,
            pause_between_users: Duration::from_millis(pause_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_required_and_defaults() {
        std::env::set_var("FIREBASE_PROJECT_ID", "financas-prod");
        std::env::set_var("FIREBASE_ACCESS_TOKEN", "token-123");
        std::env::set_var("SUPABASE_DB_URL", "postgres://localhost/financas");
        std::env::remove_var("FIREBASE_USERS_COLLECTION");
        std::env::remove_var("MIGRATION_PAUSE_MS");

        let config = MigratorConfig::from_env().expect("Failed to load config");

        assert_eq!(config.firebase_project_id, "financas-prod");
        assert_eq!(config.users_collection, "users");
        assert_eq!(config.pause_between_users, Duration::from_millis(500));
    }
}
