use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use shared::{NewUser, SourceUser};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::mappers;
use crate::storage::UserStorage;

/// Resolves one source user aggregate to exactly one destination user row.
///
/// The lookup key is the email; the source document id is only carried along
/// and backfilled onto rows that do not have one yet. A lookup error means
/// the caller must skip the whole user, so it propagates untouched.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStorage>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStorage>) -> Self {
        Self { users }
    }

    /// Resolve the destination user id for a source aggregate, creating the
    /// destination user when the email has no row yet.
    pub async fn resolve(&self, source: &SourceUser) -> Result<Uuid> {
        let existing = self
            .users
            .find_by_email(&source.email)
            .await
            .with_context(|| format!("user lookup failed for '{}'", source.email))?;

        match existing {
            Some(user) => {
                if user.firebase_uid.as_deref().map_or(true, str::is_empty) {
                    // Backfill failure is non-fatal, keep the existing id.
                    if let Err(e) = self
                        .users
                        .set_firebase_uid(user.id, &source.firebase_uid)
                        .await
                    {
                        warn!("Could not backfill firebase uid for {}: {:#}", source.email, e);
                    }
                }
                info!("Found existing user for {}", source.email);
                Ok(user.id)
            }
            None => {
                let created = self
                    .users
                    .insert(&build_new_user(source))
                    .await
                    .with_context(|| format!("failed to create user for '{}'", source.email))?;
                info!("Created user {} for {}", created.id, source.email);
                Ok(created.id)
            }
        }
    }
}

fn build_new_user(source: &SourceUser) -> NewUser {
    NewUser {
        firebase_uid: source.firebase_uid.clone(),
        email: source.email.clone(),
        name: first_non_empty(&[source.name.as_deref(), source.display_name.as_deref()]),
        avatar_url: first_non_empty(&[source.avatar_url.as_deref(), source.photo_url.as_deref()]),
        account_type: source
            .account_type
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "personal".to_string()),
        created_at: source
            .created_at
            .as_ref()
            .and_then(mappers::parse_datetime)
            .unwrap_or_else(Utc::now),
        updated_at: source
            .updated_at
            .as_ref()
            .and_then(mappers::parse_datetime)
            .unwrap_or_else(Utc::now),
    }
}

fn first_non_empty(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn setup_test() -> (IdentityService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (IdentityService::new(store.clone()), store)
    }

    fn source_user(email: &str, uid: &str) -> SourceUser {
        SourceUser {
            firebase_uid: uid.to_string(),
            email: email.to_string(),
            ..SourceUser::default()
        }
    }

    #[tokio::test]
    async fn test_creates_user_when_email_not_found() {
        let (service, store) = setup_test();
        let source = SourceUser {
            name: Some("Ana".to_string()),
            avatar_url: Some("https://example.com/a.png".to_string()),
            ..source_user("a@x.com", "uid-1")
        };

        let id = service.resolve(&source).await.expect("Failed to resolve");

        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, id);
        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[0].name, "Ana");
        assert_eq!(users[0].firebase_uid.as_deref(), Some("uid-1"));
        assert_eq!(users[0].account_type, "personal");
    }

    #[tokio::test]
    async fn test_profile_fallback_chains() {
        let (service, store) = setup_test();
        let source = SourceUser {
            name: Some("   ".to_string()),
            display_name: Some("Ana Maria".to_string()),
            photo_url: Some("https://example.com/p.png".to_string()),
            account_type: Some("business".to_string()),
            ..source_user("a@x.com", "uid-1")
        };

        service.resolve(&source).await.expect("Failed to resolve");

        let users = store.users();
        assert_eq!(users[0].name, "Ana Maria");
        assert_eq!(users[0].avatar_url, "https://example.com/p.png");
        assert_eq!(users[0].account_type, "business");
    }

    #[tokio::test]
    async fn test_reuses_existing_user_for_same_email() {
        let (service, store) = setup_test();

        let first = service
            .resolve(&source_user("a@x.com", "uid-1"))
            .await
            .expect("Failed to resolve first");
        let second = service
            .resolve(&source_user("a@x.com", "uid-1"))
            .await
            .expect("Failed to resolve second");

        assert_eq!(first, second);
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_backfills_missing_uid_only() {
        let (service, store) = setup_test();

        // Row created without a uid, as the destination app would.
        let existing = store
            .insert(&NewUser {
                firebase_uid: String::new(),
                email: "a@x.com".to_string(),
                name: "Ana".to_string(),
                avatar_url: String::new(),
                account_type: "personal".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .expect("Failed to seed user");

        let resolved = service
            .resolve(&source_user("a@x.com", "uid-9"))
            .await
            .expect("Failed to resolve");

        assert_eq!(resolved, existing.id);
        assert_eq!(store.users()[0].firebase_uid.as_deref(), Some("uid-9"));

        // A second aggregate with a different uid must not re-point the row.
        service
            .resolve(&source_user("a@x.com", "uid-10"))
            .await
            .expect("Failed to resolve again");
        assert_eq!(store.users()[0].firebase_uid.as_deref(), Some("uid-9"));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let store = Arc::new(MemoryStore::with_failing_lookup("down@x.com"));
        let service = IdentityService::new(store.clone());

        let result = service.resolve(&source_user("down@x.com", "uid-1")).await;

        assert!(result.is_err());
        assert!(store.users().is_empty());
    }
}
