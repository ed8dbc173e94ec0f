use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use shared::SourceUser;
use tracing::{info, warn};

use super::connection::FirestoreConnection;
use super::document::{decode_fields, document_id};
use crate::storage::traits::SourceStorage;

/// Repository reading user aggregate documents from the source collection.
#[derive(Clone)]
pub struct FirestoreUserRepository {
    connection: FirestoreConnection,
    collection: String,
}

impl FirestoreUserRepository {
    pub fn new(connection: FirestoreConnection, collection: &str) -> Self {
        Self {
            connection,
            collection: collection.to_string(),
        }
    }

    /// Decode one document body into a user aggregate. The document id
    /// becomes the aggregate's firebase uid.
    fn decode_user(uid: &str, fields: &serde_json::Map<String, Value>) -> Result<SourceUser> {
        let decoded = decode_fields(fields);
        let mut user: SourceUser = serde_json::from_value(Value::Object(decoded))?;
        user.firebase_uid = uid.to_string();
        Ok(user)
    }
}

#[async_trait]
impl SourceStorage for FirestoreUserRepository {
    async fn load_users(&self) -> Result<Vec<SourceUser>> {
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .connection
                .list_documents(&self.collection, page_token.as_deref())
                .await
                .with_context(|| {
                    format!("failed to read collection '{}' from Firestore", self.collection)
                })?;

            for doc in &page.documents {
                let uid = document_id(&doc.name);
                match Self::decode_user(&uid, &doc.fields) {
                    Ok(user) => users.push(user),
                    // One malformed document must not sink the whole read.
                    Err(e) => warn!("Skipping undecodable user document {}: {}", uid, e),
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(
            "Loaded {} users from source collection '{}'",
            users.len(),
            self.collection
        );
        Ok(users)
    }
}
