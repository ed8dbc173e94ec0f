use anyhow::Result;
use async_trait::async_trait;
use shared::{DestinationUser, NewUser};
use sqlx::Row;
use uuid::Uuid;

use crate::storage::postgres::connection::DbConnection;
use crate::storage::traits::UserStorage;

/// Repository for destination user rows.
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<DestinationUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, firebase_uid, email, name, avatar_url, account_type, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(DestinationUser {
                id: r.get("id"),
                firebase_uid: r.get("firebase_uid"),
                email: r.get("email"),
                name: r.get("name"),
                avatar_url: r.get("avatar_url"),
                account_type: r.get("account_type"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })),
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &NewUser) -> Result<DestinationUser> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (firebase_uid, email, name, avatar_url, account_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.firebase_uid)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(&user.account_type)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.db.pool())
        .await?;

        Ok(DestinationUser {
            id: row.get("id"),
            firebase_uid: Some(user.firebase_uid.clone()),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            account_type: user.account_type.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    async fn set_firebase_uid(&self, id: Uuid, firebase_uid: &str) -> Result<()> {
        // The guard keeps an already-linked row from being re-pointed.
        sqlx::query(
            r#"
            UPDATE users
            SET firebase_uid = $1
            WHERE id = $2 AND (firebase_uid IS NULL OR firebase_uid = '')
            "#,
        )
        .bind(firebase_uid)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
