use anyhow::Result;
use async_trait::async_trait;
use shared::NewProduct;
use sqlx::Row;
use uuid::Uuid;

use crate::storage::postgres::connection::DbConnection;
use crate::storage::traits::ProductStorage;

/// Repository for destination product rows.
#[derive(Clone)]
pub struct ProductRepository {
    db: DbConnection,
}

impl ProductRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStorage for ProductRepository {
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<Uuid>> {
        let row = sqlx::query(
            r#"
            SELECT id
            FROM products
            WHERE user_id = $1 AND name = $2
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| r.get("id")))
    }

    async fn insert(&self, product: &NewProduct) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                user_id, name, category, supplier, description, notes, tracking_code,
                status, quantity, quantity_sold, purchase_price, selling_price,
                additional_costs, roi, purchase_date, sale_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(product.user_id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.supplier)
        .bind(&product.description)
        .bind(&product.notes)
        .bind(&product.tracking_code)
        .bind(&product.status)
        .bind(product.quantity)
        .bind(product.quantity_sold)
        .bind(product.purchase_price)
        .bind(product.selling_price)
        .bind(product.additional_costs)
        .bind(product.roi)
        .bind(product.purchase_date)
        .bind(product.sale_date)
        .bind(product.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
