use anyhow::Result;
use serde_json::Value;
use shared::NewProduct;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, int_or, opt_date, text_or};

/// Map one source product record into its destination row shape.
pub fn map_product(user_id: Uuid, raw: &Value) -> Result<NewProduct> {
    let record = as_record(raw)?;

    Ok(NewProduct {
        user_id,
        name: text_or(record, "name", ""),
        category: text_or(record, "category", ""),
        supplier: text_or(record, "supplier", ""),
        description: text_or(record, "description", ""),
        notes: text_or(record, "notes", ""),
        tracking_code: text_or(record, "trackingCode", ""),
        status: text_or(record, "status", "purchased"),
        quantity: int_or(record, "quantity", 1),
        quantity_sold: int_or(record, "quantitySold", 0),
        purchase_price: float_or(record, "purchasePrice", 0.0),
        selling_price: float_or(record, "sellingPrice", 0.0),
        additional_costs: float_or(record, "additionalCosts", 0.0),
        roi: float_or(record, "roi", 0.0),
        purchase_date: date_or_now(record, "purchaseDate"),
        sale_date: opt_date(record, "saleDate"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_maps_through() {
        let raw = json!({
            "name": "Widget",
            "category": "eletrônicos",
            "supplier": "Shopee",
            "status": "sold",
            "quantity": 2,
            "quantitySold": 1,
            "purchasePrice": 10.0,
            "sellingPrice": 20.0,
            "purchaseDate": "2023-05-01",
            "saleDate": "2023-06-15T10:00:00Z"
        });

        let product = map_product(Uuid::new_v4(), &raw).expect("Failed to map product");

        assert_eq!(product.name, "Widget");
        assert_eq!(product.status, "sold");
        assert_eq!(product.quantity, 2);
        assert_eq!(product.quantity_sold, 1);
        assert_eq!(product.purchase_price, 10.0);
        assert_eq!(product.selling_price, 20.0);
        assert!(product.sale_date.is_some());
    }

    #[test]
    fn test_missing_status_defaults_to_purchased() {
        let raw = json!({"name": "Widget"});

        let product = map_product(Uuid::new_v4(), &raw).expect("Failed to map product");

        assert_eq!(product.status, "purchased");
        assert_eq!(product.quantity, 1);
        assert_eq!(product.quantity_sold, 0);
        assert_eq!(product.category, "");
        assert!(product.sale_date.is_none());
    }

    #[test]
    fn test_string_price_is_coerced() {
        let raw = json!({"name": "Widget", "purchasePrice": "12.50"});

        let product = map_product(Uuid::new_v4(), &raw).expect("Failed to map product");

        assert_eq!(product.purchase_price, 12.5);
    }

    #[test]
    fn test_unparseable_price_defaults_to_zero() {
        let raw = json!({"name": "Widget", "purchasePrice": "not-a-number"});

        let product = map_product(Uuid::new_v4(), &raw).expect("Failed to map product");

        assert_eq!(product.purchase_price, 0.0);
    }

    #[test]
    fn test_non_object_record_fails() {
        assert!(map_product(Uuid::new_v4(), &json!("Widget")).is_err());
        assert!(map_product(Uuid::new_v4(), &json!(["Widget"])).is_err());
    }
}
