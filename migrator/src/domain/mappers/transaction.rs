use anyhow::Result;
use serde_json::Value;
use shared::NewTransaction;
use uuid::Uuid;

use super::{as_record, bool_or, date_or_now, float_or, opt_text, string_list, text_or};

/// Map one source ledger transaction into its destination row shape.
pub fn map_transaction(user_id: Uuid, raw: &Value) -> Result<NewTransaction> {
    let record = as_record(raw)?;

    Ok(NewTransaction {
        user_id,
        description: text_or(record, "description", ""),
        category: text_or(record, "category", ""),
        transaction_type: text_or(record, "type", "expense"),
        status: text_or(record, "status", "completed"),
        amount: float_or(record, "amount", 0.0),
        payment_method: opt_text(record, "paymentMethod"),
        tags: string_list(record, "tags"),
        is_installment: bool_or(record, "isInstallment", false),
        product_id: opt_text(record, "productId"),
        date: date_or_now(record, "date"),
        created_at: date_or_now(record, "createdAt"),
    })
}
