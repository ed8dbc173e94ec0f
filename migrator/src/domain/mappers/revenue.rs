use anyhow::Result;
use serde_json::Value;
use shared::NewRevenue;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, text_or};

/// Map one source revenue record into its destination row shape.
pub fn map_revenue(user_id: Uuid, raw: &Value) -> Result<NewRevenue> {
    let record = as_record(raw)?;

    Ok(NewRevenue {
        user_id,
        description: text_or(record, "description", ""),
        category: text_or(record, "category", ""),
        source: text_or(record, "source", "other"),
        amount: float_or(record, "amount", 0.0),
        date: date_or_now(record, "date"),
        created_at: date_or_now(record, "createdAt"),
    })
}
