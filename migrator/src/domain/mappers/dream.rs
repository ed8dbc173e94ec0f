use anyhow::Result;
use serde_json::Value;
use shared::NewDream;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, opt_date, text_or};

/// Map one source dream record into its destination row shape.
pub fn map_dream(user_id: Uuid, raw: &Value) -> Result<NewDream> {
    let record = as_record(raw)?;

    Ok(NewDream {
        user_id,
        name: text_or(record, "name", ""),
        description: text_or(record, "description", ""),
        dream_type: text_or(record, "type", "personal"),
        status: text_or(record, "status", "planning"),
        priority: text_or(record, "priority", "medium"),
        target_amount: float_or(record, "targetAmount", 0.0),
        current_amount: float_or(record, "currentAmount", 0.0),
        target_date: opt_date(record, "targetDate"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_sparse_record() {
        let dream = map_dream(Uuid::new_v4(), &json!({"name": "viagem ao Japão"}))
            .expect("Failed to map dream");

        assert_eq!(dream.dream_type, "personal");
        assert_eq!(dream.status, "planning");
        assert_eq!(dream.priority, "medium");
        assert_eq!(dream.target_amount, 0.0);
        assert!(dream.target_date.is_none());
    }
}
