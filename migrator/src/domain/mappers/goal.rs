use anyhow::Result;
use serde_json::Value;
use shared::NewGoal;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, opt_date, text_or};

/// Map one source goal record into its destination row shape.
pub fn map_goal(user_id: Uuid, raw: &Value) -> Result<NewGoal> {
    let record = as_record(raw)?;

    Ok(NewGoal {
        user_id,
        name: text_or(record, "name", ""),
        description: text_or(record, "description", ""),
        category: text_or(record, "category", "financial"),
        goal_type: text_or(record, "type", "savings"),
        unit: text_or(record, "unit", "BRL"),
        priority: text_or(record, "priority", "medium"),
        status: text_or(record, "status", "active"),
        target_value: float_or(record, "targetValue", 0.0),
        current_value: float_or(record, "currentValue", 0.0),
        deadline: opt_date(record, "deadline"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_sparse_record() {
        let goal = map_goal(Uuid::new_v4(), &json!({"name": "reserva de emergência"}))
            .expect("Failed to map goal");

        assert_eq!(goal.category, "financial");
        assert_eq!(goal.goal_type, "savings");
        assert_eq!(goal.unit, "BRL");
        assert_eq!(goal.priority, "medium");
        assert_eq!(goal.status, "active");
        assert!(goal.deadline.is_none());
    }
}
