use anyhow::Result;
use serde_json::Value;
use shared::NewExpense;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, text_or};

/// Map one source expense record into its destination row shape.
pub fn map_expense(user_id: Uuid, raw: &Value) -> Result<NewExpense> {
    let record = as_record(raw)?;

    Ok(NewExpense {
        user_id,
        description: text_or(record, "description", ""),
        category: text_or(record, "category", ""),
        expense_type: text_or(record, "type", "other"),
        amount: float_or(record, "amount", 0.0),
        date: date_or_now(record, "date"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_type_defaults_to_other() {
        let expense = map_expense(Uuid::new_v4(), &json!({"description": "aluguel", "amount": 1200}))
            .expect("Failed to map expense");

        assert_eq!(expense.expense_type, "other");
        assert_eq!(expense.amount, 1200.0);
    }
}
