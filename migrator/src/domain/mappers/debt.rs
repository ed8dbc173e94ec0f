use anyhow::Result;
use serde_json::Value;
use shared::NewDebt;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, opt_date, text_or};

/// Map one source debt record into its destination row shape.
pub fn map_debt(user_id: Uuid, raw: &Value) -> Result<NewDebt> {
    let record = as_record(raw)?;

    Ok(NewDebt {
        user_id,
        description: text_or(record, "description", ""),
        category: text_or(record, "category", "other"),
        priority: text_or(record, "priority", "medium"),
        status: text_or(record, "status", "pending"),
        total_amount: float_or(record, "totalAmount", 0.0),
        paid_amount: float_or(record, "paidAmount", 0.0),
        due_date: opt_date(record, "dueDate"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_sparse_record() {
        let debt = map_debt(Uuid::new_v4(), &json!({"description": "cartão de crédito"}))
            .expect("Failed to map debt");

        assert_eq!(debt.category, "other");
        assert_eq!(debt.priority, "medium");
        assert_eq!(debt.status, "pending");
        assert_eq!(debt.total_amount, 0.0);
        assert!(debt.due_date.is_none());
    }

    #[test]
    fn test_due_date_parses_when_present() {
        let debt = map_debt(
            Uuid::new_v4(),
            &json!({"description": "financiamento", "totalAmount": "32000", "dueDate": "2027-01-10"}),
        )
        .expect("Failed to map debt");

        assert_eq!(debt.total_amount, 32000.0);
        assert!(debt.due_date.is_some());
    }
}
