use anyhow::Result;
use serde_json::Value;
use shared::NewBet;
use uuid::Uuid;

use super::{as_record, date_or_now, float_or, text_or};

/// Map one source bet record into its destination row shape.
pub fn map_bet(user_id: Uuid, raw: &Value) -> Result<NewBet> {
    let record = as_record(raw)?;

    Ok(NewBet {
        user_id,
        description: text_or(record, "description", ""),
        bet_type: text_or(record, "type", "single"),
        status: text_or(record, "status", "pending"),
        stake: float_or(record, "stake", 0.0),
        odds: float_or(record, "odds", 0.0),
        potential_win: float_or(record, "potentialWin", 0.0),
        date: date_or_now(record, "date"),
        created_at: date_or_now(record, "createdAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_sparse_record() {
        let bet = map_bet(Uuid::new_v4(), &json!({"description": "final da copa"}))
            .expect("Failed to map bet");

        assert_eq!(bet.bet_type, "single");
        assert_eq!(bet.status, "pending");
        assert_eq!(bet.stake, 0.0);
        assert_eq!(bet.odds, 0.0);
        assert_eq!(bet.potential_win, 0.0);
    }

    #[test]
    fn test_string_odds_are_coerced() {
        let bet = map_bet(Uuid::new_v4(), &json!({"stake": "50", "odds": "1.85"}))
            .expect("Failed to map bet");

        assert_eq!(bet.stake, 50.0);
        assert_eq!(bet.odds, 1.85);
    }
}
