use anyhow::Result;
use async_trait::async_trait;
use shared::{NewBet, NewDebt, NewDream, NewExpense, NewGoal, NewRevenue, NewTransaction};

use crate::storage::postgres::connection::DbConnection;
use crate::storage::traits::LedgerStorage;

/// Repository for the seven record kinds without a dedup key. All inserts
/// are unconditional.
#[derive(Clone)]
pub struct LedgerRepository {
    db: DbConnection,
}

impl LedgerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStorage for LedgerRepository {
    async fn insert_revenue(&self, revenue: &NewRevenue) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO revenues (user_id, description, category, source, amount, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(revenue.user_id)
        .bind(&revenue.description)
        .bind(&revenue.category)
        .bind(&revenue.source)
        .bind(revenue.amount)
        .bind(revenue.date)
        .bind(revenue.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_expense(&self, expense: &NewExpense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (user_id, description, category, type, amount, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expense.user_id)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(&expense.expense_type)
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                user_id, description, category, type, status, amount, payment_method,
                tags, is_installment, product_id, date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(transaction.user_id)
        .bind(&transaction.description)
        .bind(&transaction.category)
        .bind(&transaction.transaction_type)
        .bind(&transaction.status)
        .bind(transaction.amount)
        .bind(&transaction.payment_method)
        .bind(&transaction.tags)
        .bind(transaction.is_installment)
        .bind(&transaction.product_id)
        .bind(transaction.date)
        .bind(transaction.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_dream(&self, dream: &NewDream) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dreams (
                user_id, name, description, type, status, priority,
                target_amount, current_amount, target_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(dream.user_id)
        .bind(&dream.name)
        .bind(&dream.description)
        .bind(&dream.dream_type)
        .bind(&dream.status)
        .bind(&dream.priority)
        .bind(dream.target_amount)
        .bind(dream.current_amount)
        .bind(dream.target_date)
        .bind(dream.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_bet(&self, bet: &NewBet) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bets (
                user_id, description, type, status, stake, odds, potential_win, date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(bet.user_id)
        .bind(&bet.description)
        .bind(&bet.bet_type)
        .bind(&bet.status)
        .bind(bet.stake)
        .bind(bet.odds)
        .bind(bet.potential_win)
        .bind(bet.date)
        .bind(bet.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_goal(&self, goal: &NewGoal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO goals (
                user_id, name, description, category, type, unit, priority, status,
                target_value, current_value, deadline, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(goal.user_id)
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(&goal.category)
        .bind(&goal.goal_type)
        .bind(&goal.unit)
        .bind(&goal.priority)
        .bind(&goal.status)
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(goal.deadline)
        .bind(goal.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn insert_debt(&self, debt: &NewDebt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO debts (
                user_id, description, category, priority, status,
                total_amount, paid_amount, due_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(debt.user_id)
        .bind(&debt.description)
        .bind(&debt.category)
        .bind(&debt.priority)
        .bind(&debt.status)
        .bind(debt.total_amount)
        .bind(debt.paid_amount)
        .bind(debt.due_date)
        .bind(debt.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
