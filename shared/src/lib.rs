use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One user aggregate as read from the source document store.
///
/// The document id becomes `firebase_uid`; every other field is taken from
/// the document body. Timestamps were written by several app versions and
/// show up as native timestamp maps, ISO strings, epoch numbers, or not at
/// all, so they are carried as raw JSON until mapping time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceUser {
    /// Opaque source document id, injected after deserialization.
    #[serde(skip)]
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub account_type: Option<String>,
    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
    /// Embedded child collections. Absent arrays deserialize to empty so
    /// downstream code never distinguishes missing from empty.
    pub products: Vec<Value>,
    pub revenues: Vec<Value>,
    pub expenses: Vec<Value>,
    pub transactions: Vec<Value>,
    pub dreams: Vec<Value>,
    pub bets: Vec<Value>,
    pub goals: Vec<Value>,
    pub debts: Vec<Value>,
}

/// One user row in the destination relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationUser {
    /// Generated by the destination on insert.
    pub id: Uuid,
    /// Source document id. Backfilled when null, never overwritten.
    pub firebase_uid: Option<String>,
    pub email: String,
    pub name: String,
    pub avatar_url: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a destination user (the id is assigned by the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub firebase_uid: String,
    pub email: String,
    pub name: String,
    pub avatar_url: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a resale product. Unique per (user, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub description: String,
    pub notes: String,
    pub tracking_code: String,
    pub status: String,
    pub quantity: i64,
    pub quantity_sold: i64,
    pub purchase_price: f64,
    pub selling_price: f64,
    pub additional_costs: f64,
    pub roi: f64,
    pub purchase_date: DateTime<Utc>,
    pub sale_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a revenue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRevenue {
    pub user_id: Uuid,
    pub description: String,
    pub category: String,
    pub source: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for an expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub description: String,
    pub category: String,
    /// Stored in the `type` column.
    pub expense_type: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub description: String,
    pub category: String,
    /// Stored in the `type` column.
    pub transaction_type: String,
    pub status: String,
    pub amount: f64,
    pub payment_method: Option<String>,
    pub tags: Vec<String>,
    pub is_installment: bool,
    /// Opaque reference to a source product, carried verbatim.
    pub product_id: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a dream (a savings wish with a target amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDream {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    /// Stored in the `type` column.
    pub dream_type: String,
    pub status: String,
    pub priority: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a sports bet entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBet {
    pub user_id: Uuid,
    pub description: String,
    /// Stored in the `type` column.
    pub bet_type: String,
    pub status: String,
    pub stake: f64,
    pub odds: f64,
    pub potential_win: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a financial goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Stored in the `type` column.
    pub goal_type: String,
    pub unit: String,
    pub priority: String,
    pub status: String,
    pub target_value: f64,
    pub current_value: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a debt entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDebt {
    pub user_id: Uuid,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The nine migrated entity kinds, users included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Product,
    Revenue,
    Expense,
    Transaction,
    Dream,
    Bet,
    Goal,
    Debt,
}

impl EntityKind {
    /// All kinds in report order.
    pub const ALL: [EntityKind; 9] = [
        EntityKind::User,
        EntityKind::Product,
        EntityKind::Revenue,
        EntityKind::Expense,
        EntityKind::Transaction,
        EntityKind::Dream,
        EntityKind::Bet,
        EntityKind::Goal,
        EntityKind::Debt,
    ];

    /// Label used for the operator-facing summary lines.
    pub fn summary_label(&self) -> &'static str {
        match self {
            EntityKind::User => "Usuários migrados",
            EntityKind::Product => "Produtos migrados",
            EntityKind::Revenue => "Receitas migradas",
            EntityKind::Expense => "Despesas migradas",
            EntityKind::Transaction => "Transações migradas",
            EntityKind::Dream => "Sonhos migrados",
            EntityKind::Bet => "Apostas migradas",
            EntityKind::Goal => "Metas migradas",
            EntityKind::Debt => "Dívidas migradas",
        }
    }
}

/// One record (or user) that was skipped during a run, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub kind: EntityKind,
    /// Identifying field of the record (name/description) or the user email.
    pub label: String,
    pub reason: String,
}

/// Structured result of one migration run.
///
/// Returned by the orchestrator so callers and tests can assert on counts
/// directly instead of parsing log output. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub users: u32,
    pub products: u32,
    pub revenues: u32,
    pub expenses: u32,
    pub transactions: u32,
    pub dreams: u32,
    pub bets: u32,
    pub goals: u32,
    pub debts: u32,
    pub skipped: Vec<SkippedRecord>,
    pub duration_ms: u64,
}

impl MigrationReport {
    /// Increment the counter for one successfully migrated record.
    pub fn count(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::User => self.users += 1,
            EntityKind::Product => self.products += 1,
            EntityKind::Revenue => self.revenues += 1,
            EntityKind::Expense => self.expenses += 1,
            EntityKind::Transaction => self.transactions += 1,
            EntityKind::Dream => self.dreams += 1,
            EntityKind::Bet => self.bets += 1,
            EntityKind::Goal => self.goals += 1,
            EntityKind::Debt => self.debts += 1,
        }
    }

    /// Current counter value for a kind.
    pub fn count_for(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::User => self.users,
            EntityKind::Product => self.products,
            EntityKind::Revenue => self.revenues,
            EntityKind::Expense => self.expenses,
            EntityKind::Transaction => self.transactions,
            EntityKind::Dream => self.dreams,
            EntityKind::Bet => self.bets,
            EntityKind::Goal => self.goals,
            EntityKind::Debt => self.debts,
        }
    }

    /// Record a skipped record or user with the failure reason.
    pub fn record_skip(
        &mut self,
        kind: EntityKind,
        label: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.skipped.push(SkippedRecord {
            kind,
            label: label.into(),
            reason: reason.into(),
        });
    }

    /// Final tally printed at the end of a run: one line per kind plus a
    /// completion marker.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for kind in EntityKind::ALL {
            out.push_str(&format!("{}: {}\n", kind.summary_label(), self.count_for(kind)));
        }
        if !self.skipped.is_empty() {
            out.push_str(&format!("Registros ignorados: {}\n", self.skipped.len()));
        }
        out.push_str("Migração concluída!");
        out
    }
}
