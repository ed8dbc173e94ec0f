use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::Value;
use shared::{EntityKind, MigrationReport, SourceUser};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::identity_service::IdentityService;
use crate::domain::mappers;
use crate::storage::{LedgerStorage, ProductStorage, SourceStorage, UserStorage};

/// Drives one full migration run.
///
/// Users are processed strictly one at a time, and within a user the eight
/// record kinds in a fixed order. A failing record skips only itself, a
/// failing identity lookup skips only its user, and nothing already written
/// is ever rolled back. The run produces a [`MigrationReport`] with one
/// counter per kind plus every skip and its reason.
pub struct MigrationService {
    source: Arc<dyn SourceStorage>,
    identity: IdentityService,
    products: Arc<dyn ProductStorage>,
    ledger: Arc<dyn LedgerStorage>,
    /// Pause between users to bound the destination request rate. Zero
    /// disables the pause.
    pause_between_users: Duration,
}

impl MigrationService {
    pub fn new(
        source: Arc<dyn SourceStorage>,
        users: Arc<dyn UserStorage>,
        products: Arc<dyn ProductStorage>,
        ledger: Arc<dyn LedgerStorage>,
        pause_between_users: Duration,
    ) -> Self {
        Self {
            source,
            identity: IdentityService::new(users),
            products,
            ledger,
            pause_between_users,
        }
    }

    /// Run the migration to completion and return the report. Only a source
    /// read failure aborts; everything else is isolated and recorded.
    pub async fn run(&self) -> Result<MigrationReport> {
        let started = Instant::now();
        let mut report = MigrationReport::default();

        let users = self.source.load_users().await?;
        if users.is_empty() {
            info!("No users found in the source store, nothing to migrate");
            report.duration_ms = started.elapsed().as_millis() as u64;
            return Ok(report);
        }
        info!("Migrating {} users", users.len());

        for (index, user) in users.iter().enumerate() {
            self.migrate_user(user, &mut report).await;
            if index + 1 < users.len() && !self.pause_between_users.is_zero() {
                tokio::time::sleep(self.pause_between_users).await;
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        Ok(report)
    }

    async fn migrate_user(&self, user: &SourceUser, report: &mut MigrationReport) {
        info!(
            "Processing {}: {} products, {} revenues, {} expenses, {} transactions, {} dreams, {} bets, {} goals, {} debts",
            user.email,
            user.products.len(),
            user.revenues.len(),
            user.expenses.len(),
            user.transactions.len(),
            user.dreams.len(),
            user.bets.len(),
            user.goals.len(),
            user.debts.len(),
        );

        let user_id = match self.identity.resolve(user).await {
            Ok(id) => id,
            Err(e) => {
                error!("Skipping user {}: {:#}", user.email, e);
                report.record_skip(EntityKind::User, &user.email, format!("{e:#}"));
                return;
            }
        };
        report.count(EntityKind::User);

        self.migrate_products(user_id, &user.products, report).await;
        self.migrate_revenues(user_id, &user.revenues, report).await;
        self.migrate_expenses(user_id, &user.expenses, report).await;
        self.migrate_transactions(user_id, &user.transactions, report).await;
        self.migrate_dreams(user_id, &user.dreams, report).await;
        self.migrate_bets(user_id, &user.bets, report).await;
        self.migrate_goals(user_id, &user.goals, report).await;
        self.migrate_debts(user_id, &user.debts, report).await;
    }

    /// Products carry a natural dedup key, so each insert is guarded by a
    /// lookup on (user, name) and re-runs stay idempotent.
    async fn migrate_products(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let product = match mappers::map_product(user_id, raw) {
                Ok(product) => product,
                Err(e) => {
                    warn!("Skipping product '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Product, &label, format!("{e:#}"));
                    continue;
                }
            };

            match self.products.find_by_name(user_id, &product.name).await {
                Ok(Some(_)) => {
                    info!("Product '{}' already exists, skipping", product.name);
                }
                Ok(None) => match self.products.insert(&product).await {
                    Ok(()) => report.count(EntityKind::Product),
                    Err(e) => {
                        warn!("Failed to insert product '{}': {:#}", product.name, e);
                        report.record_skip(EntityKind::Product, &label, format!("{e:#}"));
                    }
                },
                Err(e) => {
                    warn!("Product lookup failed for '{}': {:#}", product.name, e);
                    report.record_skip(EntityKind::Product, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_revenues(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let revenue = match mappers::map_revenue(user_id, raw) {
                Ok(revenue) => revenue,
                Err(e) => {
                    warn!("Skipping revenue '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Revenue, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_revenue(&revenue).await {
                Ok(()) => report.count(EntityKind::Revenue),
                Err(e) => {
                    warn!("Failed to insert revenue '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Revenue, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_expenses(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let expense = match mappers::map_expense(user_id, raw) {
                Ok(expense) => expense,
                Err(e) => {
                    warn!("Skipping expense '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Expense, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_expense(&expense).await {
                Ok(()) => report.count(EntityKind::Expense),
                Err(e) => {
                    warn!("Failed to insert expense '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Expense, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_transactions(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let transaction = match mappers::map_transaction(user_id, raw) {
                Ok(transaction) => transaction,
                Err(e) => {
                    warn!("Skipping transaction '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Transaction, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_transaction(&transaction).await {
                Ok(()) => report.count(EntityKind::Transaction),
                Err(e) => {
                    warn!("Failed to insert transaction '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Transaction, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_dreams(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let dream = match mappers::map_dream(user_id, raw) {
                Ok(dream) => dream,
                Err(e) => {
                    warn!("Skipping dream '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Dream, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_dream(&dream).await {
                Ok(()) => report.count(EntityKind::Dream),
                Err(e) => {
                    warn!("Failed to insert dream '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Dream, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_bets(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let bet = match mappers::map_bet(user_id, raw) {
                Ok(bet) => bet,
                Err(e) => {
                    warn!("Skipping bet '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Bet, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_bet(&bet).await {
                Ok(()) => report.count(EntityKind::Bet),
                Err(e) => {
                    warn!("Failed to insert bet '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Bet, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_goals(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let goal = match mappers::map_goal(user_id, raw) {
                Ok(goal) => goal,
                Err(e) => {
                    warn!("Skipping goal '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Goal, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_goal(&goal).await {
                Ok(()) => report.count(EntityKind::Goal),
                Err(e) => {
                    warn!("Failed to insert goal '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Goal, &label, format!("{e:#}"));
                }
            }
        }
    }

    async fn migrate_debts(&self, user_id: Uuid, records: &[Value], report: &mut MigrationReport) {
        for raw in records {
            let label = mappers::record_label(raw);
            let debt = match mappers::map_debt(user_id, raw) {
                Ok(debt) => debt,
                Err(e) => {
                    warn!("Skipping debt '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Debt, &label, format!("{e:#}"));
                    continue;
                }
            };
            match self.ledger.insert_debt(&debt).await {
                Ok(()) => report.count(EntityKind::Debt),
                Err(e) => {
                    warn!("Failed to insert debt '{}': {:#}", label, e);
                    report.record_skip(EntityKind::Debt, &label, format!("{e:#}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{MemorySource, MemoryStore};
    use serde_json::json;
    use shared::SourceUser;

    fn service_for(
        users: Vec<SourceUser>,
        store: Arc<MemoryStore>,
    ) -> MigrationService {
        MigrationService::new(
            Arc::new(MemorySource::new(users)),
            store.clone(),
            store.clone(),
            store,
            Duration::ZERO,
        )
    }

    fn ana() -> SourceUser {
        SourceUser {
            firebase_uid: "uid-ana".to_string(),
            email: "a@x.com".to_string(),
            name: Some("Ana".to_string()),
            products: vec![json!({
                "name": "Widget",
                "purchasePrice": 10,
                "sellingPrice": 20,
                "quantity": 2
            })],
            ..SourceUser::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_single_user() {
        let store = Arc::new(MemoryStore::new());
        let service = service_for(vec![ana()], store.clone());

        let report = service.run().await.expect("Run failed");

        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@x.com");

        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(products[0].purchase_price, 10.0);
        assert_eq!(products[0].selling_price, 20.0);
        assert_eq!(products[0].quantity, 2);
        assert_eq!(products[0].quantity_sold, 0);
        assert_eq!(products[0].status, "purchased");
        assert_eq!(products[0].user_id, users[0].id);

        assert_eq!(report.users, 1);
        assert_eq!(report.products, 1);
        assert_eq!(report.revenues, 0);
        assert_eq!(report.debts, 0);
        assert!(report.skipped.is_empty());

        let summary = report.summary();
        assert!(summary.contains("Usuários migrados: 1"));
        assert!(summary.contains("Produtos migrados: 1"));
        assert!(summary.contains("Receitas migradas: 0"));
    }

    #[tokio::test]
    async fn test_empty_source_never_touches_destination() {
        let store = Arc::new(MemoryStore::new());
        let service = service_for(vec![], store.clone());

        let report = service.run().await.expect("Run failed");

        assert_eq!(report, MigrationReport { duration_ms: report.duration_ms, ..Default::default() });
        assert_eq!(store.operations(), 0);
    }

    #[tokio::test]
    async fn test_second_run_reuses_user_and_product() {
        let store = Arc::new(MemoryStore::new());

        let first = service_for(vec![ana()], store.clone()).run().await.expect("First run failed");
        let second = service_for(vec![ana()], store.clone()).run().await.expect("Second run failed");

        assert_eq!(first.products, 1);
        assert_eq!(second.products, 0);
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_product_names_collapse_within_a_run() {
        let store = Arc::new(MemoryStore::new());
        let mut user = ana();
        user.products.push(json!({"name": "Widget", "purchasePrice": 99}));

        let report = service_for(vec![user], store.clone()).run().await.expect("Run failed");

        assert_eq!(report.products, 1);
        assert_eq!(store.products().len(), 1);
        // First occurrence wins.
        assert_eq!(store.products()[0].purchase_price, 10.0);
    }

    #[tokio::test]
    async fn test_rerun_duplicates_the_kinds_without_dedup_keys() {
        let store = Arc::new(MemoryStore::new());
        let user = SourceUser {
            firebase_uid: "uid-1".to_string(),
            email: "b@x.com".to_string(),
            revenues: vec![json!({"description": "freela", "amount": 100})],
            expenses: vec![json!({"description": "aluguel", "amount": 1200})],
            transactions: vec![json!({"description": "mercado"})],
            dreams: vec![json!({"name": "viagem"})],
            bets: vec![json!({"description": "final"})],
            goals: vec![json!({"name": "reserva"})],
            debts: vec![json!({"description": "cartão"})],
            ..SourceUser::default()
        };

        service_for(vec![user.clone()], store.clone()).run().await.expect("First run failed");
        service_for(vec![user], store.clone()).run().await.expect("Second run failed");

        // Locked-in current behavior: no dedup key, so every re-run doubles
        // these seven kinds.
        assert_eq!(store.revenues().len(), 2);
        assert_eq!(store.expenses().len(), 2);
        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.dreams().len(), 2);
        assert_eq!(store.bets().len(), 2);
        assert_eq!(store.goals().len(), 2);
        assert_eq!(store.debts().len(), 2);
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_record_skips_only_itself() {
        let store = Arc::new(MemoryStore::new());
        let mut user = ana();
        user.products = vec![
            json!({"name": "Primeiro"}),
            json!("not-an-object"),
            json!({"name": "Terceiro"}),
        ];

        let report = service_for(vec![user], store.clone()).run().await.expect("Run failed");

        assert_eq!(report.products, 2);
        let names: Vec<String> = store.products().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Primeiro", "Terceiro"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, EntityKind::Product);
    }

    #[tokio::test]
    async fn test_failing_identity_lookup_skips_only_that_user() {
        let store = Arc::new(MemoryStore::with_failing_lookup("down@x.com"));
        let broken = SourceUser {
            firebase_uid: "uid-x".to_string(),
            email: "down@x.com".to_string(),
            revenues: vec![json!({"description": "perdida", "amount": 10})],
            ..SourceUser::default()
        };

        let report = service_for(vec![broken, ana()], store.clone())
            .run()
            .await
            .expect("Run failed");

        // The broken user contributes nothing, the next one is unaffected.
        assert_eq!(report.users, 1);
        assert_eq!(report.products, 1);
        assert_eq!(report.revenues, 0);
        assert!(store.revenues().is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, EntityKind::User);
        assert_eq!(report.skipped[0].label, "down@x.com");
    }

    #[tokio::test]
    async fn test_all_kinds_migrate_for_one_user() {
        let store = Arc::new(MemoryStore::new());
        let user = SourceUser {
            firebase_uid: "uid-full".to_string(),
            email: "full@x.com".to_string(),
            products: vec![json!({"name": "Widget"})],
            revenues: vec![json!({"description": "freela", "amount": "150.75"})],
            expenses: vec![json!({"description": "aluguel"})],
            transactions: vec![json!({"description": "mercado", "productId": "prod_1"})],
            dreams: vec![json!({"name": "viagem"})],
            bets: vec![json!({"description": "final", "stake": "50"})],
            goals: vec![json!({"name": "reserva"})],
            debts: vec![json!({"description": "cartão", "totalAmount": 900}), json!({"description": "financiamento"})],
            ..SourceUser::default()
        };

        let report = service_for(vec![user], store.clone()).run().await.expect("Run failed");

        assert_eq!(report.users, 1);
        assert_eq!(report.products, 1);
        assert_eq!(report.revenues, 1);
        assert_eq!(report.expenses, 1);
        assert_eq!(report.transactions, 1);
        assert_eq!(report.dreams, 1);
        assert_eq!(report.bets, 1);
        assert_eq!(report.goals, 1);
        assert_eq!(report.debts, 2);

        assert_eq!(store.revenues()[0].amount, 150.75);
        assert_eq!(store.transactions()[0].product_id.as_deref(), Some("prod_1"));
        assert_eq!(store.bets()[0].stake, 50.0);
        assert_eq!(store.debts()[0].total_amount, 900.0);
    }

    #[tokio::test]
    async fn test_empty_email_users_share_one_destination_row() {
        // Accepted behavior: empty emails all match the same lookup result.
        let store = Arc::new(MemoryStore::new());
        let first = SourceUser {
            firebase_uid: "uid-1".to_string(),
            name: Some("Sem Email 1".to_string()),
            ..SourceUser::default()
        };
        let second = SourceUser {
            firebase_uid: "uid-2".to_string(),
            name: Some("Sem Email 2".to_string()),
            ..SourceUser::default()
        };

        let report = service_for(vec![first, second], store.clone())
            .run()
            .await
            .expect("Run failed");

        assert_eq!(report.users, 2);
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.users()[0].firebase_uid.as_deref(), Some("uid-1"));
    }
}
