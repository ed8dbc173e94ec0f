//! In-memory implementations of the storage traits.
//!
//! These back the test suites: a `MemorySource` seeded with aggregates and a
//! `MemoryStore` standing in for the whole destination database. The store
//! counts every operation so tests can assert the destination was never
//! touched, and can be told to fail lookups for a given email to exercise
//! the user-level skip path.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use shared::{
    DestinationUser, NewBet, NewDebt, NewDream, NewExpense, NewGoal, NewProduct, NewRevenue,
    NewTransaction, NewUser, SourceUser,
};
use uuid::Uuid;

use crate::storage::traits::{LedgerStorage, ProductStorage, SourceStorage, UserStorage};

/// Source store serving a fixed list of user aggregates.
#[derive(Default)]
pub struct MemorySource {
    users: Vec<SourceUser>,
}

impl MemorySource {
    pub fn new(users: Vec<SourceUser>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl SourceStorage for MemorySource {
    async fn load_users(&self) -> Result<Vec<SourceUser>> {
        Ok(self.users.clone())
    }
}

/// Destination store holding every written row in memory.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<DestinationUser>>,
    products: Mutex<Vec<(Uuid, NewProduct)>>,
    revenues: Mutex<Vec<NewRevenue>>,
    expenses: Mutex<Vec<NewExpense>>,
    transactions: Mutex<Vec<NewTransaction>>,
    dreams: Mutex<Vec<NewDream>>,
    bets: Mutex<Vec<NewBet>>,
    goals: Mutex<Vec<NewGoal>>,
    debts: Mutex<Vec<NewDebt>>,
    failing_emails: HashSet<String>,
    operations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose user lookup fails for the given email, simulating the
    /// destination being unreachable for that call.
    pub fn with_failing_lookup(email: &str) -> Self {
        Self {
            failing_emails: HashSet::from([email.to_string()]),
            ..Self::default()
        }
    }

    /// Total trait-method calls made against this store.
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn users(&self) -> Vec<DestinationUser> {
        self.users.lock().unwrap().clone()
    }

    pub fn products(&self) -> Vec<NewProduct> {
        self.products.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn revenues(&self) -> Vec<NewRevenue> {
        self.revenues.lock().unwrap().clone()
    }

    pub fn expenses(&self) -> Vec<NewExpense> {
        self.expenses.lock().unwrap().clone()
    }

    pub fn transactions(&self) -> Vec<NewTransaction> {
        self.transactions.lock().unwrap().clone()
    }

    pub fn dreams(&self) -> Vec<NewDream> {
        self.dreams.lock().unwrap().clone()
    }

    pub fn bets(&self) -> Vec<NewBet> {
        self.bets.lock().unwrap().clone()
    }

    pub fn goals(&self) -> Vec<NewGoal> {
        self.goals.lock().unwrap().clone()
    }

    pub fn debts(&self) -> Vec<NewDebt> {
        self.debts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStorage for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<DestinationUser>> {
        self.touch();
        if self.failing_emails.contains(email) {
            return Err(anyhow!("destination unreachable"));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<DestinationUser> {
        self.touch();
        let created = DestinationUser {
            id: Uuid::new_v4(),
            firebase_uid: Some(user.firebase_uid.clone()),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            account_type: user.account_type.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn set_firebase_uid(&self, id: Uuid, firebase_uid: &str) -> Result<()> {
        self.touch();
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if user.firebase_uid.as_deref().map_or(true, str::is_empty) {
                user.firebase_uid = Some(firebase_uid.to_string());
                user.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStorage for MemoryStore {
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<Uuid>> {
        self.touch();
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|(_, p)| p.user_id == user_id && p.name == name)
            .map(|(id, _)| *id))
    }

    async fn insert(&self, product: &NewProduct) -> Result<()> {
        self.touch();
        self.products
            .lock()
            .unwrap()
            .push((Uuid::new_v4(), product.clone()));
        Ok(())
    }
}

#[async_trait]
impl LedgerStorage for MemoryStore {
    async fn insert_revenue(&self, revenue: &NewRevenue) -> Result<()> {
        self.touch();
        self.revenues.lock().unwrap().push(revenue.clone());
        Ok(())
    }

    async fn insert_expense(&self, expense: &NewExpense) -> Result<()> {
        self.touch();
        self.expenses.lock().unwrap().push(expense.clone());
        Ok(())
    }

    async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        self.touch();
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn insert_dream(&self, dream: &NewDream) -> Result<()> {
        self.touch();
        self.dreams.lock().unwrap().push(dream.clone());
        Ok(())
    }

    async fn insert_bet(&self, bet: &NewBet) -> Result<()> {
        self.touch();
        self.bets.lock().unwrap().push(bet.clone());
        Ok(())
    }

    async fn insert_goal(&self, goal: &NewGoal) -> Result<()> {
        self.touch();
        self.goals.lock().unwrap().push(goal.clone());
        Ok(())
    }

    async fn insert_debt(&self, debt: &NewDebt) -> Result<()> {
        self.touch();
        self.debts.lock().unwrap().push(debt.clone());
        Ok(())
    }
}
