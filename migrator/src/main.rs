use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Level};

use financas_migrator::config::MigratorConfig;
use financas_migrator::domain::MigrationService;
use financas_migrator::storage::firestore::{FirestoreConnection, FirestoreUserRepository};
use financas_migrator::storage::postgres::{
    DbConnection, LedgerRepository, ProductRepository, UserRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    dotenv::dotenv().ok();

    // Fails before either store is contacted.
    let config = MigratorConfig::from_env()?;

    info!("Preparing the destination database pool");
    let db = DbConnection::connect(&config.supabase_db_url)?;

    let source = Arc::new(FirestoreUserRepository::new(
        FirestoreConnection::new(&config.firebase_project_id, &config.firebase_access_token),
        &config.users_collection,
    ));
    let users = Arc::new(UserRepository::new(db.clone()));
    let products = Arc::new(ProductRepository::new(db.clone()));
    let ledger = Arc::new(LedgerRepository::new(db));

    let service = MigrationService::new(
        source,
        users,
        products,
        ledger,
        config.pause_between_users,
    );

    let report = service.run().await?;

    println!("{}", report.summary());
    Ok(())
}
