pub mod ledger_repository;
pub mod product_repository;
pub mod user_repository;

pub use ledger_repository::LedgerRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
