//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! any Postgres executor as the first argument: a pool, or the connection of
//! an open transaction when several writes must commit together.

pub mod command_history_repo;
pub mod command_repo;
pub mod ontology_repo;
pub mod project_repo;
pub mod property_repo;
pub mod stack_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use command_history_repo::CommandHistoryRepo;
pub use command_repo::CommandRepo;
pub use ontology_repo::OntologyRepo;
pub use project_repo::ProjectRepo;
pub use property_repo::PropertyRepo;
pub use stack_repo::StackRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
