pub mod cache;
pub mod db;
pub mod errors;
pub mod repository;
pub mod stores;

pub use db::Database;
pub use errors::{DbError, DbResult};
pub use repository::{BlockRepository, MemoryBlockStore};
pub use stores::BlockStore;
