//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod item_repo;
mod item_store;
mod kv;
mod traits;


pub use db::{init_db, SqliteKv};
pub use item_repo::ItemRepository;
pub use item_store::{ItemStore, STORAGE_KEY};
pub use kv::{KeyValueStore, MemoryKv};
pub use traits::Repository;
