//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for data access.
//! Implementations decide how entities are persisted.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// List all entities in display order
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// Create a new entity from its fields, assigning a fresh ID
    async fn create(&self, fields: T::Fields) -> DomainResult<T>;

    /// Replace the fields of an existing entity.
    /// `Ok(None)` when no entity has that ID.
    async fn update(&self, id: &T::Id, fields: T::Fields) -> DomainResult<Option<T>>;

    /// Delete entity by ID. `Ok(false)` when no entity had that ID.
    async fn delete(&self, id: &T::Id) -> DomainResult<bool>;
}
