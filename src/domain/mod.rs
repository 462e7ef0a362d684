//! Domain Layer
//!
//! Contains the bookmark entity and core abstractions.
//! This layer has NO storage or host dependencies (only serde for serialization).

mod entity;
mod item;

pub use entity::{DomainError, DomainResult, Entity};
pub use item::{Item, ItemFields, ItemList, DEFAULT_ICON};
