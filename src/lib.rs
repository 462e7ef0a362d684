//! Bookmarks Backend
//!
//! Layered architecture:
//! - domain: the bookmark entity and its list
//! - repository: key/value persistence and the item store
//! - commands: list presenter and item editor the host UI drives
//! - config: data directory and user settings

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;
