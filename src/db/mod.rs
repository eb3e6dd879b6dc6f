//! SQLite-backed tenant configuration and catalog snapshot store.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for snapshot reads and configuration writes

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
