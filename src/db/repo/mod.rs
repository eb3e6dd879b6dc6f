//! Repository layer for the snapshot store.
//!
//! Methods are organized across submodules by domain:
//! - `tenant.rs` - Tenant profile, tax, delivery, and platform-fee settings
//! - `catalog.rs` - Menu items, option definitions, applied option rules,
//!   and snapshot assembly

mod catalog;
mod tenant;

use sqlx::sqlite::SqlitePool;

/// A tenant's identity row: name, postal address, currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantProfile {
    pub name: String,
    pub address: String,
    pub currency: String,
    pub currency_symbol: String,
}

/// Repository for snapshot reads and configuration writes.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
