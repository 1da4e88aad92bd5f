// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration, pooling
//! and locking code that cannot be expressed in backend-agnostic Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! ## Slot Serialization
//!
//! Capacity admission for a slot runs inside a write transaction that holds
//! the slot row's lock. The two backends get there differently:
//!
//! - `SQLite` opens the transaction with `BEGIN IMMEDIATE`, which takes the
//!   database-wide write lock up front. Concurrent writers wait on the
//!   connection's busy timeout.
//! - `MySQL`/`MariaDB` open a normal `InnoDB` transaction and read the slot
//!   row with `SELECT ... FOR UPDATE`, which blocks writers of that slot only.
//!
//! All domain queries and mutations live in `queries/` and `mutations/`
//! modules and must work across all supported backends.

pub mod mysql;
pub mod sqlite;

use diesel::r2d2::{ManageConnection, Pool, PooledConnection};
use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Checks a connection out of a pool.
///
/// # Errors
///
/// Returns `PersistenceError::PoolError` if no connection becomes available
/// within the pool's timeout.
pub fn checkout<M: ManageConnection>(
    pool: &Pool<M>,
) -> Result<PooledConnection<M>, PersistenceError> {
    Ok(pool.get()?)
}

/// Trait for backend-specific operations.
///
/// This trait is implemented for both `SqliteConnection` and `MysqlConnection`,
/// allowing the slot transaction plumbing to stay backend-neutral while the
/// locking strategy differs.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs `f` inside a transaction that already holds write intent.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error after rolling back, or the error raised while
    /// beginning or committing.
    fn write_transaction<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>;

    /// Takes the row lock on one slot inside the current write transaction.
    ///
    /// Returns `false` when no such slot exists for the tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_slot_row(&mut self, tenant_id: i64, slot_id: i64) -> Result<bool, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        self.immediate_transaction(f)
    }

    fn lock_slot_row(&mut self, tenant_id: i64, slot_id: i64) -> Result<bool, PersistenceError> {
        sqlite::lock_slot_row(self, tenant_id, slot_id)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        self.transaction(f)
    }

    fn lock_slot_row(&mut self, tenant_id: i64, slot_id: i64) -> Result<bool, PersistenceError> {
        mysql::lock_slot_row(self, tenant_id, slot_id)
    }
}
