// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module contains SQLite-specific pooling, initialization, migration
//! and locking helpers that cannot be expressed in backend-agnostic Diesel DSL.
//!
//! ## Backend-Specific Code
//!
//! This module is limited to:
//! - Connection pool construction and per-connection setup (PRAGMA statements)
//! - Migration execution
//! - SQLite-specific workarounds (e.g., `last_insert_rowid()`)
//! - The slot row read that runs under `BEGIN IMMEDIATE`
//!
//! All domain queries and mutations must remain backend-agnostic
//! and live in `queries/` or `mutations/` modules.

use std::time::Duration;

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_types::{BigInt, Integer};
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::diesel_schema::shift_slots;
use crate::error::PersistenceError;

/// SQLite-specific migrations.
///
/// These migrations use `SQLite` syntax and are the default for development
/// and standard testing.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Pool of `SQLite` connections.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Helper row struct for PRAGMA queries.
///
/// This is a justified use of raw SQL as Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Applies the per-connection settings every pooled connection needs.
///
/// `foreign_keys` and `busy_timeout` are connection-scoped in `SQLite`, so
/// they must be set on each connection the pool opens, not once per database.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSetup;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Helper function to get the last inserted row ID.
///
/// `SQLite` doesn't support `RETURNING` clauses in all contexts,
/// so we must query `last_insert_rowid()`.
///
/// This is a justified use of raw SQL as Diesel has no direct API for this.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Builds a pool for the given `SQLite` URL, migrates the schema and checks
/// foreign key enforcement.
///
/// A shared-cache in-memory database lives only while one of its
/// connections is open, so `keep_alive` pins one connection for the pool's
/// lifetime and disables idle reaping.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or migration fails.
pub fn initialize_pool(
    database_url: &str,
    max_size: u32,
    keep_alive: bool,
) -> Result<SqlitePool, PersistenceError> {
    info!(database_url, max_size, "Initializing SQLite connection pool");

    let manager: ConnectionManager<SqliteConnection> = ConnectionManager::new(database_url);
    let mut builder = SqlitePool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionSetup));
    if keep_alive {
        builder = builder
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool: SqlitePool = builder
        .build(manager)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    verify_foreign_key_enforcement(&mut conn)?;

    Ok(pool)
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// WAL lets readers proceed while a slot transaction holds the write lock.
/// The setting is persistent for the database file.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    debug!("SQLite WAL mode enabled");
    Ok(())
}

/// Reads the slot row inside an immediate transaction.
///
/// `SQLite` has no row locks. `BEGIN IMMEDIATE` already holds the
/// database-wide write lock, so this only confirms the row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn lock_slot_row(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    slot_id: i64,
) -> Result<bool, PersistenceError> {
    let found: Option<i64> = shift_slots::table
        .filter(shift_slots::tenant_id.eq(tenant_id))
        .filter(shift_slots::slot_id.eq(slot_id))
        .select(shift_slots::slot_id)
        .first::<i64>(conn)
        .optional()?;
    Ok(found.is_some())
}
