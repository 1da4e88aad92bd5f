// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! ## Purpose
//!
//! This module provides pooling, initialization, validation and row locking
//! for MySQL/MariaDB database backends.
//!
//! ## Usage
//!
//! `MySQL` is selected at startup with `--mysql-url`. Its behaviour is
//! validated by tests marked with `#[ignore]`, executed only via
//! `cargo xtask test-mariadb`, which:
//!
//! 1. Starts a `MariaDB` container via Docker
//! 2. Sets required environment variables (`DATABASE_URL`, `SHIFT_ALLOC_TEST_BACKEND`)
//! 3. Runs ignored tests explicitly
//! 4. Stops and removes the container
//!
//! ## Compilation Requirements
//!
//! `MySQL` support is compiled by default (no feature flags).
//! Compilation requires:
//!
//! - `MySQL` client development libraries (`libmysqlclient-dev` or equivalent)
//! - `pkg-config` for library detection
//!
//! ## Schema Parity
//!
//! `MYSQL_MIGRATIONS` embeds `migrations_mysql/`, which must stay
//! schema-equivalent to the `SQLite` migrations in `migrations/`: same
//! tables, columns, nullability, checks, foreign keys and indexes. Change
//! both directories together.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Integer};
use diesel::{MysqlConnection, QueryableByName};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::diesel_schema::shift_slots;
use crate::error::PersistenceError;

/// `MySQL`-specific migrations.
///
/// These migrations are functionally equivalent to the `SQLite` migrations
/// but use `MySQL`-compatible syntax (e.g., `AUTO_INCREMENT` instead of
/// `AUTOINCREMENT`, `VARCHAR` instead of `TEXT` for indexed columns).
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Pool of `MySQL` connections.
pub type MysqlPool = Pool<ConnectionManager<MysqlConnection>>;

/// Result type for foreign key check query.
#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Helper function to get the last inserted row ID.
///
/// `MySQL` supports `LAST_INSERT_ID()` to retrieve the auto-increment ID
/// of the most recently inserted row on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// Builds a pool for the given `MySQL` URL, migrates the schema and checks
/// foreign key enforcement.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or migration fails.
pub fn initialize_pool(database_url: &str, max_size: u32) -> Result<MysqlPool, PersistenceError> {
    info!(max_size, "Initializing MySQL connection pool");

    let manager: ConnectionManager<MysqlConnection> = ConnectionManager::new(database_url);
    let pool: MysqlPool = MysqlPool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    verify_foreign_key_enforcement(&mut conn)?;

    Ok(pool)
}

/// Run pending migrations on the provided `MySQL` connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verify that foreign key enforcement is enabled on `MySQL`.
///
/// `MySQL` enforces foreign keys by default when using `InnoDB` engine.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    // NOTE: This is raw SQL (justified - Diesel has no system variable query DSL)
    let result: Result<ForeignKeyCheck, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(check) => {
            if check.fk_checks == 1 {
                info!("MySQL foreign key enforcement is enabled");
                Ok(())
            } else {
                Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
            }
        }
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}

/// Locks the slot row with `SELECT ... FOR UPDATE`.
///
/// The lock is held until the enclosing transaction ends. Writers of other
/// slots are not blocked.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn lock_slot_row(
    conn: &mut MysqlConnection,
    tenant_id: i64,
    slot_id: i64,
) -> Result<bool, PersistenceError> {
    let locked: Vec<i64> = shift_slots::table
        .filter(shift_slots::tenant_id.eq(tenant_id))
        .filter(shift_slots::slot_id.eq(slot_id))
        .select(shift_slots::slot_id)
        .for_update()
        .load::<i64>(conn)?;
    Ok(!locked.is_empty())
}
