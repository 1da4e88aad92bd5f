// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Migration application and foreign key enforcement are also exercised
//! implicitly by every other test in this crate.

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tempfile::TempDir;

use crate::error::PersistenceError;
use crate::tests::seed;
use crate::{BackendPool, Persistence};
use shift_alloc_domain::TenantId;
use time::macros::date;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let db1: Persistence = Persistence::new_in_memory().unwrap();
    let db2: Persistence = Persistence::new_in_memory().unwrap();

    let tenant: TenantId = db1.register_tenant("Harbor Club").unwrap().tenant_id;

    assert!(db1.tenant_exists(tenant).unwrap());
    assert!(
        !db2.tenant_exists(tenant).unwrap(),
        "db2 must not see tenants registered in db1"
    );
}

#[test]
fn test_foreign_keys_enforced_on_pooled_connections() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());

    let result = persistence.register_position(TenantId::new(999), "Bartender");
    assert!(
        matches!(result, Err(PersistenceError::DatabaseError(_))),
        "position of an unknown tenant must violate the foreign key, got {result:?}"
    );
}

#[test]
fn test_in_memory_database_survives_connection_reuse() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tenant: TenantId = persistence.register_tenant("Harbor Club").unwrap().tenant_id;

    for _ in 0..5 {
        assert!(persistence.tenant_exists(tenant).unwrap());
    }
}

#[test]
fn test_file_database_uses_wal_and_persists() {
    let dir: TempDir = TempDir::new().unwrap();
    let path = dir.path().join("shift-alloc.db");

    let tenant: TenantId = {
        let persistence: Persistence = Persistence::new_with_file(&path, 4).unwrap();
        assert_eq!(persistence.backend_name(), "sqlite");

        let BackendPool::Sqlite(pool) = &persistence.pool else {
            panic!("file database must use the SQLite pool");
        };
        let mode: JournalMode = diesel::sql_query("PRAGMA journal_mode")
            .get_result(&mut pool.get().unwrap())
            .unwrap();
        assert_eq!(mode.journal_mode.to_lowercase(), "wal");

        seed(&persistence, "Harbor Club", date!(2026 - 03 - 14)).tenant
    };

    let reopened: Persistence = Persistence::new_with_file(&path, 4).unwrap();
    assert!(reopened.tenant_exists(tenant).unwrap());
}
