// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot reads and live-assignment counts.
//!
//! The same functions serve locked and unlocked callers. Only a count taken
//! inside a slot transaction may decide admission.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_domain::{AssignmentStatus, ShiftSlot, SlotId, TenantId};

use crate::data_models::{SlotRow, count_to_u32};
use crate::diesel_schema::{shift_assignments, shift_slots};
use crate::error::PersistenceError;

backend_fn! {
/// Loads a slot of the tenant, retired or not.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_slot(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
) -> Result<Option<ShiftSlot>, PersistenceError> {
    let row: Option<SlotRow> = shift_slots::table
        .filter(shift_slots::tenant_id.eq(tenant_id.value()))
        .filter(shift_slots::slot_id.eq(slot_id.value()))
        .select(SlotRow::as_select())
        .first(conn)
        .optional()?;
    row.map(SlotRow::into_domain).transpose()
}
}

backend_fn! {
/// Counts confirmed, non-removed assignments in a slot.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_live_assignments(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
) -> Result<u32, PersistenceError> {
    let count: i64 = shift_assignments::table
        .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
        .filter(shift_assignments::slot_id.eq(slot_id.value()))
        .filter(shift_assignments::status.eq(AssignmentStatus::Confirmed.as_str()))
        .filter(shift_assignments::deleted_at.is_null())
        .count()
        .get_result(conn)?;
    count_to_u32(count)
}
}
