// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot creation and retirement.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_domain::{NewShiftSlot, ShiftSlot, SlotId, TenantId};
use time::OffsetDateTime;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, u32_to_column};
use crate::diesel_schema::shift_slots;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a validated slot.
///
/// # Errors
///
/// Returns an error if the insert fails, including a foreign key violation
/// when the business day or position row is gone.
pub fn insert_slot(
    conn: &mut _,
    slot: &NewShiftSlot,
    created_at: OffsetDateTime,
) -> Result<ShiftSlot, PersistenceError> {
    let window = slot.window();

    diesel::insert_into(shift_slots::table)
        .values((
            shift_slots::tenant_id.eq(slot.tenant_id().value()),
            shift_slots::business_day_id.eq(slot.business_day_id().value()),
            shift_slots::position_id.eq(slot.position_id().value()),
            shift_slots::slot_name.eq(slot.slot_name()),
            shift_slots::instance_name.eq(slot.instance_name()),
            shift_slots::start_time.eq(window.start_str()),
            shift_slots::end_time.eq(window.end_str()),
            shift_slots::required_count.eq(u32_to_column(slot.required_count())?),
            shift_slots::priority.eq(u32_to_column(slot.priority())?),
            shift_slots::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;
    let slot_id: SlotId = SlotId::new(conn.get_last_insert_rowid()?);

    Ok(ShiftSlot::from_new(slot_id, slot.clone(), created_at, None))
}
}

backend_fn! {
/// Stamps `deleted_at` on a slot that is not yet retired.
///
/// Returns the number of rows changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn retire_slot(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
    at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(
        shift_slots::table
            .filter(shift_slots::tenant_id.eq(tenant_id.value()))
            .filter(shift_slots::slot_id.eq(slot_id.value()))
            .filter(shift_slots::deleted_at.is_null()),
    )
    .set(shift_slots::deleted_at.eq(Some(format_timestamp(at)?)))
    .execute(conn)?;
    Ok(updated)
}
}
