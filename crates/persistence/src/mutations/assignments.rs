// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment writes. Callers hold the slot transaction.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_domain::{
    AssignmentId, AssignmentStatus, NewShiftAssignment, ShiftAssignment, SlotId, TenantId,
};
use time::OffsetDateTime;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::shift_assignments;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a confirmed assignment.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_assignment(
    conn: &mut _,
    assignment: &NewShiftAssignment,
) -> Result<ShiftAssignment, PersistenceError> {
    diesel::insert_into(shift_assignments::table)
        .values((
            shift_assignments::tenant_id.eq(assignment.tenant_id.value()),
            shift_assignments::slot_id.eq(assignment.slot_id.value()),
            shift_assignments::member_id.eq(assignment.member_id.value()),
            shift_assignments::status.eq(AssignmentStatus::Confirmed.as_str()),
            shift_assignments::method.eq(assignment.method.as_str()),
            shift_assignments::is_outside_preference.eq(flag(assignment.is_outside_preference)),
            shift_assignments::note.eq(assignment.note.as_deref()),
            shift_assignments::assigned_by.eq(&assignment.assigned_by),
            shift_assignments::assigned_at.eq(format_timestamp(assignment.assigned_at)?),
        ))
        .execute(conn)?;
    let assignment_id: AssignmentId = AssignmentId::new(conn.get_last_insert_rowid()?);

    Ok(ShiftAssignment::from_new(assignment_id, assignment.clone()))
}
}

backend_fn! {
/// Sets `status = cancelled` and stamps `cancelled_at`.
///
/// Returns the number of rows changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_cancelled(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
    assignment_id: AssignmentId,
    at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(
        shift_assignments::table
            .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
            .filter(shift_assignments::slot_id.eq(slot_id.value()))
            .filter(shift_assignments::assignment_id.eq(assignment_id.value())),
    )
    .set((
        shift_assignments::status.eq(AssignmentStatus::Cancelled.as_str()),
        shift_assignments::cancelled_at.eq(Some(format_timestamp(at)?)),
    ))
    .execute(conn)?;
    Ok(updated)
}
}

backend_fn! {
/// Stamps `deleted_at` on an assignment.
///
/// Returns the number of rows changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_removed(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
    assignment_id: AssignmentId,
    at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(
        shift_assignments::table
            .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
            .filter(shift_assignments::slot_id.eq(slot_id.value()))
            .filter(shift_assignments::assignment_id.eq(assignment_id.value())),
    )
    .set(shift_assignments::deleted_at.eq(Some(format_timestamp(at)?)))
    .execute(conn)?;
    Ok(updated)
}
}
