// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment reads and the roster listing.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc::{AssignmentDetail, AssignmentFilter};
use shift_alloc_domain::{
    AssignmentId, AssignmentStatus, Member, MemberId, Position, ShiftAssignment, SlotId, TenantId,
    format_date,
};

use crate::data_models::{AssignmentRow, BusinessDayRow, MemberRow, PositionRow, SlotRow};
use crate::diesel_schema::{business_days, members, positions, shift_assignments, shift_slots};
use crate::error::PersistenceError;

/// One joined listing row.
type DetailRow = (AssignmentRow, SlotRow, MemberRow, PositionRow, BusinessDayRow);

backend_fn! {
/// Loads an assignment of the tenant regardless of status.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_assignment(
    conn: &mut _,
    tenant_id: TenantId,
    assignment_id: AssignmentId,
) -> Result<Option<ShiftAssignment>, PersistenceError> {
    let row: Option<AssignmentRow> = shift_assignments::table
        .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
        .filter(shift_assignments::assignment_id.eq(assignment_id.value()))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;
    row.map(AssignmentRow::into_domain).transpose()
}
}

backend_fn! {
/// Loads an assignment only if it belongs to the given slot.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_slot_assignment(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
    assignment_id: AssignmentId,
) -> Result<Option<ShiftAssignment>, PersistenceError> {
    let row: Option<AssignmentRow> = shift_assignments::table
        .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
        .filter(shift_assignments::slot_id.eq(slot_id.value()))
        .filter(shift_assignments::assignment_id.eq(assignment_id.value()))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;
    row.map(AssignmentRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds the member's live assignment in a slot.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_live_assignment(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: SlotId,
    member_id: MemberId,
) -> Result<Option<ShiftAssignment>, PersistenceError> {
    let row: Option<AssignmentRow> = shift_assignments::table
        .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
        .filter(shift_assignments::slot_id.eq(slot_id.value()))
        .filter(shift_assignments::member_id.eq(member_id.value()))
        .filter(shift_assignments::status.eq(AssignmentStatus::Confirmed.as_str()))
        .filter(shift_assignments::deleted_at.is_null())
        .order(shift_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;
    row.map(AssignmentRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists assignments joined with their slot, member, position and day.
///
/// Removed rows are excluded unless the filter asks for them. Ordered by
/// day, slot start time, then assignment id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_assignments(
    conn: &mut _,
    tenant_id: TenantId,
    filter: &AssignmentFilter,
) -> Result<Vec<AssignmentDetail>, PersistenceError> {
    let mut query = shift_assignments::table
        .inner_join(
            shift_slots::table
                .inner_join(business_days::table)
                .inner_join(positions::table),
        )
        .inner_join(members::table)
        .filter(shift_assignments::tenant_id.eq(tenant_id.value()))
        .select((
            AssignmentRow::as_select(),
            SlotRow::as_select(),
            MemberRow::as_select(),
            PositionRow::as_select(),
            BusinessDayRow::as_select(),
        ))
        .into_boxed();

    if let Some(member_id) = filter.member_id {
        query = query.filter(shift_assignments::member_id.eq(member_id.value()));
    }
    if let Some(slot_id) = filter.slot_id {
        query = query.filter(shift_assignments::slot_id.eq(slot_id.value()));
    }
    if let Some(status) = filter.status {
        query = query.filter(shift_assignments::status.eq(status.as_str()));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(business_days::day_date.ge(format_date(from)));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(business_days::day_date.le(format_date(to)));
    }
    if !filter.include_removed {
        query = query.filter(shift_assignments::deleted_at.is_null());
    }

    let rows: Vec<DetailRow> = query
        .order((
            business_days::day_date.asc(),
            shift_slots::start_time.asc(),
            shift_assignments::assignment_id.asc(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(assignment, slot, member, position, day)| {
            Ok(AssignmentDetail::assemble(
                assignment.into_domain()?,
                &slot.into_domain()?,
                &Member::from(member),
                &Position::from(position),
                &day.into_domain()?,
            ))
        })
        .collect()
}
}
