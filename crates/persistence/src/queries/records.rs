// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookups of collaborator records the engine reads but does not own.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_domain::{
    BusinessDay, BusinessDayId, Member, MemberId, Position, PositionId, TenantId,
};

use crate::data_models::{BusinessDayRow, MemberRow, PositionRow};
use crate::diesel_schema::{business_days, members, positions, tenants};
use crate::error::PersistenceError;

backend_fn! {
/// Whether a tenant row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn tenant_exists(conn: &mut _, tenant_id: TenantId) -> Result<bool, PersistenceError> {
    let count: i64 = tenants::table
        .filter(tenants::tenant_id.eq(tenant_id.value()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Loads a member of the tenant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_member(
    conn: &mut _,
    tenant_id: TenantId,
    member_id: MemberId,
) -> Result<Option<Member>, PersistenceError> {
    let row: Option<MemberRow> = members::table
        .filter(members::tenant_id.eq(tenant_id.value()))
        .filter(members::member_id.eq(member_id.value()))
        .select(MemberRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Member::from))
}
}

backend_fn! {
/// Loads a business day of the tenant.
///
/// # Errors
///
/// Returns an error if the query fails or the stored date is malformed.
pub fn find_business_day(
    conn: &mut _,
    tenant_id: TenantId,
    business_day_id: BusinessDayId,
) -> Result<Option<BusinessDay>, PersistenceError> {
    let row: Option<BusinessDayRow> = business_days::table
        .filter(business_days::tenant_id.eq(tenant_id.value()))
        .filter(business_days::business_day_id.eq(business_day_id.value()))
        .select(BusinessDayRow::as_select())
        .first(conn)
        .optional()?;
    row.map(BusinessDayRow::into_domain).transpose()
}
}

backend_fn! {
/// Loads a position of the tenant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_position(
    conn: &mut _,
    tenant_id: TenantId,
    position_id: PositionId,
) -> Result<Option<Position>, PersistenceError> {
    let row: Option<PositionRow> = positions::table
        .filter(positions::tenant_id.eq(tenant_id.value()))
        .filter(positions::position_id.eq(position_id.value()))
        .select(PositionRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Position::from))
}
}
