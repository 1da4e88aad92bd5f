// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration of collaborator records.
//!
//! Tenants, members, business days and positions are owned by other
//! services sharing the schema. These writes exist so fixtures and tooling
//! can seed them.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_domain::{
    BusinessDay, BusinessDayId, Member, MemberId, Position, PositionId, Tenant, TenantId,
    format_date, normalize_optional_name, validate_name,
};
use time::Date;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::flag;
use crate::diesel_schema::{business_days, members, positions, tenants};
use crate::error::PersistenceError;

backend_fn! {
/// Registers a tenant.
///
/// # Errors
///
/// Returns an error if the name is blank or the insert fails.
pub fn register_tenant(conn: &mut _, name: &str) -> Result<Tenant, PersistenceError> {
    let name: String = validate_name("tenant name", name)?;

    diesel::insert_into(tenants::table)
        .values(tenants::name.eq(&name))
        .execute(conn)?;
    let tenant_id: TenantId = TenantId::new(conn.get_last_insert_rowid()?);

    debug!(%tenant_id, "Registered tenant");
    Ok(Tenant { tenant_id, name })
}
}

backend_fn! {
/// Registers a member of a tenant.
///
/// # Errors
///
/// Returns an error if the name is blank or the insert fails.
pub fn register_member(
    conn: &mut _,
    tenant_id: TenantId,
    display_name: &str,
    is_active: bool,
) -> Result<Member, PersistenceError> {
    let display_name: String = validate_name("display_name", display_name)?;

    diesel::insert_into(members::table)
        .values((
            members::tenant_id.eq(tenant_id.value()),
            members::display_name.eq(&display_name),
            members::is_active.eq(flag(is_active)),
        ))
        .execute(conn)?;
    let member_id: MemberId = MemberId::new(conn.get_last_insert_rowid()?);

    debug!(%tenant_id, %member_id, "Registered member");
    Ok(Member {
        member_id,
        tenant_id,
        display_name,
        is_active,
    })
}
}

backend_fn! {
/// Activates or deactivates a member.
///
/// Returns whether a row of the tenant was updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_member_active(
    conn: &mut _,
    tenant_id: TenantId,
    member_id: MemberId,
    is_active: bool,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        members::table
            .filter(members::tenant_id.eq(tenant_id.value()))
            .filter(members::member_id.eq(member_id.value())),
    )
    .set(members::is_active.eq(flag(is_active)))
    .execute(conn)?;
    Ok(updated > 0)
}
}

backend_fn! {
/// Registers a business day of a tenant.
///
/// # Errors
///
/// Returns an error if the label is too long, the day already exists for
/// the tenant, or the insert fails.
pub fn register_business_day(
    conn: &mut _,
    tenant_id: TenantId,
    day_date: Date,
    label: Option<&str>,
) -> Result<BusinessDay, PersistenceError> {
    let label: Option<String> = normalize_optional_name("label", label)?;

    diesel::insert_into(business_days::table)
        .values((
            business_days::tenant_id.eq(tenant_id.value()),
            business_days::day_date.eq(format_date(day_date)),
            business_days::label.eq(label.as_deref()),
        ))
        .execute(conn)?;
    let business_day_id: BusinessDayId = BusinessDayId::new(conn.get_last_insert_rowid()?);

    debug!(%tenant_id, %business_day_id, %day_date, "Registered business day");
    Ok(BusinessDay {
        business_day_id,
        tenant_id,
        day_date,
        label,
    })
}
}

backend_fn! {
/// Registers a position of a tenant.
///
/// # Errors
///
/// Returns an error if the name is blank, already used in the tenant, or
/// the insert fails.
pub fn register_position(
    conn: &mut _,
    tenant_id: TenantId,
    position_name: &str,
) -> Result<Position, PersistenceError> {
    let position_name: String = validate_name("position_name", position_name)?;

    diesel::insert_into(positions::table)
        .values((
            positions::tenant_id.eq(tenant_id.value()),
            positions::position_name.eq(&position_name),
        ))
        .execute(conn)?;
    let position_id: PositionId = PositionId::new(conn.get_last_insert_rowid()?);

    debug!(%tenant_id, %position_id, "Registered position");
    Ok(Position {
        position_id,
        tenant_id,
        position_name,
    })
}
}
