// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes and column encodings shared by queries and mutations.
//!
//! Dates are stored as `YYYY-MM-DD`, times of day as `HH:MM` and instants
//! as RFC 3339 text in UTC. All three sort correctly as strings, which the
//! listing order and date range filters rely on.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use shift_alloc_audit::AuditEvent;
use shift_alloc_domain::{
    AssignmentId, AssignmentMethod, AssignmentStatus, BusinessDay, BusinessDayId, Member, MemberId,
    NewShiftSlot, Position, PositionId, ShiftAssignment, ShiftSlot, ShiftWindow, SlotId, TenantId,
    parse_date,
};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{business_days, members, positions, shift_assignments, shift_slots};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// An audit event as read back from the log, with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEvent {
    pub event_id: i64,
    pub event: AuditEvent,
}

/// Encodes an instant as RFC 3339 text in UTC.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Decodes an instant written by [`format_timestamp`].
///
/// # Errors
///
/// Returns an error if the stored text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{value}': {e}"))
    })
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

/// Stored 0/1 flag.
#[must_use]
pub fn flag(value: bool) -> i32 {
    i32::from(value)
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = shift_slots)]
pub struct SlotRow {
    pub slot_id: i64,
    pub tenant_id: i64,
    pub business_day_id: i64,
    pub position_id: i64,
    pub slot_name: String,
    pub instance_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub required_count: i32,
    pub priority: i32,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl SlotRow {
    /// Rebuilds the domain slot, re-validating every column.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value violates the slot rules.
    pub fn into_domain(self) -> Result<ShiftSlot, PersistenceError> {
        let window: ShiftWindow = ShiftWindow::parse(&self.start_time, &self.end_time)?;
        let attributes: NewShiftSlot = NewShiftSlot::new(
            TenantId::new(self.tenant_id),
            BusinessDayId::new(self.business_day_id),
            PositionId::new(self.position_id),
            &self.slot_name,
            self.instance_name.as_deref(),
            window,
            i64::from(self.required_count),
            i64::from(self.priority),
        )?;

        Ok(ShiftSlot::from_new(
            SlotId::new(self.slot_id),
            attributes,
            parse_timestamp(&self.created_at)?,
            parse_optional_timestamp(self.deleted_at.as_deref())?,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = shift_assignments)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub tenant_id: i64,
    pub slot_id: i64,
    pub member_id: i64,
    pub status: String,
    pub method: String,
    pub is_outside_preference: i32,
    pub note: Option<String>,
    pub assigned_by: String,
    pub assigned_at: String,
    pub cancelled_at: Option<String>,
    pub deleted_at: Option<String>,
}

impl AssignmentRow {
    /// Rebuilds the domain assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the status, method or a timestamp is malformed.
    pub fn into_domain(self) -> Result<ShiftAssignment, PersistenceError> {
        let status: AssignmentStatus = self.status.parse()?;
        let method: AssignmentMethod = self.method.parse()?;

        Ok(ShiftAssignment {
            assignment_id: AssignmentId::new(self.assignment_id),
            tenant_id: TenantId::new(self.tenant_id),
            slot_id: SlotId::new(self.slot_id),
            member_id: MemberId::new(self.member_id),
            status,
            method,
            is_outside_preference: self.is_outside_preference != 0,
            note: self.note,
            assigned_by: self.assigned_by,
            assigned_at: parse_timestamp(&self.assigned_at)?,
            cancelled_at: parse_optional_timestamp(self.cancelled_at.as_deref())?,
            deleted_at: parse_optional_timestamp(self.deleted_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = members)]
pub struct MemberRow {
    pub member_id: i64,
    pub tenant_id: i64,
    pub display_name: String,
    pub is_active: i32,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            member_id: MemberId::new(row.member_id),
            tenant_id: TenantId::new(row.tenant_id),
            display_name: row.display_name,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = business_days)]
pub struct BusinessDayRow {
    pub business_day_id: i64,
    pub tenant_id: i64,
    pub day_date: String,
    pub label: Option<String>,
}

impl BusinessDayRow {
    /// Rebuilds the domain business day.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored date is malformed.
    pub fn into_domain(self) -> Result<BusinessDay, PersistenceError> {
        Ok(BusinessDay {
            business_day_id: BusinessDayId::new(self.business_day_id),
            tenant_id: TenantId::new(self.tenant_id),
            day_date: parse_date(&self.day_date)?,
            label: self.label,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = positions)]
pub struct PositionRow {
    pub position_id: i64,
    pub tenant_id: i64,
    pub position_name: String,
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Self {
            position_id: PositionId::new(row.position_id),
            tenant_id: TenantId::new(row.tenant_id),
            position_name: row.position_name,
        }
    }
}

/// Narrows a stored count to the domain's unsigned width.
///
/// # Errors
///
/// Returns an error if the count is negative or too large.
pub fn count_to_u32(count: i64) -> Result<u32, PersistenceError> {
    count
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("count out of range: {count}")))
}

/// Widens a domain count for an `INTEGER` column.
///
/// # Errors
///
/// Returns an error if the value does not fit the column.
pub fn u32_to_column(value: u32) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::SerializationError(format!("value out of range: {value}")))
}
