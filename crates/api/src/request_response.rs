// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Times of day travel as `HH:MM`, calendar dates as `YYYY-MM-DD` and
//! instants as RFC 3339.

use serde::{Deserialize, Serialize};
use shift_alloc::AssignmentDetail;
use shift_alloc_domain::{
    AssignmentId, MemberId, ShiftAssignment, ShiftSlot, SlotOccupancy, format_date, format_time,
};
use shift_alloc_persistence::StoredAuditEvent;
use time::OffsetDateTime;

const fn default_priority() -> i64 {
    1
}

/// API request to create a shift slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateSlotRequest {
    /// The business day the slot belongs to.
    pub business_day_id: i64,
    /// The position being staffed.
    pub position_id: i64,
    /// The slot's display name.
    pub slot_name: String,
    /// Optional label distinguishing parallel instances of the same slot.
    #[serde(default)]
    pub instance_name: Option<String>,
    /// Window start, `HH:MM`.
    pub start_time: String,
    /// Window end, `HH:MM`. Earlier than the start for overnight slots.
    pub end_time: String,
    /// Capacity. Must be at least 1.
    pub required_count: i64,
    /// Display priority. Defaults to 1.
    #[serde(default = "default_priority")]
    pub priority: i64,
}

/// A shift slot as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub slot_id: i64,
    pub tenant_id: i64,
    pub business_day_id: i64,
    pub position_id: i64,
    pub slot_name: String,
    pub instance_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    /// The window runs past midnight into the next calendar day.
    pub ends_next_day: bool,
    pub required_count: u32,
    pub priority: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&ShiftSlot> for SlotInfo {
    fn from(slot: &ShiftSlot) -> Self {
        Self {
            slot_id: slot.slot_id().value(),
            tenant_id: slot.tenant_id().value(),
            business_day_id: slot.business_day_id().value(),
            position_id: slot.position_id().value(),
            slot_name: slot.slot_name().to_string(),
            instance_name: slot.instance_name().map(str::to_string),
            start_time: slot.window().start_str(),
            end_time: slot.window().end_str(),
            ends_next_day: slot.window().crosses_midnight(),
            required_count: slot.required_count(),
            priority: slot.priority(),
            created_at: slot.created_at(),
            deleted_at: slot.deleted_at(),
        }
    }
}

/// Live seats against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyInfo {
    pub confirmed_count: u32,
    pub required_count: u32,
    pub remaining: u32,
    pub is_full: bool,
}

impl From<SlotOccupancy> for OccupancyInfo {
    fn from(occupancy: SlotOccupancy) -> Self {
        Self {
            confirmed_count: occupancy.confirmed(),
            required_count: occupancy.required(),
            remaining: occupancy.remaining(),
            is_full: occupancy.is_full(),
        }
    }
}

/// API response for slot reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOccupancyResponse {
    pub slot: SlotInfo,
    pub occupancy: OccupancyInfo,
}

/// API response for a slot retirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetireSlotResponse {
    pub slot: SlotInfo,
    /// `false` when the slot was already retired.
    pub changed: bool,
    pub occupancy: OccupancyInfo,
}

/// API request to confirm a member into a slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmAssignmentRequest {
    pub member_id: i64,
    #[serde(default)]
    pub note: Option<String>,
    /// The member takes this shift outside their stated preferences.
    #[serde(default)]
    pub is_outside_preference: bool,
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub slot_id: i64,
    pub member_id: i64,
    pub status: String,
    pub method: String,
    pub is_outside_preference: bool,
    pub note: Option<String>,
    pub assigned_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&ShiftAssignment> for AssignmentInfo {
    fn from(assignment: &ShiftAssignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id.value(),
            slot_id: assignment.slot_id.value(),
            member_id: assignment.member_id.value(),
            status: assignment.status.as_str().to_string(),
            method: assignment.method.as_str().to_string(),
            is_outside_preference: assignment.is_outside_preference,
            note: assignment.note.clone(),
            assigned_by: assignment.assigned_by.clone(),
            assigned_at: assignment.assigned_at,
            cancelled_at: assignment.cancelled_at,
            deleted_at: assignment.deleted_at,
        }
    }
}

/// API response for a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmAssignmentResponse {
    pub assignment: AssignmentInfo,
    /// `false` when the member already held a live seat in the slot.
    pub created: bool,
    pub occupancy: OccupancyInfo,
}

/// API response for a cancellation or removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAssignmentResponse {
    pub assignment: AssignmentInfo,
    /// `false` when the call changed nothing.
    pub changed: bool,
    pub occupancy: OccupancyInfo,
}

/// Query parameters for the roster listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListAssignmentsQuery {
    pub member_id: Option<i64>,
    pub slot_id: Option<i64>,
    /// `confirmed` or `cancelled`.
    pub status: Option<String>,
    /// Inclusive lower bound on the business day, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound on the business day, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    #[serde(default)]
    pub include_removed: bool,
}

/// One roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetailInfo {
    pub assignment_id: i64,
    pub slot_id: i64,
    pub member_id: i64,
    pub member_display_name: String,
    pub status: String,
    pub method: String,
    pub is_outside_preference: bool,
    pub note: Option<String>,
    pub assigned_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    pub slot_name: String,
    pub instance_name: Option<String>,
    pub position_name: String,
    pub day_date: String,
    pub start_time: String,
    pub end_time: String,
    pub ends_next_day: bool,
}

impl From<AssignmentDetail> for AssignmentDetailInfo {
    fn from(detail: AssignmentDetail) -> Self {
        Self {
            assignment_id: detail.assignment_id.value(),
            slot_id: detail.slot_id.value(),
            member_id: detail.member_id.value(),
            member_display_name: detail.member_display_name,
            status: detail.status.as_str().to_string(),
            method: detail.method.as_str().to_string(),
            is_outside_preference: detail.is_outside_preference,
            note: detail.note,
            assigned_by: detail.assigned_by,
            assigned_at: detail.assigned_at,
            cancelled_at: detail.cancelled_at,
            deleted_at: detail.deleted_at,
            slot_name: detail.slot_name,
            instance_name: detail.instance_name,
            position_name: detail.position_name,
            day_date: format_date(detail.day_date),
            start_time: format_time(detail.start_time),
            end_time: format_time(detail.end_time),
            ends_next_day: detail.ends_next_day,
        }
    }
}

/// API response for the roster listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    pub assignments: Vec<AssignmentDetailInfo>,
}

/// Query parameters for the audit timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditTimelineQuery {
    pub slot_id: Option<i64>,
}

/// One persisted audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub event_id: i64,
    pub slot_id: i64,
    pub assignment_id: Option<i64>,
    pub member_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

impl From<StoredAuditEvent> for AuditEventInfo {
    fn from(stored: StoredAuditEvent) -> Self {
        let event = stored.event;
        Self {
            event_id: stored.event_id,
            slot_id: event.subject.slot_id.value(),
            assignment_id: event.subject.assignment_id.map(AssignmentId::value),
            member_id: event.subject.member_id.map(MemberId::value),
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            action: event.action.name().to_string(),
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
            occurred_at: event.occurred_at,
        }
    }
}

/// API response for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    pub events: Vec<AuditEventInfo>,
}
