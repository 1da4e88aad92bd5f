// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side models for assignment listings.
//!
//! Listings take no locks and are never consulted for admission.

use shift_alloc_domain::{
    AssignmentId, AssignmentMethod, AssignmentStatus, BusinessDay, DomainError, Member, MemberId,
    Position, ShiftAssignment, ShiftSlot, SlotId,
};
use time::{Date, OffsetDateTime, Time};

/// Narrowing options for [`crate::AllocationStore::list_assignments`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub member_id: Option<MemberId>,
    pub slot_id: Option<SlotId>,
    pub status: Option<AssignmentStatus>,
    /// Inclusive lower bound on the business day.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the business day.
    pub date_to: Option<Date>,
    /// Include administratively removed rows.
    pub include_removed: bool,
}

impl AssignmentFilter {
    /// Rejects inverted date ranges.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` when `date_to < date_from`.
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) if to < from => Err(DomainError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Whether a business day falls inside the requested range.
    #[must_use]
    pub fn includes_day(&self, day: Date) -> bool {
        self.date_from.is_none_or(|from| day >= from) && self.date_to.is_none_or(|to| day <= to)
    }

    /// Whether an assignment row passes the status, member, slot and removal
    /// filters. The date range is checked separately against its slot's day.
    #[must_use]
    pub fn matches(&self, assignment: &ShiftAssignment) -> bool {
        (self.include_removed || assignment.deleted_at.is_none())
            && self.status.is_none_or(|s| assignment.status == s)
            && self.member_id.is_none_or(|m| assignment.member_id == m)
            && self.slot_id.is_none_or(|s| assignment.slot_id == s)
    }
}

/// An assignment joined with everything a roster view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDetail {
    pub assignment_id: AssignmentId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub member_display_name: String,
    pub status: AssignmentStatus,
    pub method: AssignmentMethod,
    pub is_outside_preference: bool,
    pub note: Option<String>,
    pub assigned_by: String,
    pub assigned_at: OffsetDateTime,
    pub cancelled_at: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
    pub slot_name: String,
    pub instance_name: Option<String>,
    pub position_name: String,
    pub day_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    /// The slot's window runs past midnight.
    pub ends_next_day: bool,
}

impl AssignmentDetail {
    /// Joins one assignment with its related records.
    #[must_use]
    pub fn assemble(
        assignment: ShiftAssignment,
        slot: &ShiftSlot,
        member: &Member,
        position: &Position,
        day: &BusinessDay,
    ) -> Self {
        let window = slot.window();
        Self {
            assignment_id: assignment.assignment_id,
            slot_id: assignment.slot_id,
            member_id: assignment.member_id,
            member_display_name: member.display_name.clone(),
            status: assignment.status,
            method: assignment.method,
            is_outside_preference: assignment.is_outside_preference,
            note: assignment.note,
            assigned_by: assignment.assigned_by,
            assigned_at: assignment.assigned_at,
            cancelled_at: assignment.cancelled_at,
            deleted_at: assignment.deleted_at,
            slot_name: slot.slot_name().to_string(),
            instance_name: slot.instance_name().map(str::to_string),
            position_name: position.position_name.clone(),
            day_date: day.day_date,
            start_time: window.start(),
            end_time: window.end(),
            ends_next_day: window.crosses_midnight(),
        }
    }
}

/// Orders a listing by day, slot start time, then assignment id.
pub fn sort_details(details: &mut [AssignmentDetail]) {
    details.sort_by(|a, b| {
        a.day_date
            .cmp(&b.day_date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.assignment_id.cmp(&b.assignment_id))
    });
}
