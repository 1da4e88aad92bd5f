// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift assignments and their lifecycle.
//!
//! An assignment is created `confirmed`. It leaves the live set either by
//! cancellation (member release, `status = cancelled`) or by administrative
//! removal (`deleted_at` stamped). Rows are never physically deleted.

use crate::error::DomainError;
use crate::ids::{AssignmentId, MemberId, SlotId, TenantId};
use crate::validation::{MAX_NOTE_LENGTH, validate_name};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Assignment status as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Confirmed,
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// How an assignment was produced. Only manual confirmation exists today;
/// `auto` is reserved for rows written by an external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    Manual,
    Auto,
}

impl AssignmentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for AssignmentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            _ => Err(DomainError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// A validated assignment about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShiftAssignment {
    pub tenant_id: TenantId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub method: AssignmentMethod,
    pub is_outside_preference: bool,
    pub note: Option<String>,
    pub assigned_by: String,
    pub assigned_at: OffsetDateTime,
}

impl NewShiftAssignment {
    /// Builds a manual confirmation.
    ///
    /// The note is trimmed and a blank note is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `assigned_by` is blank or the note exceeds
    /// [`MAX_NOTE_LENGTH`] characters.
    pub fn manual(
        tenant_id: TenantId,
        slot_id: SlotId,
        member_id: MemberId,
        assigned_by: &str,
        note: Option<&str>,
        is_outside_preference: bool,
        assigned_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let note: Option<String> = match note.map(str::trim) {
            None | Some("") => None,
            Some(text) if text.chars().count() > MAX_NOTE_LENGTH => {
                return Err(DomainError::NoteTooLong {
                    max: MAX_NOTE_LENGTH,
                });
            }
            Some(text) => Some(text.to_string()),
        };

        Ok(Self {
            tenant_id,
            slot_id,
            member_id,
            method: AssignmentMethod::Manual,
            is_outside_preference,
            note,
            assigned_by: validate_name("assigned_by", assigned_by)?,
            assigned_at,
        })
    }
}

/// A persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub assignment_id: AssignmentId,
    pub tenant_id: TenantId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub status: AssignmentStatus,
    pub method: AssignmentMethod,
    pub is_outside_preference: bool,
    pub note: Option<String>,
    pub assigned_by: String,
    pub assigned_at: OffsetDateTime,
    pub cancelled_at: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
}

impl ShiftAssignment {
    /// Materializes a freshly inserted row.
    #[must_use]
    pub fn from_new(assignment_id: AssignmentId, new: NewShiftAssignment) -> Self {
        Self {
            assignment_id,
            tenant_id: new.tenant_id,
            slot_id: new.slot_id,
            member_id: new.member_id,
            status: AssignmentStatus::Confirmed,
            method: new.method,
            is_outside_preference: new.is_outside_preference,
            note: new.note,
            assigned_by: new.assigned_by,
            assigned_at: new.assigned_at,
            cancelled_at: None,
            deleted_at: None,
        }
    }

    /// Live assignments count against capacity.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status == AssignmentStatus::Confirmed && self.deleted_at.is_none()
    }

    /// Whether cancelling would change anything.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.is_live()
    }

    /// Whether removal would change anything. A cancelled row can still be
    /// removed, which hides it from default listings.
    #[must_use]
    pub const fn can_remove(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Applies cancellation. Returns false when the assignment was not live.
    pub fn cancel(&mut self, at: OffsetDateTime) -> bool {
        if !self.can_cancel() {
            return false;
        }
        self.status = AssignmentStatus::Cancelled;
        self.cancelled_at = Some(at);
        true
    }

    /// Applies administrative removal. Returns false when already removed.
    pub fn remove(&mut self, at: OffsetDateTime) -> bool {
        if !self.can_remove() {
            return false;
        }
        self.deleted_at = Some(at);
        true
    }
}
