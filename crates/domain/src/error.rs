// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ids::{MemberId, SlotId};
use std::fmt;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tenant,
    Slot,
    Member,
    Assignment,
    BusinessDay,
    Position,
}

impl EntityKind {
    /// Returns the lowercase label used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Slot => "slot",
            Self::Member => "member",
            Self::Assignment => "assignment",
            Self::BusinessDay => "business day",
            Self::Position => "position",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by domain validation and the capacity rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required name field is blank or too long.
    #[error("Invalid {field}: {reason}")]
    InvalidName {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// Capacity must be between 1 and `MAX_COUNT`.
    #[error("required_count must be between 1 and 2147483647, got {value}")]
    InvalidCapacity {
        /// The rejected value.
        value: i64,
    },
    /// Priority must be between 1 and `MAX_COUNT`.
    #[error("priority must be between 1 and 2147483647, got {value}")]
    InvalidPriority {
        /// The rejected value.
        value: i64,
    },
    /// A shift window whose start and end coincide.
    #[error("Shift window starting and ending at {time} has zero length")]
    ZeroLengthWindow {
        /// The shared start/end time.
        time: String,
    },
    /// A time-of-day string that could not be parsed.
    #[error("Invalid time '{value}': {error}")]
    InvalidTime {
        /// The input string.
        value: String,
        /// Parser message.
        error: String,
    },
    /// A calendar date string that could not be parsed.
    #[error("Invalid date '{value}': {error}")]
    InvalidDate {
        /// The input string.
        value: String,
        /// Parser message.
        error: String,
    },
    /// A date range whose end precedes its start.
    #[error("Date range ends ({to}) before it starts ({from})")]
    InvalidDateRange {
        /// Range start.
        from: time::Date,
        /// Range end.
        to: time::Date,
    },
    /// Unknown assignment status string.
    #[error("Unknown assignment status: {status}")]
    InvalidStatus {
        /// The rejected value.
        status: String,
    },
    /// Unknown assignment method string.
    #[error("Unknown assignment method: {method}")]
    InvalidMethod {
        /// The rejected value.
        method: String,
    },
    /// A note longer than the stored column allows.
    #[error("Note exceeds {max} characters")]
    NoteTooLong {
        /// The maximum length.
        max: usize,
    },
    /// The member exists but is deactivated.
    #[error("Member {member_id} is not active")]
    InactiveMember {
        /// The inactive member.
        member_id: MemberId,
    },
    /// A tenant-scoped lookup found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// What was looked up.
        entity: EntityKind,
        /// The raw id that was requested.
        id: i64,
    },
    /// The slot has no remaining capacity.
    #[error("Slot {slot_id} is full ({confirmed}/{required} confirmed)")]
    SlotFull {
        /// The slot that rejected the confirmation.
        slot_id: SlotId,
        /// Live assignments at the time of the check.
        confirmed: u32,
        /// The slot's declared capacity.
        required: u32,
    },
}

impl DomainError {
    /// Shorthand for a `NotFound` on the given entity.
    #[must_use]
    pub const fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
