// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the shift allocation engine.
//!
//! Everything here is pure: validation, the shift window model, assignment
//! lifecycle transitions and the capacity admission rule. Nothing in this
//! crate touches storage or locks.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod capacity;
mod error;
mod ids;
mod records;
mod slot;
mod validation;
mod window;

#[cfg(test)]
mod tests;

pub use assignment::{AssignmentMethod, AssignmentStatus, NewShiftAssignment, ShiftAssignment};
pub use capacity::SlotOccupancy;
pub use error::{DomainError, EntityKind};
pub use ids::{AssignmentId, BusinessDayId, MemberId, PositionId, SlotId, TenantId};
pub use records::{BusinessDay, Member, Position, Tenant};
pub use slot::{NewShiftSlot, ShiftSlot};
pub use validation::{
    MAX_COUNT, MAX_NAME_LENGTH, MAX_NOTE_LENGTH, format_date, normalize_optional_name, parse_date,
    validate_name, validate_priority, validate_required_count,
};
pub use window::{ShiftWindow, format_time, parse_time};
