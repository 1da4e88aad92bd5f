// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_alloc_domain::{ShiftAssignment, ShiftSlot, SlotOccupancy};

/// Result of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    /// The new assignment, or the existing live one for a repeated confirm.
    pub assignment: ShiftAssignment,
    /// False when the member was already seated and nothing was written.
    pub created: bool,
    pub before: SlotOccupancy,
    pub after: SlotOccupancy,
}

/// Result of a cancellation or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The assignment as it stands after the call.
    pub assignment: ShiftAssignment,
    /// False when the call found nothing to change.
    pub changed: bool,
    pub before: SlotOccupancy,
    pub after: SlotOccupancy,
}

/// Result of retiring a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetireOutcome {
    pub slot: ShiftSlot,
    /// False when the slot was already retired.
    pub changed: bool,
    /// Live assignments are left in place; they stay cancellable.
    pub occupancy: SlotOccupancy,
}
