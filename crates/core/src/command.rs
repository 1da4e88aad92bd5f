// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_alloc_domain::{BusinessDayId, MemberId, PositionId, SlotId};

/// Intent to create a slot, as received. Validated by the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSlotCommand {
    pub business_day_id: BusinessDayId,
    pub position_id: PositionId,
    pub slot_name: String,
    /// Sub-venue label, e.g. a room or bar within the venue.
    pub instance_name: Option<String>,
    /// Wall-clock start, `HH:MM`.
    pub start_time: String,
    /// Wall-clock end, `HH:MM`. Earlier than the start for overnight slots.
    pub end_time: String,
    pub required_count: i64,
    pub priority: i64,
}

/// Intent to seat a member in a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmCommand {
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub note: Option<String>,
    /// Set when the member is seated outside their stated availability.
    pub is_outside_preference: bool,
}

impl ConfirmCommand {
    /// A plain confirmation with no note.
    #[must_use]
    pub const fn new(slot_id: SlotId, member_id: MemberId) -> Self {
        Self {
            slot_id,
            member_id,
            note: None,
            is_outside_preference: false,
        }
    }
}
