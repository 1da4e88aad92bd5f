// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift slots: the allocatable unit.
//!
//! A slot is one position staffed over one window on one business day, with a
//! fixed capacity. Slots are immutable after creation; the only permitted
//! change is retirement (soft deletion), after which no new assignments are
//! admitted.

use crate::capacity::SlotOccupancy;
use crate::error::DomainError;
use crate::ids::{BusinessDayId, PositionId, SlotId, TenantId};
use crate::validation::{
    normalize_optional_name, validate_name, validate_priority, validate_required_count,
};
use crate::window::ShiftWindow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A validated, not-yet-persisted slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNewShiftSlot")]
pub struct NewShiftSlot {
    tenant_id: TenantId,
    business_day_id: BusinessDayId,
    position_id: PositionId,
    slot_name: String,
    instance_name: Option<String>,
    window: ShiftWindow,
    required_count: u32,
    priority: u32,
}

#[derive(Deserialize)]
struct RawNewShiftSlot {
    tenant_id: TenantId,
    business_day_id: BusinessDayId,
    position_id: PositionId,
    slot_name: String,
    instance_name: Option<String>,
    window: ShiftWindow,
    required_count: i64,
    priority: i64,
}

impl TryFrom<RawNewShiftSlot> for NewShiftSlot {
    type Error = DomainError;

    fn try_from(raw: RawNewShiftSlot) -> Result<Self, Self::Error> {
        Self::new(
            raw.tenant_id,
            raw.business_day_id,
            raw.position_id,
            &raw.slot_name,
            raw.instance_name.as_deref(),
            raw.window,
            raw.required_count,
            raw.priority,
        )
    }
}

impl NewShiftSlot {
    /// Validates raw slot attributes.
    ///
    /// The name is trimmed, a blank instance name collapses to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the capacity is not a positive
    /// integer, or the priority is below 1.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        business_day_id: BusinessDayId,
        position_id: PositionId,
        slot_name: &str,
        instance_name: Option<&str>,
        window: ShiftWindow,
        required_count: i64,
        priority: i64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            tenant_id,
            business_day_id,
            position_id,
            slot_name: validate_name("slot_name", slot_name)?,
            instance_name: normalize_optional_name("instance_name", instance_name)?,
            window,
            required_count: validate_required_count(required_count)?,
            priority: validate_priority(priority)?,
        })
    }

    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    #[must_use]
    pub const fn business_day_id(&self) -> BusinessDayId {
        self.business_day_id
    }

    #[must_use]
    pub const fn position_id(&self) -> PositionId {
        self.position_id
    }

    #[must_use]
    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    #[must_use]
    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    #[must_use]
    pub const fn window(&self) -> ShiftWindow {
        self.window
    }

    /// Declared capacity.
    #[must_use]
    pub const fn required_count(&self) -> u32 {
        self.required_count
    }

    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }
}

/// A persisted slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    slot_id: SlotId,
    attributes: NewShiftSlot,
    created_at: OffsetDateTime,
    deleted_at: Option<OffsetDateTime>,
}

impl ShiftSlot {
    /// Attaches storage identity to validated attributes.
    #[must_use]
    pub const fn from_new(
        slot_id: SlotId,
        attributes: NewShiftSlot,
        created_at: OffsetDateTime,
        deleted_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            slot_id,
            attributes,
            created_at,
            deleted_at,
        }
    }

    #[must_use]
    pub const fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.attributes.tenant_id
    }

    #[must_use]
    pub const fn business_day_id(&self) -> BusinessDayId {
        self.attributes.business_day_id
    }

    #[must_use]
    pub const fn position_id(&self) -> PositionId {
        self.attributes.position_id
    }

    #[must_use]
    pub fn slot_name(&self) -> &str {
        &self.attributes.slot_name
    }

    #[must_use]
    pub fn instance_name(&self) -> Option<&str> {
        self.attributes.instance_name.as_deref()
    }

    #[must_use]
    pub const fn window(&self) -> ShiftWindow {
        self.attributes.window
    }

    #[must_use]
    pub const fn required_count(&self) -> u32 {
        self.attributes.required_count
    }

    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.attributes.priority
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }

    /// Returns true once the slot has been retired.
    #[must_use]
    pub const fn is_retired(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the slot with `deleted_at` stamped, unless already retired.
    #[must_use]
    pub const fn retired_at(mut self, at: OffsetDateTime) -> Self {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(at);
        }
        self
    }

    /// Pairs the slot's capacity with a live assignment count.
    #[must_use]
    pub const fn occupancy(&self, confirmed: u32) -> SlotOccupancy {
        SlotOccupancy::new(confirmed, self.attributes.required_count)
    }
}
