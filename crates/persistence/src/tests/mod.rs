// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod listing_tests;

use crate::Persistence;
use shift_alloc::{Allocator, CreateSlotCommand, DiscardEvents};
use shift_alloc_audit::{Actor, Cause};
use shift_alloc_domain::{BusinessDay, MemberId, Position, ShiftSlot, SlotId, TenantId};
use time::Date;
use time::macros::date;

pub type DbAllocator = Allocator<Persistence, DiscardEvents>;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test operation"))
}

/// Collaborator rows every allocation test needs.
pub struct Seeded {
    pub tenant: TenantId,
    pub day: BusinessDay,
    pub position: Position,
}

pub fn seed(persistence: &Persistence, tenant_name: &str, day_date: Date) -> Seeded {
    let tenant: TenantId = persistence.register_tenant(tenant_name).unwrap().tenant_id;
    let day: BusinessDay = persistence
        .register_business_day(tenant, day_date, Some("Saturday"))
        .unwrap();
    let position: Position = persistence.register_position(tenant, "Bartender").unwrap();
    Seeded {
        tenant,
        day,
        position,
    }
}

pub fn slot_command(
    seeded: &Seeded,
    start_time: &str,
    end_time: &str,
    required_count: i64,
) -> CreateSlotCommand {
    CreateSlotCommand {
        business_day_id: seeded.day.business_day_id,
        position_id: seeded.position.position_id,
        slot_name: String::from("Main Bar"),
        instance_name: None,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        required_count,
        priority: 1,
    }
}

pub fn create_allocator(persistence: Persistence) -> (DbAllocator, Seeded) {
    let seeded: Seeded = seed(&persistence, "Harbor Club", date!(2026 - 03 - 14));
    (Allocator::new(persistence, DiscardEvents), seeded)
}

pub fn create_slot(allocator: &DbAllocator, seeded: &Seeded, required_count: i64) -> SlotId {
    let slot: ShiftSlot = allocator
        .create_slot(
            seeded.tenant,
            &slot_command(seeded, "17:00", "23:00", required_count),
            &create_test_actor(),
            &create_test_cause(),
        )
        .unwrap();
    slot.slot_id()
}

pub fn add_member(persistence: &Persistence, tenant: TenantId, name: &str) -> MemberId {
    persistence
        .register_member(tenant, name, true)
        .unwrap()
        .member_id
}
