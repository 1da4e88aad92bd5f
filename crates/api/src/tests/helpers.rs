// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use shift_alloc::{Allocator, DiscardEvents};
use shift_alloc_audit::Cause;
use shift_alloc_domain::{BusinessDayId, MemberId, PositionId, SlotId, TenantId};
use shift_alloc_persistence::Persistence;
use time::macros::date;

use crate::{AuthenticatedActor, CreateSlotRequest, Role, SlotInfo, create_slot};

pub type TestAllocator = Allocator<Persistence, DiscardEvents>;

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_coordinator() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("coord-456"), Role::Coordinator)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// One tenant with a business day, a position and two active members.
pub struct Fixture {
    pub allocator: TestAllocator,
    pub tenant: TenantId,
    pub business_day_id: BusinessDayId,
    pub position_id: PositionId,
    pub avery: MemberId,
    pub blake: MemberId,
}

pub fn setup_fixture() -> Fixture {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to setup test persistence");
    let tenant: TenantId = persistence
        .register_tenant("Harbor Club")
        .expect("Failed to register tenant")
        .tenant_id;
    let business_day_id: BusinessDayId = persistence
        .register_business_day(tenant, date!(2026 - 03 - 14), Some("Saturday"))
        .expect("Failed to register business day")
        .business_day_id;
    let position_id: PositionId = persistence
        .register_position(tenant, "Bartender")
        .expect("Failed to register position")
        .position_id;
    let avery: MemberId = persistence
        .register_member(tenant, "Avery", true)
        .expect("Failed to register member")
        .member_id;
    let blake: MemberId = persistence
        .register_member(tenant, "Blake", true)
        .expect("Failed to register member")
        .member_id;

    Fixture {
        allocator: Allocator::new(persistence, DiscardEvents),
        tenant,
        business_day_id,
        position_id,
        avery,
        blake,
    }
}

pub fn slot_request(fixture: &Fixture, start: &str, end: &str, required: i64) -> CreateSlotRequest {
    CreateSlotRequest {
        business_day_id: fixture.business_day_id.value(),
        position_id: fixture.position_id.value(),
        slot_name: String::from("Main Bar"),
        instance_name: None,
        start_time: start.to_string(),
        end_time: end.to_string(),
        required_count: required,
        priority: 1,
    }
}

pub fn create_test_slot(fixture: &Fixture, required: i64) -> SlotId {
    let slot: SlotInfo = create_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_request(fixture, "17:00", "23:00", required),
        &create_test_admin(),
        &create_test_cause(),
    )
    .expect("Failed to create slot");
    SlotId::new(slot.slot_id)
}
