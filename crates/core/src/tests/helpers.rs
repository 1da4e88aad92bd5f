// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AllocationEvent, AllocationStore, Allocator, AssignmentDetail, AssignmentFilter,
    CreateSlotCommand, CoreError, EventSink, EventSinkError, SlotTransaction, sort_details,
};
use shift_alloc_audit::{Actor, Cause};
use shift_alloc_domain::{
    AssignmentId, AssignmentStatus, BusinessDay, BusinessDayId, Member, MemberId,
    NewShiftAssignment, NewShiftSlot, Position, PositionId, ShiftAssignment, ShiftSlot, SlotId,
    TenantId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use time::{Date, OffsetDateTime};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

#[derive(Debug, Default)]
pub struct MemoryState {
    next_id: i64,
    pub members: Vec<Member>,
    pub days: Vec<BusinessDay>,
    pub positions: Vec<Position>,
    pub slots: Vec<ShiftSlot>,
    pub assignments: Vec<ShiftAssignment>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store fake with no row locking of its own.
///
/// Each transaction method takes the state mutex separately and writes apply
/// immediately, so two unserialized admissions can interleave between count
/// and insert. That makes the allocator's slot lock the only thing keeping
/// capacity intact, which is what the race tests exercise.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: Mutex<MemoryState>,
    pub fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn add_member(&self, tenant_id: TenantId, name: &str, is_active: bool) -> MemberId {
        let mut state = self.state.lock().unwrap();
        let member_id: MemberId = MemberId::new(state.next_id());
        state.members.push(Member {
            member_id,
            tenant_id,
            display_name: name.to_string(),
            is_active,
        });
        member_id
    }

    pub fn add_business_day(&self, tenant_id: TenantId, day_date: Date) -> BusinessDayId {
        let mut state = self.state.lock().unwrap();
        let business_day_id: BusinessDayId = BusinessDayId::new(state.next_id());
        state.days.push(BusinessDay {
            business_day_id,
            tenant_id,
            day_date,
            label: None,
        });
        business_day_id
    }

    pub fn add_position(&self, tenant_id: TenantId, name: &str) -> PositionId {
        let mut state = self.state.lock().unwrap();
        let position_id: PositionId = PositionId::new(state.next_id());
        state.positions.push(Position {
            position_id,
            tenant_id,
            position_name: name.to_string(),
        });
        position_id
    }

    pub fn live_count(&self, slot_id: SlotId) -> usize {
        let state = self.state.lock().unwrap();
        state
            .assignments
            .iter()
            .filter(|a| a.slot_id == slot_id && a.is_live())
            .count()
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    tenant_id: TenantId,
    slot_id: SlotId,
}

impl MemoryTransaction<'_> {
    fn with_assignment(
        &self,
        assignment_id: AssignmentId,
        f: impl FnOnce(&mut ShiftAssignment),
    ) -> Result<(), CoreError> {
        let mut state = self.store.state.lock().unwrap();
        let assignment = state
            .assignments
            .iter_mut()
            .find(|a| a.assignment_id == assignment_id)
            .ok_or_else(|| CoreError::TransactionFailure(String::from("row vanished")))?;
        f(assignment);
        Ok(())
    }
}

impl SlotTransaction for MemoryTransaction<'_> {
    fn locked_slot(&mut self) -> Result<Option<ShiftSlot>, CoreError> {
        self.store.find_slot(self.tenant_id, self.slot_id)
    }

    fn count_live(&mut self) -> Result<u32, CoreError> {
        let count: u32 = self
            .store
            .count_live_assignments(self.tenant_id, self.slot_id)?;
        // Widen the window between count and insert.
        std::thread::yield_now();
        Ok(count)
    }

    fn find_live_assignment(
        &mut self,
        member_id: MemberId,
    ) -> Result<Option<ShiftAssignment>, CoreError> {
        let state = self.store.state.lock().unwrap();
        Ok(state
            .assignments
            .iter()
            .find(|a| a.slot_id == self.slot_id && a.member_id == member_id && a.is_live())
            .cloned())
    }

    fn find_assignment(
        &mut self,
        assignment_id: AssignmentId,
    ) -> Result<Option<ShiftAssignment>, CoreError> {
        let state = self.store.state.lock().unwrap();
        Ok(state
            .assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id && a.slot_id == self.slot_id)
            .cloned())
    }

    fn insert_assignment(
        &mut self,
        assignment: &NewShiftAssignment,
    ) -> Result<ShiftAssignment, CoreError> {
        if self.store.fail_inserts.load(Ordering::SeqCst) {
            return Err(CoreError::TransactionFailure(String::from(
                "injected insert failure",
            )));
        }
        let mut state = self.store.state.lock().unwrap();
        let assignment_id: AssignmentId = AssignmentId::new(state.next_id());
        let row: ShiftAssignment = ShiftAssignment::from_new(assignment_id, assignment.clone());
        state.assignments.push(row.clone());
        Ok(row)
    }

    fn mark_cancelled(
        &mut self,
        assignment_id: AssignmentId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError> {
        self.with_assignment(assignment_id, |a| {
            a.status = AssignmentStatus::Cancelled;
            a.cancelled_at = Some(at);
        })
    }

    fn mark_removed(
        &mut self,
        assignment_id: AssignmentId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError> {
        self.with_assignment(assignment_id, |a| a.deleted_at = Some(at))
    }

    fn retire_slot(&mut self, at: OffsetDateTime) -> Result<(), CoreError> {
        let mut state = self.store.state.lock().unwrap();
        let index: usize = state
            .slots
            .iter()
            .position(|s| s.slot_id() == self.slot_id)
            .ok_or_else(|| CoreError::TransactionFailure(String::from("row vanished")))?;
        let slot: ShiftSlot = state.slots.remove(index).retired_at(at);
        state.slots.insert(index, slot);
        Ok(())
    }
}

impl AllocationStore for MemoryStore {
    fn find_slot(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<Option<ShiftSlot>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .slots
            .iter()
            .find(|s| s.slot_id() == slot_id && s.tenant_id() == tenant_id)
            .cloned())
    }

    fn find_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Option<Member>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .find(|m| m.member_id == member_id && m.tenant_id == tenant_id)
            .cloned())
    }

    fn find_business_day(
        &self,
        tenant_id: TenantId,
        business_day_id: BusinessDayId,
    ) -> Result<Option<BusinessDay>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .days
            .iter()
            .find(|d| d.business_day_id == business_day_id && d.tenant_id == tenant_id)
            .cloned())
    }

    fn find_position(
        &self,
        tenant_id: TenantId,
        position_id: PositionId,
    ) -> Result<Option<Position>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .positions
            .iter()
            .find(|p| p.position_id == position_id && p.tenant_id == tenant_id)
            .cloned())
    }

    fn find_assignment(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
    ) -> Result<Option<ShiftAssignment>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id && a.tenant_id == tenant_id)
            .cloned())
    }

    fn insert_slot(
        &self,
        slot: &NewShiftSlot,
        created_at: OffsetDateTime,
    ) -> Result<ShiftSlot, CoreError> {
        let mut state = self.state.lock().unwrap();
        let slot_id: SlotId = SlotId::new(state.next_id());
        let row: ShiftSlot = ShiftSlot::from_new(slot_id, slot.clone(), created_at, None);
        state.slots.push(row.clone());
        Ok(row)
    }

    fn count_live_assignments(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<u32, CoreError> {
        let state = self.state.lock().unwrap();
        let count: usize = state
            .assignments
            .iter()
            .filter(|a| a.tenant_id == tenant_id && a.slot_id == slot_id && a.is_live())
            .count();
        Ok(u32::try_from(count).unwrap())
    }

    fn list_assignments(
        &self,
        tenant_id: TenantId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentDetail>, CoreError> {
        let state = self.state.lock().unwrap();
        let mut details: Vec<AssignmentDetail> = Vec::new();
        for assignment in state
            .assignments
            .iter()
            .filter(|a| a.tenant_id == tenant_id && filter.matches(a))
        {
            let slot = state
                .slots
                .iter()
                .find(|s| s.slot_id() == assignment.slot_id)
                .unwrap();
            let day = state
                .days
                .iter()
                .find(|d| d.business_day_id == slot.business_day_id())
                .unwrap();
            if !filter.includes_day(day.day_date) {
                continue;
            }
            let member = state
                .members
                .iter()
                .find(|m| m.member_id == assignment.member_id)
                .unwrap();
            let position = state
                .positions
                .iter()
                .find(|p| p.position_id == slot.position_id())
                .unwrap();
            details.push(AssignmentDetail::assemble(
                assignment.clone(),
                slot,
                member,
                position,
                day,
            ));
        }
        sort_details(&mut details);
        Ok(details)
    }

    fn with_slot_transaction<T, F>(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn SlotTransaction) -> Result<T, CoreError>,
    {
        let mut tx = MemoryTransaction {
            store: self,
            tenant_id,
            slot_id,
        };
        f(&mut tx)
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<AllocationEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<AllocationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: AllocationEvent) -> Result<(), EventSinkError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ClosedSink;

impl EventSink for ClosedSink {
    fn publish(&self, _event: AllocationEvent) -> Result<(), EventSinkError> {
        Err(EventSinkError::Closed)
    }
}

pub type TestAllocator = Allocator<MemoryStore, Arc<RecordingSink>>;

/// One tenant with a business day and a position, plus a second tenant.
pub struct Fixture {
    pub allocator: TestAllocator,
    pub sink: Arc<RecordingSink>,
    pub tenant: TenantId,
    pub other_tenant: TenantId,
    pub day: BusinessDayId,
    pub position: PositionId,
}

pub fn create_fixture() -> Fixture {
    let store: MemoryStore = MemoryStore::default();
    let tenant: TenantId = TenantId::new(1);
    let day: BusinessDayId = store.add_business_day(tenant, time::macros::date!(2026 - 03 - 14));
    let position: PositionId = store.add_position(tenant, "Bartender");
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::default());

    Fixture {
        allocator: Allocator::new(store, Arc::clone(&sink)),
        sink,
        tenant,
        other_tenant: TenantId::new(2),
        day,
        position,
    }
}

pub fn slot_command(
    day: BusinessDayId,
    position: PositionId,
    start: &str,
    end: &str,
    required_count: i64,
) -> CreateSlotCommand {
    CreateSlotCommand {
        business_day_id: day,
        position_id: position,
        slot_name: String::from("Main Bar"),
        instance_name: None,
        start_time: start.to_string(),
        end_time: end.to_string(),
        required_count,
        priority: 1,
    }
}

impl Fixture {
    pub fn create_slot(&self, required_count: i64) -> SlotId {
        let command: CreateSlotCommand =
            slot_command(self.day, self.position, "17:00", "23:00", required_count);
        let slot: ShiftSlot = self
            .allocator
            .create_slot(
                self.tenant,
                &command,
                &create_test_actor(),
                &create_test_cause(),
            )
            .unwrap();
        self.sink.take();
        slot.slot_id()
    }

    pub fn add_member(&self, name: &str) -> MemberId {
        self.allocator.store().add_member(self.tenant, name, true)
    }
}
