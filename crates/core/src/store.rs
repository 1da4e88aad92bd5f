// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage seam the allocator is written against.
//!
//! Every method is tenant-scoped: a record belonging to another tenant is
//! indistinguishable from a missing one.

use crate::error::CoreError;
use crate::query::{AssignmentDetail, AssignmentFilter};
use shift_alloc_domain::{
    AssignmentId, BusinessDay, BusinessDayId, Member, MemberId, NewShiftAssignment, NewShiftSlot,
    Position, PositionId, ShiftAssignment, ShiftSlot, SlotId, TenantId,
};
use time::OffsetDateTime;

/// Operations available while a slot's row is locked.
///
/// A transaction is bound to one `(tenant, slot)` pair when it is opened.
/// Writes become visible to other transactions only when the enclosing
/// [`AllocationStore::with_slot_transaction`] call returns `Ok`.
pub trait SlotTransaction {
    /// Re-reads the locked slot, including a retired one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn locked_slot(&mut self) -> Result<Option<ShiftSlot>, CoreError>;

    /// Counts confirmed, non-removed assignments in the slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn count_live(&mut self) -> Result<u32, CoreError>;

    /// Finds the member's live assignment in this slot, if any.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_live_assignment(
        &mut self,
        member_id: MemberId,
    ) -> Result<Option<ShiftAssignment>, CoreError>;

    /// Re-reads one assignment of this slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_assignment(
        &mut self,
        assignment_id: AssignmentId,
    ) -> Result<Option<ShiftAssignment>, CoreError>;

    /// Inserts a confirmed assignment.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn insert_assignment(
        &mut self,
        assignment: &NewShiftAssignment,
    ) -> Result<ShiftAssignment, CoreError>;

    /// Sets `status = cancelled` and stamps `cancelled_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn mark_cancelled(
        &mut self,
        assignment_id: AssignmentId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError>;

    /// Stamps `deleted_at` on an assignment.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn mark_removed(
        &mut self,
        assignment_id: AssignmentId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError>;

    /// Stamps `deleted_at` on the slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn retire_slot(&mut self, at: OffsetDateTime) -> Result<(), CoreError>;
}

/// Persistent state used by the allocator.
pub trait AllocationStore: Send + Sync {
    /// Loads a slot, retired or not.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_slot(&self, tenant_id: TenantId, slot_id: SlotId)
    -> Result<Option<ShiftSlot>, CoreError>;

    /// Loads a member.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Option<Member>, CoreError>;

    /// Loads a business day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_business_day(
        &self,
        tenant_id: TenantId,
        business_day_id: BusinessDayId,
    ) -> Result<Option<BusinessDay>, CoreError>;

    /// Loads a position.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_position(
        &self,
        tenant_id: TenantId,
        position_id: PositionId,
    ) -> Result<Option<Position>, CoreError>;

    /// Loads an assignment regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn find_assignment(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
    ) -> Result<Option<ShiftAssignment>, CoreError>;

    /// Inserts a validated slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn insert_slot(
        &self,
        slot: &NewShiftSlot,
        created_at: OffsetDateTime,
    ) -> Result<ShiftSlot, CoreError>;

    /// Unlocked live count. May be stale by the time it returns; never use it
    /// to decide admission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn count_live_assignments(&self, tenant_id: TenantId, slot_id: SlotId)
    -> Result<u32, CoreError>;

    /// Lists assignments joined with their slot, member, position and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TransactionFailure` on storage faults.
    fn list_assignments(
        &self,
        tenant_id: TenantId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentDetail>, CoreError>;

    /// Runs `f` inside a write transaction holding the slot's row lock.
    ///
    /// Commits when `f` returns `Ok`. Rolls back and returns `f`'s error
    /// unchanged otherwise.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or `CoreError::TransactionFailure` if the
    /// transaction cannot be opened or committed.
    fn with_slot_transaction<T, F>(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn SlotTransaction) -> Result<T, CoreError>;
}
