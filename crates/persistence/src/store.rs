// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The allocator's storage seam, backed by the connection pool.

use shift_alloc::{
    AllocationStore, AssignmentDetail, AssignmentFilter, CoreError, SlotTransaction,
};
use shift_alloc_domain::{
    AssignmentId, BusinessDay, BusinessDayId, Member, MemberId, NewShiftSlot, Position,
    PositionId, ShiftAssignment, ShiftSlot, SlotId, TenantId,
};
use time::OffsetDateTime;

use crate::backend::checkout;
use crate::{BackendPool, Persistence, mutations, queries, transaction};

impl AllocationStore for Persistence {
    fn find_slot(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<Option<ShiftSlot>, CoreError> {
        let slot: Option<ShiftSlot> = match &self.pool {
            BackendPool::Sqlite(pool) => {
                queries::slots::find_slot_sqlite(&mut *checkout(pool)?, tenant_id, slot_id)?
            }
            BackendPool::Mysql(pool) => {
                queries::slots::find_slot_mysql(&mut *checkout(pool)?, tenant_id, slot_id)?
            }
        };
        Ok(slot)
    }

    fn find_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Option<Member>, CoreError> {
        let member: Option<Member> = match &self.pool {
            BackendPool::Sqlite(pool) => {
                queries::records::find_member_sqlite(&mut *checkout(pool)?, tenant_id, member_id)?
            }
            BackendPool::Mysql(pool) => {
                queries::records::find_member_mysql(&mut *checkout(pool)?, tenant_id, member_id)?
            }
        };
        Ok(member)
    }

    fn find_business_day(
        &self,
        tenant_id: TenantId,
        business_day_id: BusinessDayId,
    ) -> Result<Option<BusinessDay>, CoreError> {
        let day: Option<BusinessDay> = match &self.pool {
            BackendPool::Sqlite(pool) => queries::records::find_business_day_sqlite(
                &mut *checkout(pool)?,
                tenant_id,
                business_day_id,
            )?,
            BackendPool::Mysql(pool) => queries::records::find_business_day_mysql(
                &mut *checkout(pool)?,
                tenant_id,
                business_day_id,
            )?,
        };
        Ok(day)
    }

    fn find_position(
        &self,
        tenant_id: TenantId,
        position_id: PositionId,
    ) -> Result<Option<Position>, CoreError> {
        let position: Option<Position> = match &self.pool {
            BackendPool::Sqlite(pool) => {
                queries::records::find_position_sqlite(&mut *checkout(pool)?, tenant_id, position_id)?
            }
            BackendPool::Mysql(pool) => {
                queries::records::find_position_mysql(&mut *checkout(pool)?, tenant_id, position_id)?
            }
        };
        Ok(position)
    }

    fn find_assignment(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
    ) -> Result<Option<ShiftAssignment>, CoreError> {
        let assignment: Option<ShiftAssignment> = match &self.pool {
            BackendPool::Sqlite(pool) => queries::assignments::find_assignment_sqlite(
                &mut *checkout(pool)?,
                tenant_id,
                assignment_id,
            )?,
            BackendPool::Mysql(pool) => queries::assignments::find_assignment_mysql(
                &mut *checkout(pool)?,
                tenant_id,
                assignment_id,
            )?,
        };
        Ok(assignment)
    }

    fn insert_slot(
        &self,
        slot: &NewShiftSlot,
        created_at: OffsetDateTime,
    ) -> Result<ShiftSlot, CoreError> {
        let inserted: ShiftSlot = match &self.pool {
            BackendPool::Sqlite(pool) => {
                mutations::slots::insert_slot_sqlite(&mut *checkout(pool)?, slot, created_at)?
            }
            BackendPool::Mysql(pool) => {
                mutations::slots::insert_slot_mysql(&mut *checkout(pool)?, slot, created_at)?
            }
        };
        Ok(inserted)
    }

    fn count_live_assignments(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<u32, CoreError> {
        let count: u32 = match &self.pool {
            BackendPool::Sqlite(pool) => queries::slots::count_live_assignments_sqlite(
                &mut *checkout(pool)?,
                tenant_id,
                slot_id,
            )?,
            BackendPool::Mysql(pool) => queries::slots::count_live_assignments_mysql(
                &mut *checkout(pool)?,
                tenant_id,
                slot_id,
            )?,
        };
        Ok(count)
    }

    fn list_assignments(
        &self,
        tenant_id: TenantId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentDetail>, CoreError> {
        let details: Vec<AssignmentDetail> = match &self.pool {
            BackendPool::Sqlite(pool) => {
                queries::assignments::list_assignments_sqlite(&mut *checkout(pool)?, tenant_id, filter)?
            }
            BackendPool::Mysql(pool) => {
                queries::assignments::list_assignments_mysql(&mut *checkout(pool)?, tenant_id, filter)?
            }
        };
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
        let result: T = match &self.pool {
            BackendPool::Sqlite(pool) => transaction::run_slot_transaction_sqlite(
                &mut *checkout(pool)?,
                tenant_id,
                slot_id,
                f,
            )?,
            BackendPool::Mysql(pool) => transaction::run_slot_transaction_mysql(
                &mut *checkout(pool)?,
                tenant_id,
                slot_id,
                f,
            )?,
        };
        Ok(result)
    }
}
