// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot transactions.
//!
//! A slot transaction is a backend write transaction that holds the slot
//! row's lock for its whole duration. Every read and write the allocator
//! makes while admitting or releasing capacity goes through [`LockedSlot`],
//! which is bound to the transaction's connection and to one
//! `(tenant, slot)` pair.

use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc::{CoreError, SlotTransaction};
use shift_alloc_domain::{
    AssignmentId, MemberId, NewShiftAssignment, ShiftAssignment, ShiftSlot, SlotId, TenantId,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// The open side of a slot transaction.
pub struct LockedSlot<'c, C> {
    conn: &'c mut C,
    tenant_id: TenantId,
    slot_id: SlotId,
}

/// Generates the `SlotTransaction` impl and the transaction runner for one
/// backend.
///
/// Like `backend_fn!`, this only substitutes the connection type and the
/// `_sqlite`/`_mysql` suffix of the functions it calls.
macro_rules! slot_transaction_impl {
    ($conn_ty:ty, $suffix:ident) => {
        pastey::paste! {
            impl SlotTransaction for LockedSlot<'_, $conn_ty> {
                fn locked_slot(&mut self) -> Result<Option<ShiftSlot>, CoreError> {
                    Ok(queries::slots::[<find_slot_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                    )?)
                }

                fn count_live(&mut self) -> Result<u32, CoreError> {
                    Ok(queries::slots::[<count_live_assignments_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                    )?)
                }

                fn find_live_assignment(
                    &mut self,
                    member_id: MemberId,
                ) -> Result<Option<ShiftAssignment>, CoreError> {
                    Ok(queries::assignments::[<find_live_assignment_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                        member_id,
                    )?)
                }

                fn find_assignment(
                    &mut self,
                    assignment_id: AssignmentId,
                ) -> Result<Option<ShiftAssignment>, CoreError> {
                    Ok(queries::assignments::[<find_slot_assignment_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                        assignment_id,
                    )?)
                }

                fn insert_assignment(
                    &mut self,
                    assignment: &NewShiftAssignment,
                ) -> Result<ShiftAssignment, CoreError> {
                    if assignment.tenant_id != self.tenant_id || assignment.slot_id != self.slot_id {
                        return Err(CoreError::TransactionFailure(format!(
                            "assignment for slot {} inserted under the lock of slot {}",
                            assignment.slot_id, self.slot_id
                        )));
                    }
                    Ok(mutations::assignments::[<insert_assignment_ $suffix>](
                        self.conn, assignment,
                    )?)
                }

                fn mark_cancelled(
                    &mut self,
                    assignment_id: AssignmentId,
                    at: OffsetDateTime,
                ) -> Result<(), CoreError> {
                    mutations::assignments::[<mark_cancelled_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                        assignment_id,
                        at,
                    )?;
                    Ok(())
                }

                fn mark_removed(
                    &mut self,
                    assignment_id: AssignmentId,
                    at: OffsetDateTime,
                ) -> Result<(), CoreError> {
                    mutations::assignments::[<mark_removed_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                        assignment_id,
                        at,
                    )?;
                    Ok(())
                }

                fn retire_slot(&mut self, at: OffsetDateTime) -> Result<(), CoreError> {
                    mutations::slots::[<retire_slot_ $suffix>](
                        self.conn,
                        self.tenant_id,
                        self.slot_id,
                        at,
                    )?;
                    Ok(())
                }
            }

            /// Opens a write transaction, locks the slot row and runs `f`.
            ///
            /// Commits when `f` returns `Ok`; otherwise rolls back and
            /// returns `f`'s error wrapped in `PersistenceError::Aborted`.
            ///
            /// # Errors
            ///
            /// Returns an error if the transaction cannot be opened, the
            /// lock query fails, `f` fails, or the commit fails.
            pub fn [<run_slot_transaction_ $suffix>]<T, F>(
                conn: &mut $conn_ty,
                tenant_id: TenantId,
                slot_id: SlotId,
                f: F,
            ) -> Result<T, PersistenceError>
            where
                F: FnOnce(&mut dyn SlotTransaction) -> Result<T, CoreError>,
            {
                conn.write_transaction(|conn| {
                    if !conn.lock_slot_row(tenant_id.value(), slot_id.value())? {
                        debug!(%tenant_id, %slot_id, "Slot transaction opened on a missing slot");
                    }
                    let mut locked = LockedSlot {
                        conn,
                        tenant_id,
                        slot_id,
                    };
                    f(&mut locked).map_err(PersistenceError::Aborted)
                })
            }
        }
    };
}

slot_transaction_impl!(SqliteConnection, sqlite);
slot_transaction_impl!(MysqlConnection, mysql);
